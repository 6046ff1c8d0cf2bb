pub mod batch;
pub mod extractor;
