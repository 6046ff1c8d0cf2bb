pub mod cbz;
pub mod config;
pub mod error;
pub mod jpeg;
pub mod page_order;
pub mod pdf;
pub mod pipeline;
pub mod render;
