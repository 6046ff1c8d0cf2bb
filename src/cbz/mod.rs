pub mod packer;
pub mod to_pdf;
