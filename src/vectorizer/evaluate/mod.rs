pub mod scoring;
pub mod matrix;
