pub mod dataset;
pub mod window;
