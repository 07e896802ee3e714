pub mod build;
pub mod patch;
