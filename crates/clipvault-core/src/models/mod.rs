//! Data models for the application

mod clip;

pub use clip::*;
