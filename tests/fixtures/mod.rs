//! Test fixtures and data generators
//!
//! Builders for assembling raw VGM byte images with correct offsets.

pub mod builders;

pub use builders::*;
