//! Execution module.
//!
//! Runs style transforms asynchronously with a timeout and a fallback to
//! the original image.

pub mod engine;

pub use engine::{EngineOptions, TransformEngine, TransformOutput, TransformStatus};
