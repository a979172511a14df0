//! Foundation Layer - error taxonomy and model types
//!
//! Every other rehome crate depends on this one; it has no knowledge of the
//! filesystem or of any particular source language.

pub mod error;
pub mod model;

// Re-export commonly used types for convenience
pub use error::*;
pub use model::*;
