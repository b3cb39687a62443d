// Public modules
pub mod descriptor;
pub mod error;
pub mod include;
pub mod plan;
pub mod relpath;
pub mod split;
pub mod tree;

// Re-export common types for convenience
pub use error::{Error, Result};
