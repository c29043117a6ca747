//! Session configuration for lockranger.
//!
//! An optional YAML file (passed with `--config`) tunes how the session
//! talks to the operator. Unknown fields are ignored for forward
//! compatibility, missing fields take their defaults, and values are
//! validated after loading. Command-line flags override the file.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
