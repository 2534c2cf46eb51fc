//! # feedtidy Config
//!
//! Configuration for the feed reconciler: the host page contract (selectors,
//! markers), the attributes the engine writes, and the scheduling timings.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
