//! Builder API for ergonomic machine and rule construction.
//!
//! This module provides fluent builders for classifier machines and transition
//! rules. Structural mistakes surface as [`BuildError`] at `build` time.

pub mod error;
pub mod machine;
pub mod rule;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use rule::RuleBuilder;
