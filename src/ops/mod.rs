//! High-level operations.
//!
//! This module contains the implementation of tml-build commands.

pub mod build;
pub mod package;

pub use build::{build, BuildOptions, BuiltAbi};
pub use package::write_package;
