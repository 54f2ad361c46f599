//! Core data structures for tml-build.
//!
//! This module contains the foundational types used throughout tml-build:
//! - Target ABI identifiers
//! - Installation layout discovery
//! - The package.yaml manifest schema

pub mod abi;
pub mod layout;
pub mod manifest;

pub use abi::TargetAbi;
pub use layout::ToolchainLayout;
pub use manifest::{CodeEntry, PackageManifest};
