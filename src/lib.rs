//! tml-build - Build and package TML native packages for Android
//!
//! This crate provides the core library functionality for tml-build,
//! including toolchain bootstrap, prebuilt package location, and the
//! CMake-driven per-ABI build and packaging pipeline.

pub mod builder;
pub mod core;
pub mod locator;
pub mod ops;
pub mod util;

pub use crate::core::{abi::TargetAbi, layout::ToolchainLayout, manifest::PackageManifest};

pub use builder::config::{BuildConfig, BuildEnv};
pub use locator::{LocateOptions, PackageLocator, PackageResolution, ResolvedPackage};
