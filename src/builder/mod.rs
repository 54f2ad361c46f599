//! Cross-compilation setup and the CMake build driver.

pub mod cmake;
pub mod config;

pub use cmake::CmakeBuild;
pub use config::{BuildConfig, BuildEnv, MIN_PLATFORM_API_LEVEL, NO_RTTI_FLAG};
