//! TML installation layout discovery.
//!
//! A TML checkout has a fixed shape:
//!
//! ```text
//! <root>/
//!   tools/        tml-build and friends live here
//!   cmake/        tml.toolchain.cmake
//!   packages/     prebuilt packages, one directory per package
//! ```
//!
//! The root is derived once from the location of the running executable
//! (the parent of the directory containing it), and can be overridden
//! with the `TML_HOME` environment variable or an explicit path.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable overriding the installation root.
pub const TML_HOME_ENV: &str = "TML_HOME";

/// Name of the CMake toolchain file under `cmake/`.
pub const TOOLCHAIN_FILE_NAME: &str = "tml.toolchain.cmake";

/// Errors raised while discovering or validating the layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to determine the tml-build executable location")]
    ExecutablePath(#[source] std::io::Error),

    #[error("the tml-build executable has no parent directory")]
    NoParentDirectory,

    #[error("TML CMake toolchain not found at {}", .path.display())]
    ToolchainMissing { path: PathBuf },
}

/// Resolved paths of a TML installation.
///
/// Immutable after discovery; every lookup and build derives its paths
/// from this value.
#[derive(Debug, Clone)]
pub struct ToolchainLayout {
    root: PathBuf,
}

impl ToolchainLayout {
    /// Create a layout rooted at an explicit directory.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        ToolchainLayout { root: root.into() }
    }

    /// Discover the layout from `TML_HOME` or the executable location.
    pub fn discover() -> Result<Self, LayoutError> {
        if let Some(home) = std::env::var_os(TML_HOME_ENV) {
            return Ok(ToolchainLayout::from_root(PathBuf::from(home)));
        }

        let exe = std::env::current_exe().map_err(LayoutError::ExecutablePath)?;
        let tool_dir = exe.parent().ok_or(LayoutError::NoParentDirectory)?;
        let root = tool_dir.parent().ok_or(LayoutError::NoParentDirectory)?;

        Ok(ToolchainLayout::from_root(root))
    }

    /// The installation root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding prebuilt packages.
    pub fn packages_dir(&self) -> PathBuf {
        self.root.join("packages")
    }

    /// Directory holding the CMake support files.
    pub fn cmake_dir(&self) -> PathBuf {
        self.root.join("cmake")
    }

    /// Path of the CMake toolchain file.
    pub fn toolchain_file(&self) -> PathBuf {
        self.cmake_dir().join(TOOLCHAIN_FILE_NAME)
    }

    /// Return the toolchain file path, failing if it does not exist.
    pub fn require_toolchain_file(&self) -> Result<PathBuf, LayoutError> {
        let path = self.toolchain_file();
        if path.is_file() {
            Ok(path)
        } else {
            Err(LayoutError::ToolchainMissing { path })
        }
    }
}
