//! CMake driver for per-ABI package builds.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::builder::config::BuildConfig;
use crate::core::abi::TargetAbi;
use crate::util::fs::{ensure_dir, list_shared_libraries};
use crate::util::process::{find_cmake, ProcessBuilder};

/// One CMake configure-and-build pass for a single target ABI.
pub struct CmakeBuild<'a> {
    config: &'a BuildConfig,
    abi: TargetAbi,
    toolchain_file: &'a Path,
    source_dir: &'a Path,
    build_dir: PathBuf,
    ndk: Option<&'a Path>,
    cmake: PathBuf,
}

impl<'a> CmakeBuild<'a> {
    /// Create a new CMake build.
    ///
    /// Fails if no `cmake` executable is on `PATH` or the configuration
    /// has not been bootstrapped for a target ABI.
    pub fn new(
        config: &'a BuildConfig,
        toolchain_file: &'a Path,
        source_dir: &'a Path,
        build_dir: PathBuf,
        ndk: Option<&'a Path>,
    ) -> Result<Self> {
        let Some(cmake) = find_cmake() else {
            bail!(
                "CMake not found\n\
                 \n\
                 CMake is required to build TML packages.\n\
                 Install CMake and ensure it's in your PATH."
            );
        };

        let Some(abi) = config.abi else {
            bail!("build configuration has no target ABI");
        };

        Ok(CmakeBuild {
            config,
            abi,
            toolchain_file,
            source_dir,
            build_dir,
            ndk,
            cmake,
        })
    }

    /// Configure, build, and collect the produced shared libraries.
    ///
    /// Returns bare library file names found directly in the build
    /// directory.
    pub fn run(&self) -> Result<Vec<String>> {
        ensure_dir(&self.build_dir)?;

        self.configure()?;
        self.compile()?;

        list_shared_libraries(&self.build_dir)
    }

    /// Run CMake configuration.
    fn configure(&self) -> Result<()> {
        let mut cmd = ProcessBuilder::new(&self.cmake)
            .arg("-S")
            .arg(self.source_dir)
            .arg("-B")
            .arg(&self.build_dir)
            .arg(format!(
                "-DCMAKE_TOOLCHAIN_FILE={}",
                self.toolchain_file.display()
            ))
            .arg("-DCMAKE_BUILD_TYPE=Release")
            .arg(format!("-DANDROID_ABI={}", self.abi))
            .arg(format!(
                "-DANDROID_NATIVE_API_LEVEL={}",
                self.config.api_level
            ));

        if let Some(ndk) = self.ndk {
            cmd = cmd.arg(format!("-DANDROID_NDK={}", ndk.display()));
        }

        if !self.config.cxx_flags.is_empty() {
            cmd = cmd.arg(format!("-DCMAKE_CXX_FLAGS={}", self.config.cxx_flags_joined()));
        }

        for package in self.config.packages() {
            for (key, value) in package.cmake_defines() {
                cmd = cmd.arg(format!("-D{}={}", key, value));
            }
        }

        tracing::debug!("running {}", cmd.display_command());
        let status = cmd.status()?;
        if !status.success() {
            bail!("failed to run CMake to generate build files");
        }

        Ok(())
    }

    /// Run the CMake build.
    fn compile(&self) -> Result<()> {
        let cmd = ProcessBuilder::new(&self.cmake).arg("--build").arg(&self.build_dir);

        tracing::debug!("running {}", cmd.display_command());
        let status = cmd
            .status()
            .with_context(|| format!("failed to build {}", self.build_dir.display()))?;

        if !status.success() {
            bail!("failed to compile");
        }

        Ok(())
    }
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join("CMakeLists.txt").is_file()
}
