//! Build a TML package from source.
//!
//! The pipeline mirrors what a TML developer does by hand: configure
//! and build the CMake project once per target ABI with the TML
//! toolchain, then bundle the built libraries with the manifest into a
//! `.tbp` archive.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::builder::cmake::{is_cmake_project, CmakeBuild};
use crate::builder::config::{BuildConfig, BuildEnv};
use crate::core::abi::TargetAbi;
use crate::core::layout::ToolchainLayout;
use crate::core::manifest::PackageManifest;
use crate::locator::{LocateOptions, PackageLocator, PackageResolution};
use crate::ops::package::write_package;
use crate::util::shell::{Shell, Status};

/// Options for a package build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Package source directory (must contain CMakeLists.txt and
    /// package.yaml).
    pub source_dir: PathBuf,

    /// Path of the resulting `.tbp` package.
    pub output: PathBuf,

    /// Temporary build directory; one subdirectory per ABI.
    pub build_dir: PathBuf,

    /// Android NDK path to hand to the toolchain, if any.
    pub ndk: Option<PathBuf>,

    /// ABIs to build, in order. Empty is not allowed; callers default
    /// to all supported ABIs.
    pub abis: Vec<TargetAbi>,
}

/// Build products for one ABI.
#[derive(Debug, Clone)]
pub struct BuiltAbi {
    /// The ABI these libraries were compiled for.
    pub abi: TargetAbi,

    /// Directory holding the build products.
    pub build_dir: PathBuf,

    /// Bare shared-library file names produced by the build.
    pub libraries: Vec<String>,
}

/// Build a package for every requested ABI and assemble the archive.
///
/// Returns the path of the written package.
pub fn build(layout: &ToolchainLayout, shell: &Shell, options: &BuildOptions) -> Result<PathBuf> {
    if options.abis.is_empty() {
        bail!("no target ABIs requested");
    }

    if !is_cmake_project(&options.source_dir) {
        bail!(
            "CMakeLists.txt not found in the source directory {}",
            options.source_dir.display()
        );
    }

    let mut manifest = PackageManifest::load(&options.source_dir)
        .context("failed to load the package manifest")?;

    let toolchain_file = layout.require_toolchain_file()?;

    let mut built = Vec::new();
    for &abi in &options.abis {
        shell.status(Status::Compiling, format!("{} for {}", manifest.id, abi));

        let env = BuildEnv::cross_compile(abi);
        let mut config = BuildConfig::with_flags(env.cxx_flags.clone());
        config.bootstrap(&env)?;

        resolve_dependencies(&mut config, layout, shell, abi, &manifest)?;

        let build_dir = options.build_dir.join(abi.build_dir_name());
        let libraries = CmakeBuild::new(
            &config,
            &toolchain_file,
            &options.source_dir,
            build_dir.clone(),
            options.ndk.as_deref(),
        )?
        .run()
        .with_context(|| format!("build failed for {}", abi))?;

        tracing::debug!("built libraries for {}: {:?}", abi, libraries);
        built.push(BuiltAbi {
            abi,
            build_dir,
            libraries,
        });
    }

    warn_uneven_coverage(shell, &built);

    if let Some(reference) = built.iter().find(|b| !b.libraries.is_empty()) {
        manifest.synthesize_code(&reference.libraries);
    }

    shell.status(Status::Packaging, options.output.display());
    write_package(&options.output, &manifest, &built)?;

    Ok(options.output.clone())
}

/// Resolve the manifest's prebuilt dependencies into the configuration.
///
/// Every declared dependency is required: a package that cannot be
/// located aborts the build before CMake runs.
fn resolve_dependencies(
    config: &mut BuildConfig,
    layout: &ToolchainLayout,
    shell: &Shell,
    abi: TargetAbi,
    manifest: &PackageManifest,
) -> Result<()> {
    if manifest.dependencies.is_empty() {
        return Ok(());
    }

    let locator = PackageLocator::new(layout.packages_dir(), abi);
    for name in &manifest.dependencies {
        shell.status(Status::Resolving, format!("{} ({})", name, abi));
        let resolution = locator.locate(name, LocateOptions::new().required())?;
        if let PackageResolution::Found(package) = resolution {
            config.insert_package(package);
        }
    }

    Ok(())
}

/// Warn about libraries that were built for some ABIs but not others.
fn warn_uneven_coverage(shell: &Shell, built: &[BuiltAbi]) {
    let Some(reference) = built.iter().find(|b| !b.libraries.is_empty()) else {
        return;
    };

    for lib in &reference.libraries {
        for other in built {
            if !other.libraries.contains(lib) {
                shell.warn(format!(
                    "library `{}` is not compiled for the {} architecture",
                    lib, other.abi
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn options_for(source: &TempDir, out: &TempDir) -> BuildOptions {
        BuildOptions {
            source_dir: source.path().to_path_buf(),
            output: out.path().join("package.tbp"),
            build_dir: out.path().join("build"),
            ndk: None,
            abis: TargetAbi::ALL.to_vec(),
        }
    }

    #[test]
    fn test_build_requires_cmake_lists() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let layout = ToolchainLayout::from_root(out.path());

        let err = build(&layout, &Shell::default(), &options_for(&source, &out)).unwrap_err();
        assert!(err.to_string().contains("CMakeLists.txt"));
    }

    #[test]
    fn test_build_requires_manifest() {
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("CMakeLists.txt"), "project(x)").unwrap();
        let out = TempDir::new().unwrap();
        let layout = ToolchainLayout::from_root(out.path());

        let err = build(&layout, &Shell::default(), &options_for(&source, &out)).unwrap_err();
        assert!(format!("{:#}", err).contains("package.yaml"));
    }

    #[test]
    fn test_build_requires_toolchain_file() {
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("CMakeLists.txt"), "project(x)").unwrap();
        fs::write(source.path().join("package.yaml"), "id: x\nversion: \"1.0\"\n").unwrap();
        let out = TempDir::new().unwrap();
        let layout = ToolchainLayout::from_root(out.path());

        let err = build(&layout, &Shell::default(), &options_for(&source, &out)).unwrap_err();
        assert!(format!("{:#}", err).contains("tml.toolchain.cmake"));
    }

    #[test]
    fn test_build_rejects_empty_abi_list() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let layout = ToolchainLayout::from_root(out.path());

        let mut options = options_for(&source, &out);
        options.abis.clear();

        let err = build(&layout, &Shell::default(), &options).unwrap_err();
        assert!(err.to_string().contains("no target ABIs"));
    }

    #[test]
    fn test_warn_uneven_coverage_tolerates_empty_builds() {
        // Nothing built at all: must not panic or warn.
        warn_uneven_coverage(
            &Shell::default(),
            &[BuiltAbi {
                abi: TargetAbi::ArmeabiV7a,
                build_dir: PathBuf::from("build/arm"),
                libraries: Vec::new(),
            }],
        );
    }
}
