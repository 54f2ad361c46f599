//! Prebuilt package resolution.
//!
//! TML ships prebuilt packages under a conventional tree:
//!
//! ```text
//! packages/
//!   <name>/              lowercase package name
//!     include/           public headers
//!     lib/<abi>/*.so     shared libraries per target ABI
//! ```
//!
//! A lookup is a pure filesystem probe: the package is present iff its
//! directory and the per-ABI lib directory both exist. Nothing is read
//! beyond directory structure, nothing is cached, and repeated lookups
//! re-scan the tree.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::core::abi::TargetAbi;
use crate::util::fs::walk_shared_libraries;

/// How a failed lookup is reported.
///
/// `required` escalates absence to a hard error; `quiet` suppresses the
/// informational message. Both unset means "report and continue".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocateOptions {
    /// Absence aborts the run.
    pub required: bool,
    /// Absence produces no output at all.
    pub quiet: bool,
}

impl LocateOptions {
    /// Default options: absence is reported but not fatal.
    pub fn new() -> Self {
        LocateOptions::default()
    }

    /// Escalate absence to a hard error.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Suppress the missing-package message.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }
}

/// A successfully resolved prebuilt package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPackage {
    /// Uppercase namespace prefix (`FOO` for package `foo`).
    pub prefix: String,

    /// Public header directory (`<package>/include/`).
    pub include_dir: PathBuf,

    /// Shared libraries for the target ABI, in traversal order.
    pub libraries: Vec<PathBuf>,
}

impl ResolvedPackage {
    /// CMake cache defines a consuming project reads:
    /// `<PREFIX>_LIBRARIES` (semicolon-joined list) and
    /// `<PREFIX>_INCLUDE_DIRS`.
    pub fn cmake_defines(&self) -> [(String, String); 2] {
        let libraries = self
            .libraries
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(";");

        [
            (format!("{}_LIBRARIES", self.prefix), libraries),
            (
                format!("{}_INCLUDE_DIRS", self.prefix),
                self.include_dir.display().to_string(),
            ),
        ]
    }
}

/// Outcome of a package lookup.
///
/// `NotFound` carries no paths; callers check for `Found` before using
/// the resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum PackageResolution {
    Found(ResolvedPackage),
    NotFound,
}

impl PackageResolution {
    /// The resolved package, if the lookup succeeded.
    pub fn found(&self) -> Option<&ResolvedPackage> {
        match self {
            PackageResolution::Found(pkg) => Some(pkg),
            PackageResolution::NotFound => None,
        }
    }
}

/// Errors raised by a lookup.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("required package `{name}` was not found")]
    RequiredMissing { name: String },

    #[error("failed to scan {}", .dir.display())]
    Scan {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Resolves prebuilt packages for one target ABI.
#[derive(Debug, Clone)]
pub struct PackageLocator {
    packages_root: PathBuf,
    abi: TargetAbi,
}

impl PackageLocator {
    /// Create a locator over a packages directory.
    pub fn new(packages_root: impl Into<PathBuf>, abi: TargetAbi) -> Self {
        PackageLocator {
            packages_root: packages_root.into(),
            abi,
        }
    }

    /// The packages directory this locator probes.
    pub fn packages_root(&self) -> &std::path::Path {
        &self.packages_root
    }

    /// Resolve a package by name, case-insensitively.
    ///
    /// Only the `required`-and-missing case is an error; otherwise
    /// absence is a `NotFound` value.
    pub fn locate(
        &self,
        name: &str,
        options: LocateOptions,
    ) -> Result<PackageResolution, LocateError> {
        let package_dir = self.packages_root.join(name.to_lowercase());
        let lib_dir = package_dir.join("lib").join(self.abi.as_str());

        if !lib_dir.is_dir() || !package_dir.is_dir() {
            if options.required {
                return Err(LocateError::RequiredMissing {
                    name: name.to_string(),
                });
            }
            if !options.quiet {
                tracing::info!("package `{}` not found for {}", name, self.abi);
            }
            return Ok(PackageResolution::NotFound);
        }

        let libraries = walk_shared_libraries(&lib_dir).map_err(|source| LocateError::Scan {
            dir: lib_dir.clone(),
            source,
        })?;

        Ok(PackageResolution::Found(ResolvedPackage {
            prefix: name.to_uppercase(),
            include_dir: package_dir.join("include"),
            libraries,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// packages/foo/{include/, lib/armeabi-v7a/libfoo.so}
    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let foo = tmp.path().join("foo");
        fs::create_dir_all(foo.join("include")).unwrap();
        fs::create_dir_all(foo.join("lib/armeabi-v7a")).unwrap();
        fs::write(foo.join("lib/armeabi-v7a/libfoo.so"), b"\x7fELF").unwrap();
        tmp
    }

    #[test]
    fn test_locate_found_any_case() {
        let tmp = fixture();
        let locator = PackageLocator::new(tmp.path(), TargetAbi::ArmeabiV7a);

        for spelling in ["foo", "Foo", "FOO"] {
            let resolution = locator.locate(spelling, LocateOptions::new()).unwrap();
            let pkg = resolution.found().expect("package should resolve");

            assert_eq!(pkg.prefix, "FOO");
            assert_eq!(pkg.include_dir, tmp.path().join("foo/include"));
            assert_eq!(
                pkg.libraries,
                vec![tmp.path().join("foo/lib/armeabi-v7a/libfoo.so")]
            );
        }
    }

    #[test]
    fn test_locate_other_abi_is_absent() {
        let tmp = fixture();
        let locator = PackageLocator::new(tmp.path(), TargetAbi::X86);

        let resolution = locator.locate("foo", LocateOptions::new()).unwrap();
        assert_eq!(resolution, PackageResolution::NotFound);
        assert!(resolution.found().is_none());
    }

    #[test]
    fn test_locate_enumerates_nested_libraries_once() {
        let tmp = fixture();
        let nested = tmp.path().join("foo/lib/armeabi-v7a/extra");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("libextra.so"), b"\x7fELF").unwrap();
        fs::write(tmp.path().join("foo/lib/armeabi-v7a/notes.txt"), b"x").unwrap();

        let locator = PackageLocator::new(tmp.path(), TargetAbi::ArmeabiV7a);
        let resolution = locator.locate("foo", LocateOptions::new()).unwrap();
        let pkg = resolution.found().unwrap();

        assert_eq!(pkg.libraries.len(), 2);
        let mut sorted = pkg.libraries.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 2, "each match must appear exactly once");
    }

    #[test]
    fn test_locate_missing_required_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let locator = PackageLocator::new(tmp.path(), TargetAbi::ArmeabiV7a);

        let err = locator
            .locate("absent", LocateOptions::new().required())
            .unwrap_err();

        assert!(matches!(err, LocateError::RequiredMissing { .. }));
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn test_locate_missing_quiet_is_silent_not_found() {
        let tmp = TempDir::new().unwrap();
        let locator = PackageLocator::new(tmp.path(), TargetAbi::X86);

        let resolution = locator
            .locate("absent", LocateOptions::new().quiet())
            .unwrap();
        assert_eq!(resolution, PackageResolution::NotFound);
    }

    #[test]
    fn test_lib_dir_without_abi_subdir_is_absent() {
        let tmp = TempDir::new().unwrap();
        // Package dir exists but has no lib/<abi> subtree.
        fs::create_dir_all(tmp.path().join("bare/include")).unwrap();

        let locator = PackageLocator::new(tmp.path(), TargetAbi::ArmeabiV7a);
        let resolution = locator.locate("bare", LocateOptions::new()).unwrap();
        assert_eq!(resolution, PackageResolution::NotFound);
    }

    #[test]
    fn test_cmake_defines() {
        let pkg = ResolvedPackage {
            prefix: "FOO".to_string(),
            include_dir: PathBuf::from("/tml/packages/foo/include"),
            libraries: vec![
                PathBuf::from("/tml/packages/foo/lib/x86/libfoo.so"),
                PathBuf::from("/tml/packages/foo/lib/x86/libfoo_extra.so"),
            ],
        };

        let defines = pkg.cmake_defines();
        assert_eq!(defines[0].0, "FOO_LIBRARIES");
        assert_eq!(
            defines[0].1,
            "/tml/packages/foo/lib/x86/libfoo.so;/tml/packages/foo/lib/x86/libfoo_extra.so"
        );
        assert_eq!(defines[1].0, "FOO_INCLUDE_DIRS");
        assert_eq!(defines[1].1, "/tml/packages/foo/include");
    }
}
