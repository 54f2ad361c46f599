//! package.yaml manifest parsing and schema.
//!
//! The manifest is the central description of a TML package: identity,
//! version, the code entries the loader should pick up, and the prebuilt
//! packages the native code depends on.
//!
//! Two aliases exist for historical reasons: a code entry's loader may be
//! spelled `type` or `loader`, and its file may be spelled `name` or
//! `path`. `type`/`name` win when both are present.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Manifest file name inside a package source directory.
pub const MANIFEST_NAME: &str = "package.yaml";

/// Loader identifier for native shared libraries.
pub const NATIVE_LOADER: &str = "native";

/// Accepted version shapes: `1`, `1.2`, `1.2.3`.
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+(\.\d+)?)?$").unwrap());

/// Errors raised while loading or validating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("package.yaml not found in {}", .dir.display())]
    NotFound { dir: std::path::PathBuf },

    #[error("failed to read {}", .path.display())]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse package.yaml: {0}")]
    Parse(String),

    #[error("no package id specified in package.yaml")]
    MissingId,

    #[error("invalid package version `{value}` in package.yaml")]
    InvalidVersion { value: String },

    #[error("invalid code entry #{index} in package.yaml (no loader name or file path)")]
    InvalidCodeEntry { index: usize },
}

/// A YAML scalar that should be a string.
///
/// Versions are routinely written as bare numbers (`version: 1.2`), so
/// numeric scalars are coerced instead of rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum YamlString {
    Text(String),
    Int(i64),
    Float(f64),
}

impl YamlString {
    fn into_string(self) -> String {
        match self {
            YamlString::Text(s) => s,
            YamlString::Int(n) => n.to_string(),
            YamlString::Float(n) => n.to_string(),
        }
    }
}

/// Raw manifest shape as written on disk.
#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    id: Option<YamlString>,
    #[serde(default)]
    name: Option<YamlString>,
    #[serde(default)]
    author: Option<YamlString>,
    #[serde(default)]
    version: Option<YamlString>,
    #[serde(default)]
    code: Option<Vec<RawCodeEntry>>,
    #[serde(default)]
    dependencies: Vec<YamlString>,
}

/// Raw code entry, before alias normalization.
#[derive(Debug, Deserialize)]
struct RawCodeEntry {
    #[serde(default)]
    loader: Option<YamlString>,
    #[serde(default, rename = "type")]
    kind: Option<YamlString>,
    #[serde(default)]
    name: Option<YamlString>,
    #[serde(default)]
    path: Option<YamlString>,
}

/// A normalized code entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeEntry {
    /// File the loader should load, relative to the package root.
    #[serde(rename = "name")]
    pub path: String,

    /// Loader responsible for this entry (e.g. `native`).
    #[serde(rename = "type")]
    pub loader: String,
}

impl CodeEntry {
    /// Create a native code entry for a shared library.
    pub fn native(path: impl Into<String>) -> Self {
        CodeEntry {
            path: path.into(),
            loader: NATIVE_LOADER.to_string(),
        }
    }

    /// Whether this entry is loaded as a native shared library.
    pub fn is_native(&self) -> bool {
        self.loader == NATIVE_LOADER
    }
}

/// The validated package.yaml manifest.
#[derive(Debug, Clone, Serialize)]
pub struct PackageManifest {
    /// Unique package identifier.
    pub id: String,

    /// Human-readable package name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Package author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Package version (`major[.minor[.patch]]`).
    pub version: String,

    /// Code entries the loader picks up. Empty means "synthesize from
    /// the built libraries" at packaging time.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub code: Vec<CodeEntry>,

    /// Names of prebuilt packages this package links against.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl PackageManifest {
    /// Load and validate the manifest from a package source directory.
    pub fn load(source_dir: &Path) -> Result<Self, ManifestError> {
        let path = source_dir.join(MANIFEST_NAME);
        if !path.is_file() {
            return Err(ManifestError::NotFound {
                dir: source_dir.to_path_buf(),
            });
        }

        let text = std::fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;

        Self::parse(&text)
    }

    /// Parse and validate manifest text.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let raw: RawManifest =
            serde_yaml2::from_str(text).map_err(|e| ManifestError::Parse(e.to_string()))?;

        let id = raw
            .id
            .map(YamlString::into_string)
            .ok_or(ManifestError::MissingId)?;

        let version = raw
            .version
            .map(YamlString::into_string)
            .unwrap_or_default();
        if !VERSION_RE.is_match(&version) {
            return Err(ManifestError::InvalidVersion { value: version });
        }

        let mut code = Vec::new();
        for (index, entry) in raw.code.unwrap_or_default().into_iter().enumerate() {
            // `type` wins over `loader`, `name` wins over `path`.
            let loader = entry.kind.or(entry.loader).map(YamlString::into_string);
            let path = entry.name.or(entry.path).map(YamlString::into_string);

            match (loader, path) {
                (Some(loader), Some(path)) => code.push(CodeEntry { path, loader }),
                _ => return Err(ManifestError::InvalidCodeEntry { index }),
            }
        }

        Ok(PackageManifest {
            id,
            name: raw.name.map(YamlString::into_string),
            author: raw.author.map(YamlString::into_string),
            version,
            code,
            dependencies: raw
                .dependencies
                .into_iter()
                .map(YamlString::into_string)
                .collect(),
        })
    }

    /// Paths of the native libraries named by the manifest's code entries.
    pub fn native_libraries(&self) -> Vec<&str> {
        self.code
            .iter()
            .filter(|entry| entry.is_native())
            .map(|entry| entry.path.as_str())
            .collect()
    }

    /// Synthesize native code entries from built library file names.
    ///
    /// No-op when the manifest already declares code entries. Library
    /// names are shortened by stripping a `lib` prefix and `.so` suffix
    /// (`libfoo.so` becomes `foo`).
    pub fn synthesize_code(&mut self, libraries: &[String]) {
        if !self.code.is_empty() {
            return;
        }

        for lib in libraries {
            let mut short = lib.as_str();
            if short.starts_with("lib") && short.ends_with(".so") {
                short = &short[3..short.len() - 3];
            }
            self.code.push(CodeEntry::native(short));
        }
    }

    /// Serialize the manifest back to YAML for packaging.
    pub fn to_yaml(&self) -> Result<String, ManifestError> {
        serde_yaml2::to_string(self).map_err(|e| ManifestError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = PackageManifest::parse("id: com.example.foo\nversion: \"1.2\"\n").unwrap();
        assert_eq!(manifest.id, "com.example.foo");
        assert_eq!(manifest.version, "1.2");
        assert!(manifest.code.is_empty());
        assert!(manifest.dependencies.is_empty());
    }

    #[test]
    fn test_numeric_version_is_coerced() {
        let manifest = PackageManifest::parse("id: foo\nversion: 1.2\n").unwrap();
        assert_eq!(manifest.version, "1.2");

        let manifest = PackageManifest::parse("id: foo\nversion: 3\n").unwrap();
        assert_eq!(manifest.version, "3");
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let err = PackageManifest::parse("version: \"1.0\"\n").unwrap_err();
        assert!(matches!(err, ManifestError::MissingId));
    }

    #[test]
    fn test_invalid_version_is_rejected() {
        for bad in ["", "1.2.3.4", "v1.0", "1.a"] {
            let text = format!("id: foo\nversion: \"{}\"\n", bad);
            let err = PackageManifest::parse(&text).unwrap_err();
            assert!(
                matches!(err, ManifestError::InvalidVersion { .. }),
                "expected InvalidVersion for `{}`",
                bad
            );
        }
    }

    #[test]
    fn test_code_entry_aliases() {
        let text = "\
id: foo
version: \"1.0\"
code:
  - name: foo
    type: native
  - path: bar.lua
    loader: script
";
        let manifest = PackageManifest::parse(text).unwrap();
        assert_eq!(manifest.code.len(), 2);
        assert_eq!(manifest.code[0], CodeEntry::native("foo"));
        assert_eq!(manifest.code[1].path, "bar.lua");
        assert_eq!(manifest.code[1].loader, "script");
        assert_eq!(manifest.native_libraries(), vec!["foo"]);
    }

    #[test]
    fn test_code_entry_canonical_alias_wins() {
        let text = "\
id: foo
version: \"1.0\"
code:
  - name: canonical
    path: fallback
    type: native
    loader: script
";
        let manifest = PackageManifest::parse(text).unwrap();
        assert_eq!(manifest.code[0].path, "canonical");
        assert_eq!(manifest.code[0].loader, "native");
    }

    #[test]
    fn test_incomplete_code_entry_is_rejected() {
        let text = "id: foo\nversion: \"1.0\"\ncode:\n  - name: foo\n";
        let err = PackageManifest::parse(text).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidCodeEntry { index: 0 }));
    }

    #[test]
    fn test_synthesize_code_from_libraries() {
        let mut manifest = PackageManifest::parse("id: foo\nversion: \"1.0\"\n").unwrap();
        manifest.synthesize_code(&["libfoo.so".to_string(), "plain.so".to_string()]);

        assert_eq!(manifest.code.len(), 2);
        assert_eq!(manifest.code[0], CodeEntry::native("foo"));
        assert_eq!(manifest.code[1], CodeEntry::native("plain.so"));
    }

    #[test]
    fn test_synthesize_code_keeps_existing_entries() {
        let text = "id: foo\nversion: \"1.0\"\ncode:\n  - name: keep\n    type: native\n";
        let mut manifest = PackageManifest::parse(text).unwrap();
        manifest.synthesize_code(&["libother.so".to_string()]);

        assert_eq!(manifest.code.len(), 1);
        assert_eq!(manifest.code[0].path, "keep");
    }

    #[test]
    fn test_yaml_roundtrip() {
        let text = "\
id: com.example.foo
name: Foo
version: \"1.2.3\"
code:
  - name: foo
    type: native
dependencies:
  - bar
";
        let manifest = PackageManifest::parse(text).unwrap();
        let emitted = manifest.to_yaml().unwrap();
        let reparsed = PackageManifest::parse(&emitted).unwrap();

        assert_eq!(reparsed.id, manifest.id);
        assert_eq!(reparsed.version, manifest.version);
        assert_eq!(reparsed.code, manifest.code);
        assert_eq!(reparsed.dependencies, manifest.dependencies);
    }

    #[test]
    fn test_load_missing_manifest() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = PackageManifest::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
        assert!(err.to_string().contains("package.yaml"));
    }
}
