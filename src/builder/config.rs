//! Build configuration and environment bootstrap.
//!
//! All cross-compilation state lives in an explicit [`BuildConfig`]
//! value threaded through calls. [`BuildConfig::bootstrap`] mirrors the
//! historical toolchain setup: it validates the requested ABI and
//! appends the fixed compiler flag, and it is a no-op when the
//! environment is already configured or requests no cross-compilation
//! at all, so it is safe to run more than once.

use std::collections::BTreeMap;

use crate::core::abi::{TargetAbi, UnsupportedAbiError};
use crate::locator::ResolvedPackage;

/// Minimum Android platform API level TML packages are built against.
pub const MIN_PLATFORM_API_LEVEL: u32 = 16;

/// TML native code is built without RTTI.
pub const NO_RTTI_FLAG: &str = "-fno-rtti";

/// Environment variable carrying the requested target ABI.
pub const TML_ABI_ENV: &str = "TML_ABI";

/// Environment variable marking an already-configured cross-compilation
/// context.
pub const TML_CONFIGURED_ENV: &str = "TML_CONFIGURED";

/// Snapshot of the externally supplied build inputs.
#[derive(Debug, Clone, Default)]
pub struct BuildEnv {
    /// Cross-compilation context is already set up; bootstrap skips.
    pub configured: bool,

    /// Requested target ABI identifier, if any.
    pub abi: Option<String>,

    /// Pre-existing C++ compiler flags.
    pub cxx_flags: Vec<String>,
}

impl BuildEnv {
    /// Read the build inputs from the process environment.
    pub fn from_env() -> Self {
        BuildEnv {
            configured: std::env::var_os(TML_CONFIGURED_ENV).is_some(),
            abi: std::env::var(TML_ABI_ENV).ok().filter(|s| !s.is_empty()),
            cxx_flags: std::env::var("CXXFLAGS")
                .map(|raw| raw.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }

    /// Environment requesting a cross-compile for one specific ABI,
    /// keeping any `CXXFLAGS` from the process environment.
    pub fn cross_compile(abi: TargetAbi) -> Self {
        BuildEnv {
            configured: false,
            abi: Some(abi.as_str().to_string()),
            ..BuildEnv::from_env()
        }
    }
}

/// Cross-compilation configuration for one build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Android platform API level passed to the toolchain.
    pub api_level: u32,

    /// C++ compiler flags, in append order.
    pub cxx_flags: Vec<String>,

    /// Validated target ABI, set by a successful bootstrap.
    pub abi: Option<TargetAbi>,

    /// Resolved prebuilt packages, keyed by namespace prefix.
    packages: BTreeMap<String, ResolvedPackage>,
}

impl BuildConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        BuildConfig {
            api_level: MIN_PLATFORM_API_LEVEL,
            cxx_flags: Vec::new(),
            abi: None,
            packages: BTreeMap::new(),
        }
    }

    /// Create a configuration seeded with pre-existing compiler flags.
    pub fn with_flags(cxx_flags: Vec<String>) -> Self {
        BuildConfig {
            cxx_flags,
            ..BuildConfig::new()
        }
    }

    /// Establish the cross-compilation target from the environment.
    ///
    /// Returns without touching the configuration when the environment
    /// is already configured or names no target ABI. Otherwise the ABI
    /// string is validated against the supported set (fatal on
    /// mismatch), one informational message echoes the detected ABI,
    /// and [`NO_RTTI_FLAG`] is appended to the flag list.
    ///
    /// The flag append is not deduplicated: running bootstrap twice
    /// appends the flag twice, matching the historical include-twice
    /// behavior.
    pub fn bootstrap(&mut self, env: &BuildEnv) -> Result<(), UnsupportedAbiError> {
        if env.configured {
            return Ok(());
        }
        let Some(raw) = env.abi.as_deref() else {
            return Ok(());
        };

        // The detected ABI is echoed before validation.
        tracing::info!("targeting Android ABI {}", raw);
        let abi = raw.parse::<TargetAbi>()?;

        self.cxx_flags.push(NO_RTTI_FLAG.to_string());
        self.abi = Some(abi);
        Ok(())
    }

    /// Record a resolved prebuilt package.
    pub fn insert_package(&mut self, package: ResolvedPackage) {
        self.packages.insert(package.prefix.clone(), package);
    }

    /// Resolved packages, in prefix order.
    pub fn packages(&self) -> impl Iterator<Item = &ResolvedPackage> {
        self.packages.values()
    }

    /// The joined C++ flag string handed to the compiler driver.
    pub fn cxx_flags_joined(&self) -> String {
        self.cxx_flags.join(" ")
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig::new()
    }
}
