//! Target ABI identifiers.
//!
//! TML packages ship native code for a fixed set of Android ABIs.
//! Anything outside that set must never reach a build, so parsing an
//! ABI string is a hard validation point.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// An Android ABI a TML package can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetAbi {
    /// 32-bit ARM with VFP (armeabi-v7a)
    ArmeabiV7a,
    /// 32-bit x86
    X86,
}

/// Error for ABI strings outside the supported set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported target ABI `{value}`; supported ABIs are: {}", TargetAbi::supported_list())]
pub struct UnsupportedAbiError {
    /// The rejected identifier.
    pub value: String,
}

impl TargetAbi {
    /// All supported ABIs, in build order (ARM first).
    pub const ALL: [TargetAbi; 2] = [TargetAbi::ArmeabiV7a, TargetAbi::X86];

    /// The ABI identifier as used in directory layouts and CMake
    /// (`ANDROID_ABI`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetAbi::ArmeabiV7a => "armeabi-v7a",
            TargetAbi::X86 => "x86",
        }
    }

    /// Short name used for per-ABI build directories.
    pub fn build_dir_name(&self) -> &'static str {
        match self {
            TargetAbi::ArmeabiV7a => "arm",
            TargetAbi::X86 => "x86",
        }
    }

    /// Human-readable list of supported ABI identifiers.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|abi| format!("`{}`", abi.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for TargetAbi {
    type Err = UnsupportedAbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "armeabi-v7a" => Ok(TargetAbi::ArmeabiV7a),
            "x86" => Ok(TargetAbi::X86),
            other => Err(UnsupportedAbiError {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TargetAbi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_abis() {
        assert_eq!("armeabi-v7a".parse::<TargetAbi>(), Ok(TargetAbi::ArmeabiV7a));
        assert_eq!("x86".parse::<TargetAbi>(), Ok(TargetAbi::X86));
    }

    #[test]
    fn test_parse_rejects_unknown_abi() {
        for bad in ["arm64-v8a", "x86_64", "mips", "ARMEABI-V7A", ""] {
            let err = bad.parse::<TargetAbi>().unwrap_err();
            assert_eq!(err.value, bad);
            let msg = err.to_string();
            assert!(msg.contains("unsupported target ABI"));
            assert!(msg.contains("armeabi-v7a"));
            assert!(msg.contains("x86"));
        }
    }

    #[test]
    fn test_display_roundtrip() {
        for abi in TargetAbi::ALL {
            assert_eq!(abi.to_string().parse::<TargetAbi>(), Ok(abi));
        }
    }

    #[test]
    fn test_build_dir_names() {
        assert_eq!(TargetAbi::ArmeabiV7a.build_dir_name(), "arm");
        assert_eq!(TargetAbi::X86.build_dir_name(), "x86");
    }
}
