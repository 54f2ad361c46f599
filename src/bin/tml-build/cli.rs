//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use tml_build::core::abi::TargetAbi;
use tml_build::util::ColorChoice;

/// tml-build - build and package TML native packages for Android
#[derive(Parser)]
#[command(name = "tml-build")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Control colored output
    #[arg(long, global = true, default_value = "auto", value_name = "WHEN")]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a package source tree and assemble the .tbp archive
    Build(BuildArgs),

    /// Resolve a prebuilt package for a target ABI
    Locate(LocateArgs),

    /// Show the discovered toolchain layout
    Toolchain(ToolchainArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Use the specific source path
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Use the specific path for the resulting package
    #[arg(short, long, default_value = "package.tbp")]
    pub out: PathBuf,

    /// Use the specific temporary build dir path
    #[arg(short, long, default_value = "build", value_name = "DIR")]
    pub build_dir: PathBuf,

    /// Specify the Android NDK path
    #[arg(short = 'n', long, env = "ANDROID_NDK", value_name = "DIR")]
    pub ndk: Option<PathBuf>,

    /// Only build the given ABIs (defaults to all supported)
    #[arg(long, value_name = "ABI")]
    pub abi: Vec<TargetAbi>,
}

#[derive(Args)]
pub struct LocateArgs {
    /// Package name (case-insensitive)
    pub name: String,

    /// Target ABI to resolve for
    #[arg(long, env = "TML_ABI", value_name = "ABI")]
    pub abi: TargetAbi,

    /// Fail if the package cannot be found
    #[arg(long)]
    pub required: bool,

    /// Print nothing when the package is missing
    #[arg(long)]
    pub quiet_missing: bool,

    /// Override the packages directory
    #[arg(long, value_name = "DIR")]
    pub packages_root: Option<PathBuf>,

    /// Emit the resolution as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ToolchainArgs {
    /// Override the installation root
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
