//! `tml-build toolchain` command

use anyhow::Result;

use crate::cli::ToolchainArgs;
use tml_build::builder::{MIN_PLATFORM_API_LEVEL, NO_RTTI_FLAG};
use tml_build::core::abi::TargetAbi;
use tml_build::core::layout::ToolchainLayout;

pub fn execute(args: ToolchainArgs) -> Result<()> {
    let layout = match args.root {
        Some(root) => ToolchainLayout::from_root(root),
        None => ToolchainLayout::discover()?,
    };

    let toolchain_file = layout.toolchain_file();
    let toolchain_state = if toolchain_file.is_file() {
        "found"
    } else {
        "missing"
    };

    println!("root:            {}", layout.root().display());
    println!(
        "toolchain file:  {} ({})",
        toolchain_file.display(),
        toolchain_state
    );
    println!("packages:        {}", layout.packages_dir().display());
    println!("supported ABIs:  {}", TargetAbi::supported_list());
    println!("API level:       {}", MIN_PLATFORM_API_LEVEL);
    println!("C++ flags:       {}", NO_RTTI_FLAG);

    Ok(())
}
