//! `tml-build locate` command

use anyhow::{Context, Result};

use crate::cli::LocateArgs;
use tml_build::core::layout::ToolchainLayout;
use tml_build::locator::{LocateOptions, PackageLocator, PackageResolution};

pub fn execute(args: LocateArgs) -> Result<()> {
    let packages_root = match args.packages_root {
        Some(root) => root,
        None => ToolchainLayout::discover()?.packages_dir(),
    };

    let locator = PackageLocator::new(packages_root, args.abi);
    let options = LocateOptions {
        required: args.required,
        quiet: args.quiet_missing,
    };

    let resolution = locator.locate(&args.name, options)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&resolution)
                .context("failed to serialize the resolution")?
        );
        return Ok(());
    }

    if let PackageResolution::Found(package) = &resolution {
        for (key, value) in package.cmake_defines() {
            println!("{} = {}", key, value);
        }
    }

    Ok(())
}
