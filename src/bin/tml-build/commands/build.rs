//! `tml-build build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use tml_build::core::abi::TargetAbi;
use tml_build::core::layout::ToolchainLayout;
use tml_build::ops::build::{build, BuildOptions};
use tml_build::util::{Shell, Status};

pub fn execute(shell: &Shell, args: BuildArgs) -> Result<()> {
    let layout = ToolchainLayout::discover()?;

    // Default to every supported ABI, dropping duplicate requests.
    let requested = if args.abi.is_empty() {
        TargetAbi::ALL.to_vec()
    } else {
        args.abi
    };
    let mut abis: Vec<TargetAbi> = Vec::new();
    for abi in requested {
        if !abis.contains(&abi) {
            abis.push(abi);
        }
    }

    let options = BuildOptions {
        source_dir: args.path,
        output: args.out,
        build_dir: args.build_dir,
        ndk: args.ndk,
        abis,
    };

    let output = build(&layout, shell, &options)?;
    shell.status(Status::Finished, output.display());

    Ok(())
}
