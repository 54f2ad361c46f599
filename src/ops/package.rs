//! `.tbp` package assembly.
//!
//! A TML package is a deflate-compressed zip with the manifest at the
//! root and native libraries under `native/<abi>/`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::manifest::{PackageManifest, MANIFEST_NAME};
use crate::ops::build::BuiltAbi;

/// Write the package archive from the manifest and per-ABI build
/// products.
pub fn write_package(output: &Path, manifest: &PackageManifest, built: &[BuiltAbi]) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("failed to create package file {}", output.display()))?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(MANIFEST_NAME, options)
        .context("failed to start the manifest archive entry")?;
    zip.write_all(manifest.to_yaml()?.as_bytes())
        .context("failed to write the manifest archive entry")?;

    for abi_build in built {
        for lib in &abi_build.libraries {
            let source = abi_build.build_dir.join(lib);
            let data = std::fs::read(&source)
                .with_context(|| format!("failed to read built library {}", source.display()))?;

            let entry = format!("native/{}/{}", abi_build.abi, lib);
            zip.start_file(entry.as_str(), options)
                .with_context(|| format!("failed to start archive entry {}", entry))?;
            zip.write_all(&data)
                .with_context(|| format!("failed to write archive entry {}", entry))?;
        }
    }

    zip.finish()
        .with_context(|| format!("failed to finish package {}", output.display()))?;
    Ok(())
}
