//! Expand command - unpack tar archives into data directories.

use std::path::{Path, PathBuf};

use colored::Colorize;
use infomodels::{package, DataDirectory};

pub fn run(archives: Vec<PathBuf>, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    if output.is_some() && archives.len() > 1 {
        return Err("--output can only be used with a single archive".into());
    }

    for archive in &archives {
        let dest = output.clone().unwrap_or_else(|| default_destination(archive));

        package::unpack(archive, &dest)?;
        tracing::info!(archive = %archive.display(), datadir = %dest.display(), "unpacked archive");

        println!(
            "{} {} -> {}",
            "Expanded".green().bold(),
            archive.display(),
            dest.display().to_string().white()
        );

        // Archives without metadata are not verified.
        let data = DataDirectory::open(&dest)?;
        if !data.records().is_empty() {
            data.verify()?;
            println!("  {} {} checksums", "Verified".green(), data.records().len());
        }
    }

    Ok(())
}

/// `site1.tar` -> `site1`; anything else gets an `.expanded` suffix.
fn default_destination(archive: &Path) -> PathBuf {
    match archive.extension() {
        Some(ext) if ext == "tar" => archive.with_extension(""),
        _ => {
            let mut name = archive.as_os_str().to_os_string();
            name.push(".expanded");
            PathBuf::from(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_destination() {
        assert_eq!(default_destination(Path::new("out/site1.tar")), PathBuf::from("out/site1"));
        assert_eq!(
            default_destination(Path::new("out/site1.bin")),
            PathBuf::from("out/site1.bin.expanded")
        );
    }
}
