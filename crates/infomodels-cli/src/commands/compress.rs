//! Compress command - pack data directories into tar archives.

use std::path::PathBuf;

use colored::Colorize;
use infomodels::package;

pub fn run(dirs: Vec<PathBuf>, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    if output.is_some() && dirs.len() > 1 {
        return Err("--output can only be used with a single data directory".into());
    }

    for dir in &dirs {
        let archive = output
            .clone()
            .unwrap_or_else(|| package::default_archive_path(dir));

        let files = package::pack(dir, &archive)?;
        tracing::info!(datadir = %dir.display(), archive = %archive.display(), files, "packed data directory");

        println!(
            "{} {} -> {} ({} files)",
            "Packed".green().bold(),
            dir.display(),
            archive.display().to_string().white(),
            files
        );
    }

    Ok(())
}
