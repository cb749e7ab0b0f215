//! Packing data directories into tar archives and back.
//!
//! Archives are plain, uncompressed tar files with entries in sorted order, so
//! packing the same directory twice yields the same entry list.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tar::{Archive, Builder};

use crate::error::{InfomodelsError, Result};

/// Default archive path for a data directory: `<dir>.tar` next to it.
pub fn default_archive_path(dir: &Path) -> PathBuf {
    let mut name = dir
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "data".into());
    name.push(".tar");
    dir.with_file_name(name)
}

/// Pack every file under `dir` into a tar archive at `output`.
///
/// Returns the number of files written.
pub fn pack(dir: &Path, output: &Path) -> Result<usize> {
    if !dir.is_dir() {
        return Err(InfomodelsError::DataDirectory(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let mut entries = Vec::new();
    collect_entries(dir, "", &mut entries)?;
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let file = File::create(output).map_err(|e| InfomodelsError::io(output, e))?;
    let mut builder = Builder::new(BufWriter::new(file));

    let mut files = 0;
    for (archive_path, fs_path) in &entries {
        if fs_path.is_dir() {
            builder
                .append_dir(archive_path, fs_path)
                .map_err(|e| InfomodelsError::io(fs_path, e))?;
        } else {
            let mut file = File::open(fs_path).map_err(|e| InfomodelsError::io(fs_path, e))?;
            builder
                .append_file(archive_path, &mut file)
                .map_err(|e| InfomodelsError::io(fs_path, e))?;
            files += 1;
        }
    }

    let mut writer = builder
        .into_inner()
        .map_err(|e| InfomodelsError::io(output, e))?;
    writer.flush().map_err(|e| InfomodelsError::io(output, e))?;

    tracing::debug!(archive = %output.display(), files, "packed data directory");
    Ok(files)
}

/// Extract a tar archive into `dest`, creating it if needed.
pub fn unpack(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive).map_err(|e| InfomodelsError::io(archive, e))?;
    fs::create_dir_all(dest).map_err(|e| InfomodelsError::io(dest, e))?;

    Archive::new(BufReader::new(file))
        .unpack(dest)
        .map_err(|e| InfomodelsError::io(archive, e))?;

    tracing::debug!(archive = %archive.display(), dest = %dest.display(), "unpacked archive");
    Ok(())
}

fn collect_entries(dir: &Path, prefix: &str, entries: &mut Vec<(String, PathBuf)>) -> Result<()> {
    let listing = fs::read_dir(dir).map_err(|e| InfomodelsError::io(dir, e))?;

    for entry in listing {
        let entry = entry.map_err(|e| InfomodelsError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let archive_path = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };

        let path = entry.path();
        if path.is_dir() {
            collect_entries(&path, &archive_path, entries)?;
        }
        entries.push((archive_path, path));
    }

    Ok(())
}
