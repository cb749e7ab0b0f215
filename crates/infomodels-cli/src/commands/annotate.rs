//! Annotate command - checksum data files and write metadata.csv.

use std::path::PathBuf;

use colored::Colorize;
use infomodels::{Annotation, DataDirectory};

use crate::config::Config;

pub fn run(
    config: &Config,
    dir: PathBuf,
    site: String,
    data_version: String,
    etl: String,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut data = DataDirectory::open(&dir)?;

    let (model, version) = config
        .model_for(&data)
        .ok_or("A data model is required: pass --model or annotate a directory that has metadata")?;

    let model_version = match version {
        Some(v) => v,
        None => config.load_model(&model, None)?.version,
    };

    let annotation = Annotation {
        site,
        model,
        model_version,
        data_version,
        etl,
    };

    let count = data.annotate(&annotation)?.len();
    let path = data.write_metadata()?;
    tracing::info!(datadir = %dir.display(), files = count, "annotated data directory");

    if json {
        println!("{}", serde_json::to_string_pretty(data.records())?);
        return Ok(());
    }

    println!(
        "{} {} files in {}",
        "Annotated".green().bold(),
        count.to_string().white().bold(),
        dir.display()
    );
    for record in data.records() {
        println!("  {:30} {}", record.filename, record.table.cyan());
    }
    println!("Metadata written to {}", path.display().to_string().white());

    Ok(())
}
