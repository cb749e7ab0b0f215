//! Load command - create the model's tables and load a data directory.

use std::path::{Path, PathBuf};

use colored::Colorize;
use infomodels::{DataDirectory, InfomodelsError, ModelDefinition, Warehouse};

use crate::config::Config;

pub fn run(
    config: &Config,
    dir: PathBuf,
    schema: String,
    replace: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let warehouse = config.warehouse(&schema)?;
    let (model, files) = load_directory(config, &warehouse, &dir, replace)?;

    tracing::info!(
        datadir = %dir.display(),
        schema = warehouse.schema(),
        model = %model.name,
        version = %model.version,
        files,
        "loaded data directory"
    );

    println!(
        "{} {} files into {} ({} {})",
        "Loaded".green().bold(),
        files.to_string().white().bold(),
        warehouse.schema().cyan(),
        model.name,
        model.version
    );

    Ok(())
}

/// Verify a data directory and load it into fresh tables.
///
/// A schema that already holds tables is refused unless `replace` is set, in
/// which case those tables are dropped first. Returns the model used and the
/// number of files loaded.
pub fn load_directory(
    config: &Config,
    warehouse: &Warehouse,
    dir: &Path,
    replace: bool,
) -> Result<(ModelDefinition, usize), Box<dyn std::error::Error>> {
    let data = DataDirectory::open(dir)?;
    data.verify()?;

    let state = match warehouse.resolve_state() {
        Ok(state) => Ok(state),
        Err(InfomodelsError::SchemaState(e)) => Err(e),
        Err(e) => return Err(e.into()),
    };

    let (model_name, version) = match config.model_for(&data) {
        Some(choice) => choice,
        None => {
            let active = state.clone().map_err(InfomodelsError::from)?;
            let (model, version) = config.model_or_state(active);
            (model, Some(version))
        }
    };
    let model = config.load_model(&model_name, version.as_deref())?;

    match state {
        Ok(active) if replace => {
            tracing::info!(
                schema = warehouse.schema(),
                model = %active.model,
                version = %active.model_version,
                "dropping active tables"
            );
            warehouse.drop_tables(&active.model, &active.model_version)?;
        }
        Ok(active) => {
            return Err(InfomodelsError::SchemaInUse {
                schema: warehouse.schema().to_string(),
                model: active.model,
                model_version: active.model_version,
            }
            .into());
        }
        Err(e) => tracing::debug!(reason = %e, "no active tables in schema"),
    }

    // TODO: wipe partially loaded tables when a load fails so it can simply be retried.
    warehouse.create_tables(&model)?;
    let files = warehouse.load(&data, &model)?;
    Ok((model, files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{config, data_dir};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_second_load_needs_replace() {
        let root = TempDir::new().unwrap();
        let config = config(root.path());
        let warehouse = config.warehouse("dcc").unwrap();
        let first = data_dir(root.path(), "v1", &[("person.csv", "person_id\n1\n")]);
        let second = data_dir(root.path(), "v2", &[("person.csv", "person_id\n2\n")]);

        let (model, files) = load_directory(&config, &warehouse, &first, false).unwrap();
        assert_eq!((model.version.as_str(), files), ("2.0.0", 1));

        let err = load_directory(&config, &warehouse, &second, false).unwrap_err();
        let err = err.downcast::<InfomodelsError>().unwrap();
        assert!(matches!(*err, InfomodelsError::SchemaInUse { ref schema, .. } if schema == "dcc"));
        assert_eq!(
            fs::read_to_string(warehouse.table_path("person")).unwrap(),
            "person_id\n1\n"
        );

        load_directory(&config, &warehouse, &second, true).unwrap();
        assert_eq!(
            fs::read_to_string(warehouse.table_path("person")).unwrap(),
            "person_id\n2\n"
        );
        assert!(warehouse.resolve_state().is_ok());
    }

    #[test]
    fn test_model_falls_back_to_schema_state() {
        let root = TempDir::new().unwrap();
        let config = config(root.path());
        let warehouse = config.warehouse("dcc").unwrap();
        let annotated = data_dir(root.path(), "v1", &[("person.csv", "person_id\n1\n")]);
        load_directory(&config, &warehouse, &annotated, false).unwrap();

        // Metadata without a model names neither model nor version.
        let bare = root.path().join("bare");
        fs::create_dir_all(&bare).unwrap();
        fs::write(bare.join("person.csv"), "person_id\n3\n").unwrap();
        let checksum = infomodels::datadir::checksum(&bare.join("person.csv")).unwrap();
        fs::write(
            bare.join("metadata.csv"),
            format!("filename,table,checksum\nperson.csv,person,{}\n", checksum),
        )
        .unwrap();

        let (model, _) = load_directory(&config, &warehouse, &bare, true).unwrap();
        assert_eq!(model.name, "pedsnet");
    }

    #[test]
    fn test_no_model_and_no_state() {
        let root = TempDir::new().unwrap();
        let config = config(root.path());
        let warehouse = config.warehouse("dcc").unwrap();

        let bare = root.path().join("bare");
        fs::create_dir_all(&bare).unwrap();
        fs::write(bare.join("person.csv"), "person_id\n3\n").unwrap();
        let checksum = infomodels::datadir::checksum(&bare.join("person.csv")).unwrap();
        fs::write(
            bare.join("metadata.csv"),
            format!("filename,table,checksum\nperson.csv,person,{}\n", checksum),
        )
        .unwrap();

        let err = load_directory(&config, &warehouse, &bare, false).unwrap_err();
        let err = err.downcast::<InfomodelsError>().unwrap();
        assert!(matches!(*err, InfomodelsError::SchemaState(_)));
    }
}
