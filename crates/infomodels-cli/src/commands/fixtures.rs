//! Shared setup for command tests: a model catalog and annotated data directories.

use std::fs;
use std::path::{Path, PathBuf};

use infomodels::{Annotation, DataDirectory};

use crate::config::Config;

const MODEL_JSON: &str = r#"{
    "name": "pedsnet",
    "version": "2.0.0",
    "tables": [
        {
            "name": "person",
            "fields": [{"name": "person_id", "type": "integer", "required": true}]
        },
        {
            "name": "visit_occurrence",
            "fields": [
                {"name": "visit_occurrence_id", "type": "integer", "required": true},
                {"name": "person_id", "type": "integer", "required": true}
            ]
        }
    ]
}"#;

/// Config with a one-model catalog and a warehouse, both under `root`.
pub fn config(root: &Path) -> Config {
    let models = root.join("models");
    fs::create_dir_all(models.join("pedsnet")).unwrap();
    fs::write(models.join("pedsnet").join("2.0.0.json"), MODEL_JSON).unwrap();

    Config {
        models,
        warehouse: root.join("warehouse"),
        model: None,
        model_version: None,
    }
}

/// Write `files` into `root/name` and annotate it for pedsnet 2.0.0.
pub fn data_dir(root: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for (file, contents) in files {
        fs::write(dir.join(file), contents).unwrap();
    }

    let mut data = DataDirectory::open(&dir).unwrap();
    data.annotate(&Annotation {
        site: "CHOP".to_string(),
        model: "pedsnet".to_string(),
        model_version: "2.0.0".to_string(),
        data_version: "1".to_string(),
        etl: String::new(),
    })
    .unwrap();
    data.write_metadata().unwrap();
    dir
}
