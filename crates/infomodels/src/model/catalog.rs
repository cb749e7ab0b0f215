//! Local catalog of model definitions stored as `<root>/<model>/<version>.json`.

use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{InfomodelsError, Result};

use super::types::ModelDefinition;

/// Directory-backed source of model definitions.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    root: PathBuf,
}

impl ModelCatalog {
    /// Open a catalog rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(InfomodelsError::Config(format!(
                "model directory '{}' does not exist",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Available versions of a model, oldest first.
    pub fn versions(&self, model: &str) -> Result<Vec<String>> {
        let dir = self.root.join(model);
        if !dir.is_dir() {
            return Err(InfomodelsError::UnknownModel(model.to_string()));
        }

        let mut versions = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| InfomodelsError::io(&dir, e))? {
            let path = entry.map_err(|e| InfomodelsError::io(&dir, e))?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem() {
                    versions.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        versions.sort_by(|a, b| compare_versions(a, b));
        Ok(versions)
    }

    /// Load one model version.
    pub fn load(&self, model: &str, version: &str) -> Result<ModelDefinition> {
        let path = self.root.join(model).join(format!("{}.json", version));
        let file = File::open(&path).map_err(|e| InfomodelsError::io(&path, e))?;
        let definition: ModelDefinition = serde_json::from_reader(BufReader::new(file))?;
        Ok(definition)
    }

    /// Load a model at `version`, or its latest version when none is given.
    pub fn resolve(&self, model: &str, version: Option<&str>) -> Result<ModelDefinition> {
        let versions = self.versions(model)?;

        let chosen = match version {
            Some(v) => versions
                .iter()
                .find(|candidate| candidate.as_str() == v)
                .cloned()
                .ok_or_else(|| InfomodelsError::UnknownVersion {
                    model: model.to_string(),
                    version: v.to_string(),
                    available: versions.clone(),
                })?,
            None => versions
                .last()
                .cloned()
                .ok_or_else(|| InfomodelsError::UnknownModel(model.to_string()))?,
        };

        tracing::info!(model, version = %chosen, "using model definition");
        self.load(model, &chosen)
    }
}

/// Compare dotted versions numerically where both parts are numbers.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}
