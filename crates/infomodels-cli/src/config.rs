//! Settings shared by every command, resolved once from flags and environment.

use std::path::PathBuf;

use infomodels::{DataDirectory, ModelCatalog, ModelDefinition, SchemaState, Warehouse};

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct Config {
    pub models: PathBuf,
    pub warehouse: PathBuf,
    /// `--model` override.
    pub model: Option<String>,
    /// `--modelv` override.
    pub model_version: Option<String>,
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            models: cli.models.clone(),
            warehouse: cli.warehouse.clone(),
            model: cli.model.clone().filter(|m| !m.is_empty()),
            model_version: cli.modelv.clone().filter(|v| !v.is_empty()),
        }
    }
}

impl Config {
    pub fn catalog(&self) -> infomodels::Result<ModelCatalog> {
        ModelCatalog::open(&self.models)
    }

    pub fn warehouse(&self, search_path: &str) -> infomodels::Result<Warehouse> {
        Warehouse::open(&self.warehouse, search_path)
    }

    /// Pick the model for a data directory: overrides first, then its metadata.
    ///
    /// A version is only taken from the metadata when the model came from there too.
    pub fn model_for(&self, data: &DataDirectory) -> Option<(String, Option<String>)> {
        match &self.model {
            Some(model) => Some((model.clone(), self.model_version.clone())),
            None => data.model().map(|model| {
                let version = self
                    .model_version
                    .clone()
                    .or_else(|| data.model_version().map(String::from));
                (model.to_string(), version)
            }),
        }
    }

    /// Fill in whatever the overrides leave open from the schema's state.
    pub fn model_or_state(&self, state: SchemaState) -> (String, String) {
        (
            self.model.clone().unwrap_or(state.model),
            self.model_version.clone().unwrap_or(state.model_version),
        )
    }

    /// Load a model definition from the catalog.
    pub fn load_model(&self, model: &str, version: Option<&str>) -> infomodels::Result<ModelDefinition> {
        self.catalog()?.resolve(model, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_empty_overrides_are_ignored() {
        let cli = Cli::try_parse_from(["infomodels", "-m", "", "expand", "a.tar"]).unwrap();
        let config = Config::from(&cli);
        assert!(config.model.is_none());
    }

    #[test]
    fn test_state_fills_missing_version() {
        let cli = Cli::try_parse_from(["infomodels", "-m", "pcornet", "expand", "a.tar"]).unwrap();
        let config = Config::from(&cli);
        let (model, version) = config.model_or_state(SchemaState {
            model: "pedsnet".to_string(),
            model_version: "2.0.0".to_string(),
        });
        assert_eq!(model, "pcornet");
        assert_eq!(version, "2.0.0");
    }
}
