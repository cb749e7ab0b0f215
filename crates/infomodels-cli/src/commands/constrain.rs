//! Constrain command - create or drop the model's constraints.

use std::time::Instant;

use colored::Colorize;

use crate::config::Config;

pub fn run(config: &Config, schema: String, undo: bool) -> Result<(), Box<dyn std::error::Error>> {
    let warehouse = config.warehouse(&schema)?;

    let (model, version) = match (&config.model, &config.model_version) {
        (Some(m), Some(v)) => (m.clone(), v.clone()),
        _ => config.model_or_state(warehouse.resolve_state()?),
    };

    // Fails early on a model or version the catalog does not know.
    config.load_model(&model, Some(&version))?;

    let start = Instant::now();
    let action = if undo {
        warehouse.drop_constraints(&model, &version)?;
        "Dropped"
    } else {
        warehouse.create_constraints(&model, &version)?;
        "Created"
    };

    tracing::info!(
        schema = warehouse.schema(),
        model = %model,
        version = %version,
        undo,
        duration_minutes = start.elapsed().as_secs_f64() / 60.0,
        "constraints updated"
    );

    println!(
        "{} constraints for {} {} in {}",
        action.green().bold(),
        model,
        version,
        warehouse.schema().cyan()
    );

    Ok(())
}
