// ============================================================
// Layer 6 — Hyperparameter Configuration
// ============================================================
// Reads trainer hyperparameters from an optional JSON file:
//
//   {
//     "vector_size": 100,
//     "window": 5,
//     "min_count": 1,
//     "workers": 4,
//     "algorithm": "skip-gram"
//   }
//
// Missing keys fall back to the baseline values; unknown keys
// are ignored (and logged, since they are usually typos).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::hyperparameters::Hyperparameters;

/// Keys the hyperparameter boundary recognises
const KNOWN_KEYS: &[&str] = &["vector_size", "window", "min_count", "workers", "algorithm"];

/// Load hyperparameters from `path`, or return the baseline when
/// no file is given.
pub fn load_hyperparameters(path: Option<&Path>) -> Result<Hyperparameters> {
    let Some(path) = path else {
        return Ok(Hyperparameters::default());
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

    let params = parse_hyperparameters(&json)
        .with_context(|| format!("Invalid config in '{}'", path.display()))?;

    tracing::info!("Loaded hyperparameters from '{}': {:?}", path.display(), params);
    Ok(params)
}

/// Parse a JSON mapping of hyperparameters.
pub fn parse_hyperparameters(json: &str) -> Result<Hyperparameters> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let map = value
        .as_object()
        .context("hyperparameters must be a JSON object")?;
    for key in map.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        tracing::warn!("Ignoring unknown hyperparameter '{}'", key);
    }

    Ok(serde_json::from_value(value)?)
}
