//! Resolution of the dataset and map config paths.
//!
//! A command-line flag wins over the environment variable, which wins over
//! the built-in default.

use std::path::{Path, PathBuf};

use crime_atlas_api::CrimeAtlas;
use crime_atlas_map::MapError;
use crime_atlas_map::config::MapConfig;

/// Environment variable naming the incident CSV.
pub const DATA_ENV: &str = "CRIME_ATLAS_DATA";

/// Environment variable naming the map config TOML file.
pub const CONFIG_ENV: &str = "CRIME_ATLAS_CONFIG";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`.
///
/// # Panics
///
/// Panics if the project root cannot be resolved.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("Failed to find project root from CARGO_MANIFEST_DIR")
        .to_path_buf()
}

/// Returns the default dataset path, `data/crime_data.csv` under the
/// project root.
#[must_use]
pub fn default_dataset_path() -> PathBuf {
    project_root().join("data").join("crime_data.csv")
}

/// Picks the dataset path from the flag, then `env`, then the default.
#[must_use]
pub fn dataset_path(flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
    flag.or_else(|| non_empty(env).map(PathBuf::from))
        .unwrap_or_else(default_dataset_path)
}

/// Picks the config path from the flag, then `env`. `None` means built-in
/// defaults.
#[must_use]
pub fn config_path(flag: Option<PathBuf>, env: Option<String>) -> Option<PathBuf> {
    flag.or_else(|| non_empty(env).map(PathBuf::from))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Loads the map config at `path`, or the defaults when there is none.
///
/// # Errors
///
/// Returns a [`MapError`] if the file cannot be read or parsed.
pub fn map_config(path: Option<&Path>) -> Result<MapConfig, MapError> {
    path.map_or_else(|| Ok(MapConfig::default()), MapConfig::load)
}

/// Builds a [`CrimeAtlas`] from the command-line flags and the process
/// environment.
///
/// # Errors
///
/// Returns a [`MapError`] if a config file was named but is unusable.
pub fn atlas(data: Option<PathBuf>, config: Option<PathBuf>) -> Result<CrimeAtlas, MapError> {
    let dataset = dataset_path(data, std::env::var(DATA_ENV).ok());
    let config_file = config_path(config, std::env::var(CONFIG_ENV).ok());
    let atlas = CrimeAtlas::new(dataset, map_config(config_file.as_deref())?);

    log::info!("Using dataset {}", atlas.dataset().display());

    Ok(atlas)
}
