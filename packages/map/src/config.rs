//! Map rendering configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it wants
//! to override:
//!
//! ```toml
//! overview_zoom = 8
//! region = "Telangana, India"
//!
//! [default_center]
//! latitude = 17.385
//! longitude = 78.4867
//! ```

use std::path::Path;

use crime_atlas_crime_models::Coordinate;
use serde::{Deserialize, Serialize};

use crate::MapError;

/// Center of Andhra Pradesh, used when there is nothing better to center on.
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(15.9129, 79.7400);

/// A selectable base tile layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    /// Name shown in the layer switcher.
    pub name: String,
    /// Tile URL template with `{z}`, `{x}`, `{y}` (and optionally `{s}`).
    pub url: String,
    /// Attribution HTML shown in the map corner.
    pub attribution: String,
}

impl TileLayer {
    fn new(name: &str, url: &str, attribution: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            attribution: attribution.to_string(),
        }
    }
}

/// Settings shared by every rendered map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Center used for the overview, placeholder, and route maps.
    pub default_center: Coordinate,
    /// Zoom of the full-dataset overview map.
    pub overview_zoom: u8,
    /// Zoom of filtered maps centered on their results.
    pub filtered_zoom: u8,
    /// Zoom of route maps.
    pub route_zoom: u8,
    /// CSS height of the embedded map frame.
    pub height: String,
    /// Region appended to navigation destinations, e.g. `"<place>, <region>"`.
    pub region: String,
    /// Heat layer point radius in pixels.
    pub heat_radius: u32,
    /// Whether to add a fullscreen control.
    pub fullscreen_control: bool,
    /// Whether the overview map gets a distance measuring control.
    pub measure_control: bool,
    /// Base layers; the first one is shown initially.
    pub tile_layers: Vec<TileLayer>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            overview_zoom: 7,
            filtered_zoom: 9,
            route_zoom: 10,
            height: "600px".to_string(),
            region: "Andhra Pradesh, India".to_string(),
            heat_radius: 25,
            fullscreen_control: true,
            measure_control: true,
            tile_layers: vec![
                TileLayer::new(
                    "OpenStreetMap",
                    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                    "&copy; OpenStreetMap contributors",
                ),
                TileLayer::new(
                    "CartoDB positron",
                    "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png",
                    "&copy; OpenStreetMap contributors &copy; CARTO",
                ),
                TileLayer::new(
                    "CartoDB dark_matter",
                    "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
                    "&copy; OpenStreetMap contributors &copy; CARTO",
                ),
            ],
        }
    }
}

impl MapConfig {
    /// Parses a TOML document, filling unspecified fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Config`] if the document is not valid TOML or a
    /// field has the wrong type.
    pub fn from_toml_str(s: &str) -> Result<Self, MapError> {
        let config: Self = toml::from_str(s)?;
        if config.tile_layers.is_empty() {
            return Err(MapError::InvalidConfig {
                message: "at least one tile layer is required".to_string(),
            });
        }
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Io`] if the file cannot be read, or
    /// [`MapError::Config`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded map config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(MapConfig::from_toml_str("").unwrap(), MapConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_named_keys() {
        let config = MapConfig::from_toml_str(
            r#"
            overview_zoom = 8
            region = "Telangana, India"

            [default_center]
            latitude = 17.385
            longitude = 78.4867
            "#,
        )
        .unwrap();

        assert_eq!(config.overview_zoom, 8);
        assert_eq!(config.region, "Telangana, India");
        assert_eq!(config.default_center, Coordinate::new(17.385, 78.4867));
        assert_eq!(config.filtered_zoom, MapConfig::default().filtered_zoom);
        assert_eq!(config.tile_layers.len(), 3);
    }

    #[test]
    fn custom_tile_layers_replace_defaults() {
        let config = MapConfig::from_toml_str(
            r#"
            [[tile_layers]]
            name = "Local"
            url = "http://localhost/{z}/{x}/{y}.png"
            attribution = "local"
            "#,
        )
        .unwrap();
        assert_eq!(config.tile_layers.len(), 1);
        assert_eq!(config.tile_layers[0].name, "Local");
    }

    #[test]
    fn rejects_empty_tile_layer_list() {
        let err = MapConfig::from_toml_str("tile_layers = []").unwrap_err();
        assert!(matches!(err, MapError::InvalidConfig { .. }));
    }

    #[test]
    fn rejects_wrong_types() {
        let err = MapConfig::from_toml_str("overview_zoom = \"seven\"").unwrap_err();
        assert!(matches!(err, MapError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.toml");
        std::fs::write(&path, "height = \"400px\"\n").unwrap();
        assert_eq!(MapConfig::load(&path).unwrap().height, "400px");
    }
}
