//! HTML generation for map documents.
//!
//! A [`MapDocument`] is serialized to JSON and handed to a small Leaflet
//! bootstrap script. The resulting page is embedded through an `<iframe
//! srcdoc>` so that the fragment can be inserted anywhere (including via
//! `innerHTML`) and its scripts still run.

use serde::Serialize;
use uuid::Uuid;

use crate::MapError;
use crate::config::{MapConfig, TileLayer};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const CLUSTER_CSS: &str = "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css";
const CLUSTER_DEFAULT_CSS: &str =
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css";
const CLUSTER_JS: &str =
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js";
const HEAT_JS: &str = "https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js";
const FULLSCREEN_CSS: &str =
    "https://unpkg.com/leaflet.fullscreen@3.0.2/Control.FullScreen.css";
const FULLSCREEN_JS: &str = "https://unpkg.com/leaflet.fullscreen@3.0.2/Control.FullScreen.js";
const MEASURE_CSS: &str = "https://unpkg.com/leaflet-measure@3.1.0/dist/leaflet-measure.css";
const MEASURE_JS: &str = "https://unpkg.com/leaflet-measure@3.1.0/dist/leaflet-measure.js";

/// Builds the map from a serialized [`MapDocument`]. Plugin controls are
/// skipped when their script failed to load.
const BOOTSTRAP_JS: &str = r"(function (elementId, doc) {
    var map = L.map(elementId, { center: doc.center, zoom: doc.zoom });
    var baseLayers = {};
    doc.tileLayers.forEach(function (t, i) {
        var layer = L.tileLayer(t.url, { attribution: t.attribution, maxZoom: 18 });
        baseLayers[t.name] = layer;
        if (i === 0) { layer.addTo(map); }
    });
    var overlays = {};
    var markers = doc.cluster && L.markerClusterGroup ? L.markerClusterGroup() : L.layerGroup();
    doc.markers.forEach(function (m) {
        var marker = L.circleMarker(m.position, {
            radius: 8, color: '#fff', weight: 2, fillColor: m.color, fillOpacity: 0.9
        });
        if (m.tooltip) { marker.bindTooltip(m.tooltip); }
        if (m.popup) { marker.bindPopup(m.popup, { maxWidth: 300 }); }
        markers.addLayer(marker);
    });
    markers.addTo(map);
    overlays[doc.markerLayerName] = markers;
    if (doc.heatLayerName && doc.heat.length && L.heatLayer) {
        var heat = L.heatLayer(doc.heat, { radius: doc.heatRadius });
        heat.addTo(map);
        overlays[doc.heatLayerName] = heat;
    }
    L.control.layers(baseLayers, overlays).addTo(map);
    if (doc.fullscreen && L.control.fullscreen) { L.control.fullscreen().addTo(map); }
    if (doc.measure && L.control.measure) { L.control.measure().addTo(map); }
})";

/// One marker on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// `[latitude, longitude]`.
    pub position: [f64; 2],
    /// CSS color name for the marker fill.
    pub color: &'static str,
    /// Hover text (HTML, already escaped).
    pub tooltip: String,
    /// Click popup (HTML, already escaped).
    pub popup: String,
}

/// Everything the bootstrap script needs to draw one map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    /// Initial `[latitude, longitude]` view center.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: u8,
    /// Base tile layers.
    pub tile_layers: Vec<TileLayer>,
    /// Markers to draw.
    pub markers: Vec<Marker>,
    /// Whether markers are grouped into density clusters.
    pub cluster: bool,
    /// Layer switcher label for the marker group.
    pub marker_layer_name: String,
    /// Heat layer points, `[latitude, longitude]`.
    pub heat: Vec<[f64; 2]>,
    /// Heat layer label; `None` disables the heat layer.
    pub heat_layer_name: Option<String>,
    /// Heat point radius in pixels.
    pub heat_radius: u32,
    /// Whether to add a fullscreen control.
    pub fullscreen: bool,
    /// Whether to add a distance measuring control.
    pub measure: bool,
}

impl MapDocument {
    /// Creates an empty document with the config's tile layers and
    /// controls.
    #[must_use]
    pub fn new(config: &MapConfig, center: [f64; 2], zoom: u8) -> Self {
        Self {
            center,
            zoom,
            tile_layers: config.tile_layers.clone(),
            markers: Vec::new(),
            cluster: false,
            marker_layer_name: "Incidents".to_string(),
            heat: Vec::new(),
            heat_layer_name: None,
            heat_radius: config.heat_radius,
            fullscreen: config.fullscreen_control,
            measure: false,
        }
    }

    /// Renders the document as an embeddable `<iframe>` fragment.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Serialize`] if the document cannot be encoded.
    pub fn to_html(&self, height: &str) -> Result<String, MapError> {
        let element_id = format!("crime_atlas_map_{}", Uuid::new_v4().simple());
        // `<` never appears outside JSON strings, so escaping it keeps a
        // `</script>` inside a popup from closing the script block.
        let json = serde_json::to_string(self)?.replace('<', "\\u003c");

        let mut styles = vec![LEAFLET_CSS, CLUSTER_CSS, CLUSTER_DEFAULT_CSS];
        let mut scripts = vec![LEAFLET_JS, CLUSTER_JS, HEAT_JS];
        if self.fullscreen {
            styles.push(FULLSCREEN_CSS);
            scripts.push(FULLSCREEN_JS);
        }
        if self.measure {
            styles.push(MEASURE_CSS);
            scripts.push(MEASURE_JS);
        }

        let head: String = styles
            .iter()
            .map(|href| format!("<link rel=\"stylesheet\" href=\"{href}\"/>"))
            .chain(
                scripts
                    .iter()
                    .map(|src| format!("<script src=\"{src}\"></script>")),
            )
            .collect();

        let page = format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"/>{head}\
             <style>html,body{{width:100%;height:100%;margin:0;padding:0;}}\
             #{element_id}{{position:absolute;top:0;bottom:0;left:0;right:0;}}</style>\
             </head><body><div id=\"{element_id}\"></div>\
             <script>{BOOTSTRAP_JS}(\"{element_id}\", {json});</script></body></html>"
        );

        Ok(format!(
            "<div class=\"crime-atlas-map\" style=\"width:100%;height:{height};\">\
             <iframe srcdoc=\"{}\" style=\"width:100%;height:100%;border:none;\" \
             allowfullscreen></iframe></div>",
            html_escape(&page),
            height = html_escape(height),
        ))
    }
}

/// Escapes text for use in HTML element content and attribute values.
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
