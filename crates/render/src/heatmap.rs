use std::{fs, path::Path};

use anyhow::Result;
use serde_json::json;

use model::TrafficReading;

#[derive(Clone, Debug)]
pub struct HeatmapOptions {
    /// Base-map centre (lat, lon).
    pub center: (f64, f64),
    pub zoom: u32,
    pub radius: u32,
    pub max_zoom: u32,
    /// Congestion index is multiplied by this before becoming a heat
    /// weight, purely for visibility.
    pub weight_scale: f64,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            center: (12.9716, 77.5946), // Bengaluru
            zoom: 11,
            radius: 15,
            max_zoom: 13,
            weight_scale: 5.0,
        }
    }
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Traffic Congestion Heatmap</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map').setView([__CENTER_LAT__, __CENTER_LON__], __ZOOM__);
L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
    maxZoom: 19,
    attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);
L.heatLayer(__HEAT_DATA__, { radius: __RADIUS__, maxZoom: __MAX_ZOOM__ }).addTo(map);
</script>
</body>
</html>
"#;

/// Writes a self-contained heatmap document to `out`: one weighted
/// point per reading over a base map.
pub fn render_heatmap(
    readings: &[TrafficReading],
    opts: &HeatmapOptions,
    out: &Path,
) -> Result<()> {
    let heat: Vec<_> = readings
        .iter()
        .map(|r| json!([r.lat, r.lon, r.congestion_index * opts.weight_scale]))
        .collect();
    let doc = TEMPLATE
        .replace("__CENTER_LAT__", &opts.center.0.to_string())
        .replace("__CENTER_LON__", &opts.center.1.to_string())
        .replace("__ZOOM__", &opts.zoom.to_string())
        .replace("__RADIUS__", &opts.radius.to_string())
        .replace("__MAX_ZOOM__", &opts.max_zoom.to_string())
        .replace("__HEAT_DATA__", &serde_json::to_string(&heat)?);
    fs::write(out, doc)?;
    Ok(())
}
