use std::path::PathBuf;

use anyhow::{Context, Result};

use flow_ingest_core::CollectorConfig;
use flow_ingest_tomtom::TomTomConfig;
use render::HeatmapOptions;

pub const API_KEY_VAR: &str = "TOMTOM_API_KEY";
pub const TOP_HOTSPOTS: usize = 10;

const LOG_FILE: &str = "traffic_log.csv";
const HEATMAP_FILE: &str = "bengaluru_traffic.html";
const HOTSPOTS_FILE: &str = "congestion_hotspots.png";
const TREND_FILE: &str = "congestion_trend.png";

/// Everything the run needs, resolved once at startup and handed down
/// explicitly. Only the credential comes from the environment; the
/// bounding box, grid step and output paths are fixed.
pub struct AppConfig {
    pub collector: CollectorConfig,
    pub tomtom: TomTomConfig,
    pub heatmap: HeatmapOptions,
    pub log_file: PathBuf,
    pub heatmap_file: PathBuf,
    pub hotspots_file: PathBuf,
    pub trend_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .with_context(|| format!("{API_KEY_VAR} is not set"))?;
        Ok(Self {
            collector: CollectorConfig::default(),
            tomtom: TomTomConfig::new(api_key),
            heatmap: HeatmapOptions::default(),
            log_file: LOG_FILE.into(),
            heatmap_file: HEATMAP_FILE.into(),
            hotspots_file: HOTSPOTS_FILE.into(),
            trend_file: TREND_FILE.into(),
        })
    }
}
