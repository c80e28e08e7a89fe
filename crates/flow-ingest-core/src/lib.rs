//! Core flow-sampling traits and the sequential snapshot collector

use std::time::Duration;

use serde::{Deserialize, Serialize};

use model::{sample_grid, BoundingBox, SamplePoint, Snapshot, TrafficReading};

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("{0}")]
    Msg(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Trait for any live flow-data source.
///
/// `Ok(None)` is the absence signal: the source had nothing usable for
/// this point (rate limit, auth failure, no road segment nearby — all
/// indistinguishable by design) and the caller skips it silently.
/// `Err` is reserved for unexpected failures and aborts the sweep.
#[async_trait::async_trait]
pub trait FlowSource: Send + Sync {
    async fn sample(&self, point: SamplePoint) -> Result<Option<TrafficReading>, FlowError>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollectorConfig {
    pub bbox: BoundingBox,
    pub grid_step: f64,
    /// Fixed sleep after every request, successful or not.
    pub pace: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            // Bengaluru, ~5 km spacing
            bbox: BoundingBox {
                lat_min: 12.85,
                lon_min: 77.45,
                lat_max: 13.10,
                lon_max: 77.75,
            },
            grid_step: 0.05,
            pace: Duration::from_millis(200),
        }
    }
}

/// One full grid sweep: every point sampled strictly in sequence, with
/// the configured pace between calls as a crude rate limiter. Readings
/// come back in grid order; the snapshot may be empty.
pub async fn collect_snapshot(
    source: &dyn FlowSource,
    cfg: &CollectorConfig,
) -> Result<Snapshot, FlowError> {
    let points = sample_grid(&cfg.bbox, cfg.grid_step);
    let mut snapshot = Snapshot::new();
    for point in points {
        if let Some(reading) = source.sample(point).await? {
            snapshot.readings.push(reading);
        }
        tokio::time::sleep(cfg.pace).await;
    }
    Ok(snapshot)
}
