use anyhow::Context;
use chrono::Local;
use serde::Deserialize;

use flow_ingest_core::{FlowError, FlowSource};
use model::{congestion_index, SamplePoint, TrafficReading};

const FLOW_ENDPOINT: &str =
    "https://api.tomtom.com/traffic/services/4/flowSegmentData/absolute/10/json";

#[derive(Clone, Debug)]
pub struct TomTomConfig {
    pub api_key: String,
    pub endpoint: String,
}

impl TomTomConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: FLOW_ENDPOINT.into(),
        }
    }
}

pub struct TomTomSource {
    cfg: TomTomConfig,
    client: reqwest::Client,
}

impl TomTomSource {
    pub fn new(cfg: TomTomConfig) -> Self {
        Self {
            cfg,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FlowResponse {
    #[serde(rename = "flowSegmentData")]
    flow_segment_data: FlowSegmentData,
}

#[derive(Debug, Deserialize)]
struct FlowSegmentData {
    #[serde(rename = "currentSpeed")]
    current_speed: f64,
    #[serde(rename = "freeFlowSpeed")]
    free_flow_speed: f64,
}

#[async_trait::async_trait]
impl FlowSource for TomTomSource {
    async fn sample(&self, point: SamplePoint) -> Result<Option<TrafficReading>, FlowError> {
        let resp = self
            .client
            .get(&self.cfg.endpoint)
            .query(&[
                ("point", format!("{},{}", point.lat, point.lon)),
                ("key", self.cfg.api_key.clone()),
            ])
            .send()
            .await
            .with_context(|| format!("flow request for {},{}", point.lat, point.lon))?;

        // Rate limiting, bad credentials and "no segment here" all land
        // in the same bucket: no data for this point.
        if !resp.status().is_success() {
            return Ok(None);
        }

        let body: FlowResponse = resp
            .json()
            .await
            .context("malformed flow segment response")?;
        Ok(Some(reading_from(point, &body.flow_segment_data)))
    }
}

fn reading_from(point: SamplePoint, data: &FlowSegmentData) -> TrafficReading {
    TrafficReading {
        timestamp: Local::now().naive_local(),
        lat: point.lat,
        lon: point.lon,
        current_speed: data.current_speed,
        free_flow_speed: data.free_flow_speed,
        congestion_index: congestion_index(data.current_speed, data.free_flow_speed),
    }
}
