use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geographic box, degrees. Invariant: min strictly below max on both axes.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lon_min: f64,
    pub lat_max: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn new(lat_min: f64, lon_min: f64, lat_max: f64, lon_max: f64) -> Option<Self> {
        if lat_min < lat_max && lon_min < lon_max {
            Some(Self {
                lat_min,
                lon_min,
                lat_max,
                lon_max,
            })
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct SamplePoint {
    pub lat: f64,
    pub lon: f64,
}

// Allow the last row/column to sit on the boundary even when
// (max - min) / step lands just under a whole number.
const GRID_EPSILON: f64 = 1e-9;

/// Regular sample grid over `bbox`, latitude outer, longitude inner,
/// starting at the minimum corner and covering every point <= the maximum.
///
/// Points are computed as `min + i * step` from integer indices rather
/// than by repeated addition, so the count is identical across platforms.
/// `step` must be positive.
pub fn sample_grid(bbox: &BoundingBox, step: f64) -> Vec<SamplePoint> {
    debug_assert!(step > 0.0);
    let lat_steps = ((bbox.lat_max - bbox.lat_min) / step + GRID_EPSILON).floor() as usize;
    let lon_steps = ((bbox.lon_max - bbox.lon_min) / step + GRID_EPSILON).floor() as usize;
    let mut points = Vec::with_capacity((lat_steps + 1) * (lon_steps + 1));
    for i in 0..=lat_steps {
        let lat = bbox.lat_min + i as f64 * step;
        for j in 0..=lon_steps {
            let lon = bbox.lon_min + j as f64 * step;
            points.push(SamplePoint { lat, lon });
        }
    }
    points
}

/// Normalized slowdown: 0 = free flow, approaching 1 = severe, negative
/// when traffic runs above the free-flow speed (no clamping). The free
/// speed is floored at 1 before dividing so a zero free-flow segment
/// yields 0 instead of blowing up.
pub fn congestion_index(current_speed: f64, free_flow_speed: f64) -> f64 {
    let raw = (free_flow_speed - current_speed) / free_flow_speed.max(1.0);
    (raw * 100.0).round() / 100.0
}

/// Wall-clock timestamps in the log use this layout.
pub mod ts_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One successful flow measurement. Immutable once created; only ever
/// appended to the log. Serde names match the log header.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TrafficReading {
    #[serde(with = "ts_format")]
    pub timestamp: NaiveDateTime,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "currentSpeed")]
    pub current_speed: f64,
    #[serde(rename = "freeFlowSpeed")]
    pub free_flow_speed: f64,
    #[serde(rename = "congestionIndex")]
    pub congestion_index: f64,
}

/// One complete grid sweep's readings, in grid order. Lives in memory
/// for the duration of a run; the id only tags log lines, never the CSV.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Snapshot {
    #[serde(with = "uuid::serde::simple")]
    pub id: Uuid,
    #[serde(default)]
    pub readings: Vec<TrafficReading>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            readings: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bengaluru_box() -> BoundingBox {
        BoundingBox::new(12.85, 77.45, 12.95, 77.55).unwrap()
    }

    #[test]
    fn bounding_box_rejects_inverted_corners() {
        assert!(BoundingBox::new(13.0, 77.0, 12.0, 78.0).is_none());
        assert!(BoundingBox::new(12.0, 78.0, 13.0, 77.0).is_none());
        assert!(BoundingBox::new(12.0, 77.0, 12.0, 78.0).is_none());
    }

    #[test]
    fn grid_covers_example_box() {
        let points = sample_grid(&bengaluru_box(), 0.05);
        assert_eq!(points.len(), 9);
        assert_eq!(
            points[0],
            SamplePoint {
                lat: 12.85,
                lon: 77.45
            }
        );
        // latitude outer, longitude inner
        assert!((points[1].lat - 12.85).abs() < 1e-12);
        assert!((points[1].lon - 77.50).abs() < 1e-12);
        assert!((points[3].lat - 12.90).abs() < 1e-12);
        assert!((points[3].lon - 77.45).abs() < 1e-12);
    }

    #[test]
    fn grid_stays_within_one_step_of_the_maximum() {
        let bbox = BoundingBox::new(12.85, 77.45, 13.10, 77.75).unwrap();
        let step = 0.05;
        let points = sample_grid(&bbox, step);
        assert!(!points.is_empty());
        assert_eq!(points[0], SamplePoint { lat: 12.85, lon: 77.45 });
        for p in &points {
            assert!(p.lat >= bbox.lat_min && p.lat <= bbox.lat_max + step);
            assert!(p.lon >= bbox.lon_min && p.lon <= bbox.lon_max + step);
        }
    }

    #[test]
    fn grid_with_oversized_step_is_just_the_min_corner() {
        let points = sample_grid(&bengaluru_box(), 1.0);
        assert_eq!(
            points,
            vec![SamplePoint {
                lat: 12.85,
                lon: 77.45
            }]
        );
    }

    #[test]
    fn congestion_is_zero_at_free_flow() {
        assert_eq!(congestion_index(40.0, 40.0), 0.0);
        assert_eq!(congestion_index(1.0, 1.0), 0.0);
    }

    #[test]
    fn congestion_survives_zero_free_flow() {
        assert_eq!(congestion_index(0.0, 0.0), 0.0);
    }

    #[test]
    fn congestion_goes_negative_above_free_flow() {
        assert_eq!(congestion_index(60.0, 50.0), -0.2);
    }

    #[test]
    fn congestion_rounds_to_two_decimals() {
        // (50 - 33) / 50 = 0.34
        assert_eq!(congestion_index(33.0, 50.0), 0.34);
        // (45 - 31) / 45 = 0.3111...
        assert_eq!(congestion_index(31.0, 45.0), 0.31);
    }
}
