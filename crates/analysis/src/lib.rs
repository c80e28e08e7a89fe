use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{json, Value};

use model::*;

/// One aggregated point on a congestion-over-time curve.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct TrendPoint {
    pub timestamp: NaiveDateTime,
    pub congestion_index: f64,
}

/// The worst `n` readings by congestion index, descending. Ties keep
/// their input order; fewer than `n` readings come back as-is.
pub fn top_hotspots(readings: &[TrafficReading], n: usize) -> Vec<TrafficReading> {
    let mut sorted = readings.to_vec();
    // stable sort, so equal indices stay in collection order
    sorted.sort_by(|a, b| b.congestion_index.total_cmp(&a.congestion_index));
    sorted.truncate(n);
    sorted
}

/// Average congestion per timestamp across the whole log,
/// chronological.
pub fn citywide_trend(rows: &[TrafficReading]) -> Vec<TrendPoint> {
    let mut groups: BTreeMap<NaiveDateTime, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(row.timestamp).or_insert((0.0, 0));
        entry.0 += row.congestion_index;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(timestamp, (sum, count))| TrendPoint {
            timestamp,
            congestion_index: sum / count as f64,
        })
        .collect()
}

/// Congestion over time for a single grid coordinate. Coordinates are
/// compared after rounding to 4 decimals, so float drift across runs
/// (well below the 0.05-degree grid spacing) still matches.
pub fn location_trend(rows: &[TrafficReading], lat: f64, lon: f64) -> Vec<TrendPoint> {
    rows.iter()
        .filter(|r| same_coordinate(r.lat, lat) && same_coordinate(r.lon, lon))
        .map(|r| TrendPoint {
            timestamp: r.timestamp,
            congestion_index: r.congestion_index,
        })
        .collect()
}

fn round_coord(v: f64) -> f64 {
    (v * 1e4).round() / 1e4
}

fn same_coordinate(a: f64, b: f64) -> bool {
    round_coord(a) == round_coord(b)
}

/// Quick look at a freshly collected snapshot, for the run log.
pub fn snapshot_summary(snapshot: &Snapshot) -> Value {
    let indices: Vec<f64> = snapshot
        .readings
        .iter()
        .map(|r| r.congestion_index)
        .collect();
    let mean = if indices.is_empty() {
        0.0
    } else {
        indices.iter().sum::<f64>() / indices.len() as f64
    };
    let max = indices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = indices.iter().copied().fold(f64::INFINITY, f64::min);
    json!({
        "points": snapshot.len(),
        "mean_congestion": mean,
        "max_congestion": if indices.is_empty() { Value::Null } else { json!(max) },
        "min_congestion": if indices.is_empty() { Value::Null } else { json!(min) },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reading(lat: f64, lon: f64, hour: u32, idx: f64) -> TrafficReading {
        TrafficReading {
            timestamp: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            lat,
            lon,
            current_speed: 30.0,
            free_flow_speed: 50.0,
            congestion_index: idx,
        }
    }

    #[test]
    fn hotspots_sorted_descending_with_stable_ties() {
        let rows = vec![
            reading(12.85, 77.45, 8, 0.2),
            reading(12.90, 77.45, 8, 0.5),
            reading(12.95, 77.45, 8, 0.5),
            reading(12.85, 77.50, 8, -0.1),
        ];
        let top = top_hotspots(&rows, 10);
        assert_eq!(top.len(), 4);
        assert_eq!(top[0].lat, 12.90);
        assert_eq!(top[1].lat, 12.95); // tie keeps input order
        assert_eq!(top[2].congestion_index, 0.2);
        assert_eq!(top[3].congestion_index, -0.1);
    }

    #[test]
    fn hotspots_truncate_to_n() {
        let rows: Vec<_> = (0..25)
            .map(|i| reading(12.0 + i as f64 * 0.05, 77.0, 8, i as f64 / 100.0))
            .collect();
        let top = top_hotspots(&rows, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].congestion_index, 0.24);
    }

    #[test]
    fn citywide_trend_averages_per_timestamp() {
        let rows = vec![
            reading(12.85, 77.45, 8, 0.2),
            reading(12.90, 77.45, 8, 0.4),
            reading(12.85, 77.45, 9, 0.8),
        ];
        let trend = citywide_trend(&rows);
        assert_eq!(trend.len(), 2);
        assert!((trend[0].congestion_index - 0.3).abs() < 1e-12);
        assert_eq!(trend[1].congestion_index, 0.8);
        assert!(trend[0].timestamp < trend[1].timestamp);
    }

    #[test]
    fn location_trend_tolerates_float_drift() {
        let rows = vec![
            reading(12.850000000001, 77.45, 8, 0.2),
            reading(12.85, 77.45, 9, 0.6),
            reading(12.90, 77.45, 8, 0.9),
        ];
        let trend = location_trend(&rows, 12.85, 77.45);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].congestion_index, 0.2);
        assert_eq!(trend[1].congestion_index, 0.6);
    }

    #[test]
    fn location_trend_on_unknown_coordinate_is_empty() {
        let rows = vec![reading(12.85, 77.45, 8, 0.2)];
        assert!(location_trend(&rows, 13.05, 77.45).is_empty());
    }

    #[test]
    fn summary_of_empty_snapshot() {
        let summary = snapshot_summary(&Snapshot::new());
        assert_eq!(summary["points"], 0);
        assert!(summary["max_congestion"].is_null());
    }

    #[test]
    fn summary_reports_extremes() {
        let mut snapshot = Snapshot::new();
        snapshot.readings = vec![
            reading(12.85, 77.45, 8, 0.2),
            reading(12.90, 77.45, 8, 0.6),
        ];
        let summary = snapshot_summary(&snapshot);
        assert_eq!(summary["points"], 2);
        assert_eq!(summary["max_congestion"], 0.6);
        assert_eq!(summary["min_congestion"], 0.2);
        assert!((summary["mean_congestion"].as_f64().unwrap() - 0.4).abs() < 1e-12);
    }
}
