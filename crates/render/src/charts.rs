use std::path::Path;

use anyhow::{anyhow, Result};
use log::warn;
use plotters::prelude::*;

use analysis::TrendPoint;
use model::TrafficReading;

const CHART_SIZE: (u32, u32) = (1000, 600);

fn draw_error(e: impl std::fmt::Display) -> anyhow::Error {
    anyhow!("chart rendering failed: {e}")
}

/// One labeled bar per hotspot, worst first, written as a PNG.
pub fn render_hotspot_bars(hotspots: &[TrafficReading], out: &Path) -> Result<()> {
    if hotspots.is_empty() {
        warn!("no hotspots to chart, skipping {}", out.display());
        return Ok(());
    }

    let labels: Vec<String> = hotspots
        .iter()
        .map(|r| format!("({:.2}, {:.2})", r.lat, r.lon))
        .collect();
    let max_y = hotspots
        .iter()
        .map(|r| r.congestion_index)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_y = hotspots
        .iter()
        .map(|r| r.congestion_index)
        .fold(f64::INFINITY, f64::min);
    let y_range = min_y.min(0.0)..(max_y * 1.1).max(0.1);

    let root = BitMapBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Top Congestion Hotspots", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(90)
        .y_label_area_size(60)
        .build_cartesian_2d(0i32..hotspots.len() as i32, y_range)
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(hotspots.len())
        .x_label_formatter(&|x| labels.get(*x as usize).cloned().unwrap_or_default())
        .x_desc("Location (lat, lon)")
        .y_desc("Congestion Index (0=Free, 1=Severe)")
        .draw()
        .map_err(draw_error)?;

    chart
        .draw_series(hotspots.iter().enumerate().map(|(i, r)| {
            Rectangle::new([(i as i32, 0.0), (i as i32 + 1, r.congestion_index)], RED.filled())
        }))
        .map_err(draw_error)?;

    root.present().map_err(draw_error)?;
    Ok(())
}

/// Congestion over time as a line with markers, written as a PNG.
///
/// An empty series is a warning, not an error: nothing is written and
/// `false` comes back so the caller can tell the chart was skipped.
pub fn render_trend(points: &[TrendPoint], label: &str, out: &Path) -> Result<bool> {
    if points.is_empty() {
        warn!("no log data found yet, skipping trend chart");
        return Ok(false);
    }

    let series: Vec<(i32, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as i32, p.congestion_index))
        .collect();
    let max_y = series.iter().map(|(_, y)| *y).fold(f64::NEG_INFINITY, f64::max);
    let min_y = series.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
    let pad = ((max_y - min_y) * 0.1).max(0.05);
    let x_max = (points.len() as i32 - 1).max(1);

    let root = BitMapBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Congestion Trend", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d(0i32..x_max, (min_y - pad)..(max_y + pad))
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .x_labels(points.len().min(10))
        .x_label_formatter(&|x| {
            points
                .get(*x as usize)
                .map(|p| p.timestamp.format("%m-%d %H:%M").to_string())
                .unwrap_or_default()
        })
        .x_desc("Time")
        .y_desc("Congestion Index")
        .draw()
        .map_err(draw_error)?;

    chart
        .draw_series(LineSeries::new(series.iter().copied(), &BLUE))
        .map_err(draw_error)?
        .label(label.to_string())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_series(
            series
                .iter()
                .map(|(x, y)| Circle::new((*x, *y), 3, BLUE.filled())),
        )
        .map_err(draw_error)?;

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()
        .map_err(draw_error)?;

    root.present().map_err(draw_error)?;
    Ok(true)
}
