//! Views over a snapshot or the historical log: a Leaflet heatmap
//! document, a hotspot bar chart and a congestion-over-time trend.

mod charts;
mod heatmap;

pub use charts::{render_hotspot_bars, render_trend};
pub use heatmap::{render_heatmap, HeatmapOptions};
