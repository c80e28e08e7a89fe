mod config;

use analysis as an;
use anyhow::Result;
use log::{info, warn};

use config::AppConfig;
use flow_ingest_core::collect_snapshot;
use flow_ingest_tomtom::TomTomSource;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = AppConfig::from_env()?;
    let bbox = cfg.collector.bbox;
    info!(
        "sampling flow over [{}, {}]..[{}, {}] at step {}",
        bbox.lat_min, bbox.lon_min, bbox.lat_max, bbox.lon_max, cfg.collector.grid_step
    );

    let source = TomTomSource::new(cfg.tomtom.clone());
    let snapshot = collect_snapshot(&source, &cfg.collector).await?;
    info!(
        "snapshot {}: {}",
        snapshot.id,
        an::snapshot_summary(&snapshot)
    );

    if snapshot.is_empty() {
        warn!("no data collected, check the API key or TomTom limits");
        return Ok(());
    }

    iox::append_snapshot(&cfg.log_file, &snapshot)?;
    info!("data logged to {}", cfg.log_file.display());

    render::render_heatmap(&snapshot.readings, &cfg.heatmap, &cfg.heatmap_file)?;
    info!("heatmap saved to {}", cfg.heatmap_file.display());

    let hotspots = an::top_hotspots(&snapshot.readings, config::TOP_HOTSPOTS);
    render::render_hotspot_bars(&hotspots, &cfg.hotspots_file)?;
    info!("hotspot chart saved to {}", cfg.hotspots_file.display());

    let rows = iox::read_log(&cfg.log_file)?;
    if render::render_trend(&an::citywide_trend(&rows), "City Avg", &cfg.trend_file)? {
        info!("trend chart saved to {}", cfg.trend_file.display());
    }

    info!("snapshot, heatmap, hotspots and trend ready");
    Ok(())
}
