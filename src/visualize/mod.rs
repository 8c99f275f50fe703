mod font;
pub mod layout;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::model::ChainSlice;

pub use layout::{ChartLayout, VolumeScale, percent_tick_label};

/// Render the strike/premium bubble chart for `slice` and write it to
/// [`RunConfig::chart_path`], overwriting any existing file.
///
/// An empty slice still produces a chart: axes around the current price,
/// no markers, and a caption saying so.
pub fn visualize(slice: &ChainSlice, config: &RunConfig) -> anyhow::Result<PathBuf> {
    let layout = ChartLayout::new(slice, &config.thresholds);

    if slice.is_empty() {
        warn!(ticker = %config.ticker, expiration = %config.expiration, "rendering empty chart");
    } else if layout.volume.range() == 0.0 {
        warn!(
            volume = layout.volume.bounds().0,
            "all contracts share one volume; drawing equal bubbles"
        );
    }

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output directory {}", config.output_dir.display()))?;

    let path = config.chart_path();
    render::render(&path, config.format, &chart_title(config, slice), slice, &layout)
        .with_context(|| format!("rendering chart to {}", path.display()))?;

    info!(path = %path.display(), calls = slice.calls.len(), puts = slice.puts.len(), "wrote chart");
    Ok(path)
}

pub fn chart_title(config: &RunConfig, slice: &ChainSlice) -> String {
    let title = format!(
        "{} at {:.2}, Expiry {}",
        config.ticker,
        slice.current_price,
        config.expiration.format("%Y-%m-%d")
    );
    if slice.is_empty() {
        format!("{title} (no contracts)")
    } else {
        title
    }
}
