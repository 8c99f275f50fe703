use clap::Parser;
use std::path::PathBuf;

/// Visualize stock option volume as a strike/premium bubble chart.
/// E.g. `option-bets MSFT 2020-06-19`
#[derive(Parser, Debug)]
#[command(name = "option-bets", version, about)]
pub struct Cli {
    /// Stock ticker. E.g. MSFT, AAPL, etc.
    pub stock: String,

    /// Expiration date; required format yyyy-mm-dd. E.g. 2020-06-19
    pub expiration: String,

    /// Drop strikes deviating from the current price by more than this fraction
    #[arg(long, default_value = "0.8")]
    pub deviation: f64,

    /// Deep in-the-money cutoff as a fraction of the current price
    #[arg(long, default_value = "0.1")]
    pub moneyness: f64,

    /// Marker area (points^2) given to the largest traded volume
    #[arg(long, default_value = "6000.0")]
    pub marker_scale: f64,

    /// Number of sample bubbles in the volume size legend
    #[arg(long, default_value = "6")]
    pub volume_granularity: usize,

    /// Output format: pdf (default), svg, or png
    #[arg(long, default_value = "pdf")]
    pub format: String,

    /// Directory the chart is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Replay quotes from a CSV file instead of fetching them
    #[arg(long)]
    pub from_csv: Option<PathBuf>,

    /// Also write the retrieved quotes to this CSV file
    #[arg(long)]
    pub save_csv: Option<PathBuf>,
}
