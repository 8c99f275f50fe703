use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};

use crate::cli::Cli;
use crate::error::ChainError;

/// Tunable thresholds for filtering and marker sizing.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    /// Max |strike - price| / price kept by the deviation filter.
    pub deviation: f64,
    /// Deep in-the-money cutoff, as a fraction of the current price.
    pub moneyness: f64,
    /// Marker area (points^2) of the largest volume.
    pub marker_scale: f64,
    /// Number of samples in the volume size legend.
    pub volume_granularity: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            deviation: 0.8,
            moneyness: 0.1,
            marker_scale: 6_000.0,
            volume_granularity: 6,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ChainError> {
        if !(self.deviation.is_finite() && self.deviation > 0.0) {
            return Err(invalid("deviation", self.deviation));
        }
        if !(self.moneyness.is_finite() && self.moneyness >= 0.0) {
            return Err(invalid("moneyness", self.moneyness));
        }
        if !(self.marker_scale.is_finite() && self.marker_scale > 0.0) {
            return Err(invalid("marker scale", self.marker_scale));
        }
        if self.volume_granularity < 2 {
            return Err(invalid("volume granularity", self.volume_granularity));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: impl ToString) -> ChainError {
    ChainError::InvalidThreshold {
        name,
        value: value.to_string(),
    }
}

/// Image format of the rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Pdf,
    Svg,
    Png,
}

impl ChartFormat {
    pub fn parse(s: &str) -> Result<Self, ChainError> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ChartFormat::Pdf),
            "svg" => Ok(ChartFormat::Svg),
            "png" => Ok(ChartFormat::Png),
            other => Err(ChainError::UnknownFormat {
                format: other.to_string(),
            }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ChartFormat::Pdf => "pdf",
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
        }
    }
}

/// Immutable configuration for one run, shared by every pipeline stage.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub ticker: String,
    pub expiration: NaiveDate,
    pub thresholds: Thresholds,
    pub format: ChartFormat,
    pub output_dir: PathBuf,
    pub from_csv: Option<PathBuf>,
    pub save_csv: Option<PathBuf>,
}

impl RunConfig {
    /// Config for `ticker`/`expiration` with default thresholds, writing a PDF to the working directory.
    pub fn new(ticker: &str, expiration: NaiveDate) -> Self {
        RunConfig {
            ticker: ticker.to_string(),
            expiration,
            thresholds: Thresholds::default(),
            format: ChartFormat::Pdf,
            output_dir: PathBuf::from("."),
            from_csv: None,
            save_csv: None,
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, ChainError> {
        let expiration = parse_expiration(&cli.expiration)?;

        let thresholds = Thresholds {
            deviation: cli.deviation,
            moneyness: cli.moneyness,
            marker_scale: cli.marker_scale,
            volume_granularity: cli.volume_granularity,
        };
        thresholds.validate()?;

        Ok(RunConfig {
            ticker: cli.stock.clone(),
            expiration,
            thresholds,
            format: ChartFormat::parse(&cli.format)?,
            output_dir: cli.output_dir.clone(),
            from_csv: cli.from_csv.clone(),
            save_csv: cli.save_csv.clone(),
        })
    }

    pub fn month(&self) -> u32 {
        self.expiration.month()
    }

    pub fn year(&self) -> i32 {
        self.expiration.year()
    }

    /// `<TICKER>_<EXPIRATION>_strike_and_premium.<ext>` inside the output directory.
    pub fn chart_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}_strike_and_premium.{}",
            self.ticker,
            self.expiration.format("%Y-%m-%d"),
            self.format.extension()
        ))
    }
}

/// Parse a `yyyy-mm-dd` expiration date.
pub fn parse_expiration(s: &str) -> Result<NaiveDate, ChainError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| ChainError::InvalidDate {
        input: s.to_string(),
    })
}
