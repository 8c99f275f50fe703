pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod pipeline;
pub mod source;
pub mod visualize;

pub use config::{ChartFormat, RunConfig, Thresholds};
pub use error::ChainError;
pub use pipeline::{get_option_data, run, run_with};
