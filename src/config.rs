use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::input::{DATE_FORMAT, parse_date};
use crate::report::Format;

/// Statistics about time spent together and apart.
#[derive(Debug, Parser)]
#[command(name = "ldr-stats", version, about)]
pub struct Cli {
    /// JSON document with the anchor dates and visit lists
    #[arg(short, long, default_value = "relationship.json")]
    pub input: PathBuf,

    /// Pin the current date (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_today)]
    pub today: Option<NaiveDate>,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Cli {
    pub fn current_date(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Initialize the tracing subscriber. Logs go to stderr so stdout only
    /// carries the report.
    pub fn init_logging(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        match self.log_format {
            LogFormat::Json => {
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            LogFormat::Pretty => {
                fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}

fn parse_today(s: &str) -> Result<NaiveDate, String> {
    parse_date("today", s).map_err(|_| format!("expected a date formatted as {DATE_FORMAT}"))
}
