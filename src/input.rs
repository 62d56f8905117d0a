//! Input document and the sources it can come from.
//!
//! The on-disk shape is JSON with `YYYY-MM-DD` strings:
//!
//! ```json
//! {
//!   "relationship_start_date": "2020-05-01",
//!   "long_distance_date": "2021-09-01",
//!   "time_together": [{ "start_date": "...", "end_date": "...", "location": "..." }],
//!   "future_plans": [],
//!   "gifts_and_letters": [{ "date_received": "...", "description": "...", "for": "..." }],
//!   "custom_alerts": [{ "date": "...", "description": "..." }]
//! }
//! ```

use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::events::{Alert, Gift};
use crate::interval::Interval;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` string, naming the field on failure.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| StatsError::Parse {
        field,
        value: value.to_string(),
    })
}

#[derive(Debug, Deserialize)]
pub struct RawInterval {
    pub start_date: String,
    pub end_date: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct RawGift {
    pub date_received: String,
    pub description: String,
    #[serde(rename = "for", default)]
    pub recipient: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawAlert {
    pub date: String,
    pub description: String,
}

/// The input document exactly as it appears on disk.
#[derive(Debug, Deserialize)]
pub struct RawInput {
    pub relationship_start_date: String,
    pub long_distance_date: String,
    #[serde(default)]
    pub time_together: Vec<RawInterval>,
    #[serde(default)]
    pub future_plans: Vec<RawInterval>,
    #[serde(default)]
    pub gifts_and_letters: Vec<RawGift>,
    #[serde(default)]
    pub custom_alerts: Vec<RawAlert>,
}

/// Typed input for the statistics pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipData {
    pub relationship_start_date: NaiveDate,
    pub long_distance_date: NaiveDate,
    pub time_together: Vec<Interval>,
    pub future_plans: Vec<Interval>,
    pub gifts_and_letters: Vec<Gift>,
    pub custom_alerts: Vec<Alert>,
}

impl RawInput {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Converts every date string, failing on the first malformed one.
    pub fn parse(&self) -> Result<RelationshipData> {
        let intervals = |list: &[RawInterval], start: &'static str, end: &'static str| {
            list.iter()
                .map(|r| -> Result<Interval> {
                    Ok(Interval::new(
                        parse_date(start, &r.start_date)?,
                        parse_date(end, &r.end_date)?,
                        r.location.clone(),
                    ))
                })
                .collect::<Result<Vec<_>>>()
        };

        let gifts = self
            .gifts_and_letters
            .iter()
            .map(|g| -> Result<Gift> {
                Ok(Gift {
                    date: parse_date("gifts_and_letters.date_received", &g.date_received)?,
                    description: g.description.clone(),
                    recipient: g.recipient.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let alerts = self
            .custom_alerts
            .iter()
            .map(|a| -> Result<Alert> {
                Ok(Alert {
                    date: parse_date("custom_alerts.date", &a.date)?,
                    description: a.description.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RelationshipData {
            relationship_start_date: parse_date(
                "relationship_start_date",
                &self.relationship_start_date,
            )?,
            long_distance_date: parse_date("long_distance_date", &self.long_distance_date)?,
            time_together: intervals(
                &self.time_together,
                "time_together.start_date",
                "time_together.end_date",
            )?,
            future_plans: intervals(
                &self.future_plans,
                "future_plans.start_date",
                "future_plans.end_date",
            )?,
            gifts_and_letters: gifts,
            custom_alerts: alerts,
        })
    }
}

/// Where a run's input comes from.
pub trait InputSource {
    fn load(&self) -> anyhow::Result<RelationshipData>;
}

/// Data that is already in memory (tests, embedding callers).
pub struct InMemory(pub RelationshipData);

impl InputSource for InMemory {
    fn load(&self) -> anyhow::Result<RelationshipData> {
        Ok(self.0.clone())
    }
}

/// A JSON document on disk.
pub struct JsonFile {
    pub path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InputSource for JsonFile {
    fn load(&self) -> anyhow::Result<RelationshipData> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read input file {}", self.path.display()))?;
        let raw = RawInput::from_json_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        let data = raw.parse()?;

        debug!(
            path = %self.path.display(),
            visits = data.time_together.len(),
            plans = data.future_plans.len(),
            "loaded input"
        );
        Ok(data)
    }
}
