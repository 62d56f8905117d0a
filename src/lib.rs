pub mod config;
pub mod duration;
pub mod error;
pub mod events;
pub mod input;
pub mod interval;
pub mod report;
pub mod stats;

pub use error::{Result, StatsError};
pub use input::{InMemory, InputSource, JsonFile, RelationshipData};
pub use stats::{AnchorDates, Stats};
