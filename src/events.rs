//! Reducers over the flat gift/letter and custom alert lists.
//!
//! Both are total: an empty list gives an empty view.

use chrono::NaiveDate;
use serde::Serialize;

/// How many gifts/letters the recency view keeps.
pub const RECENT_GIFTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gift {
    pub date: NaiveDate,
    pub description: String,
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub date: NaiveDate,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentGift {
    pub date_received: NaiveDate,
    pub description: String,
    #[serde(rename = "for")]
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingEvent {
    pub date: NaiveDate,
    pub description: String,
    pub days_until_event: i64,
}

/// Most recent gifts first, at most [`RECENT_GIFTS`] of them.
/// Entries sharing a date keep their input order.
pub fn recent_gifts(gifts: &[Gift]) -> Vec<RecentGift> {
    let mut sorted: Vec<&Gift> = gifts.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted
        .into_iter()
        .take(RECENT_GIFTS)
        .map(|g| RecentGift {
            date_received: g.date,
            description: g.description.clone(),
            recipient: g.recipient.clone(),
        })
        .collect()
}

/// Alerts strictly after `current_date`, soonest first.
pub fn upcoming_events(alerts: &[Alert], current_date: NaiveDate) -> Vec<UpcomingEvent> {
    let mut upcoming: Vec<UpcomingEvent> = alerts
        .iter()
        .filter(|a| a.date > current_date)
        .map(|a| UpcomingEvent {
            date: a.date,
            description: a.description.clone(),
            days_until_event: (a.date - current_date).num_days(),
        })
        .collect();
    upcoming.sort_by_key(|e| e.date);
    upcoming
}
