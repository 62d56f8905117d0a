use crate::stats::Stats;

const ALIGN_WIDTH: usize = 72;

const NO_FUTURE_VISITS: &str = "No future visits in the in-person calendar :( \
If this is a mistake, please update the calendar or buy a plane ticket.";

/// Output flavour of the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
}

// Utilities for laying out the text report

pub fn build_stat_row(key: &str, value: &str, align_width: usize) -> String {
    let key_part = format!("{key}: ");
    let base_len = key_part.chars().count() + value.chars().count();
    let available = align_width.saturating_sub(base_len);

    let dots = match available {
        0 => "".to_string(),
        1 => " ".to_string(),
        2 => ". ".to_string(),
        n => format!("{} ", ".".repeat(n - 1)),
    };

    format!("{key_part}{dots}{value}")
}

fn build_header_line(label: &str, align_width: usize) -> String {
    let base = format!("{label} ");
    let dash_count = align_width.saturating_sub(base.chars().count());
    format!("{base}{}", "-".repeat(dash_count))
}

struct Section {
    lines: Vec<String>,
}

impl Section {
    fn new(title: &str) -> Self {
        Self {
            lines: vec![String::new(), build_header_line(title, ALIGN_WIDTH)],
        }
    }

    fn row(&mut self, key: &str, value: impl AsRef<str>) -> &mut Self {
        self.lines.push(build_stat_row(key, value.as_ref(), ALIGN_WIDTH));
        self
    }
}

/// Renders the statistics as a plain-text report.
pub fn render_text(stats: &Stats) -> String {
    let mut sections = Vec::new();

    let mut overview = Section::new("Relationship Statistics");
    overview
        .row("Total length of Relationship", &stats.relationship_duration)
        .row(
            "Length of Long-Distance Relationship (LDR)",
            &stats.long_distance_duration,
        )
        .row(
            "Percent LDR in total relationship",
            format!("{} %", stats.percentage_long_distance),
        );
    sections.push(overview);

    let mut together = Section::new("Time Spent Together");
    together
        .row("Total time spent together since LDR", &stats.days_together_since_ldr)
        .row(
            &format!("Days spent together in {}", stats.current_year),
            format!("{} days", stats.days_together_current_year),
        )
        .row(
            "Percentage of relationship spent in person since LDR",
            format!("{} %", stats.percentage_in_person_ldr),
        )
        .row(
            "Average length of time spent together",
            &stats.average_time_together_in_person,
        )
        .row(
            "Average number of days together (monthly)",
            stats.average_days_together_per_month.to_string(),
        );
    sections.push(together);

    let mut apart = Section::new("Time Spent Apart");
    apart
        .row("Average time between visits", &stats.average_time_between_visits)
        .row(
            "Longest time between visits",
            stats.longest_gap_between_meetings.as_deref().unwrap_or("n/a"),
        )
        .row(
            "Shortest time between visits",
            stats.shortest_gap_between_meetings.as_deref().unwrap_or("n/a"),
        )
        .row("Time since last visit", &stats.time_since_last_visit);
    // The apology is too long for a dotted row.
    match &stats.time_until_next_visit {
        Some(until) => {
            apart.row("Time until next visit", until);
        }
        None => apart
            .lines
            .push(format!("Time until next visit: {NO_FUTURE_VISITS}")),
    }
    sections.push(apart);

    let mut travel = Section::new("Travel and Locations");
    travel
        .row("Total trips taken", stats.total_trips_taken.to_string())
        .row(
            "Number of places visited together",
            stats.number_of_locations_visited.to_string(),
        )
        .row("Most visited place", &stats.most_visited_city);
    sections.push(travel);

    if !stats.recent_gifts.is_empty() {
        let mut gifts = Section::new("Recent Gifts & Letters");
        for gift in &stats.recent_gifts {
            let value = match &gift.recipient {
                Some(to) => format!("{} (for {to})", gift.description),
                None => gift.description.clone(),
            };
            gifts.row(&gift.date_received.to_string(), value);
        }
        sections.push(gifts);
    }

    if !stats.upcoming_events.is_empty() {
        let mut events = Section::new("Upcoming Events");
        for event in &stats.upcoming_events {
            events.row(
                &event.description,
                format!("{} ({} days)", event.date, event.days_until_event),
            );
        }
        sections.push(events);
    }

    let mut out: Vec<String> = sections.into_iter().flat_map(|s| s.lines).collect();
    out.push(String::new());
    out.push("Love between us: Lots and lots".to_string());
    out.push(String::new());
    out.join("\n")
}

/// Renders the statistics record as pretty JSON.
pub fn render_json(stats: &Stats) -> serde_json::Result<String> {
    serde_json::to_string_pretty(stats)
}

pub fn render(stats: &Stats, format: Format) -> serde_json::Result<String> {
    match format {
        Format::Text => Ok(render_text(stats)),
        Format::Json => render_json(stats),
    }
}
