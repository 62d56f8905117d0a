use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::duration::format_days;
use crate::error::{Result, StatsError};
use crate::events::{self, RecentGift, UpcomingEvent};
use crate::input::RelationshipData;
use crate::interval::{self, Interval, IntervalRecord};

/// The three reference points every duration is measured against.
///
/// `relationship_start_date <= long_distance_date <= current_date` is assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorDates {
    pub relationship_start_date: NaiveDate,
    pub long_distance_date: NaiveDate,
    pub current_date: NaiveDate,
}

/// The statistics record handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub current_year: i32,
    pub relationship_duration: String,
    pub long_distance_duration: String,
    pub percentage_long_distance: f64,
    pub total_in_person_duration: i64,
    #[serde(rename = "percentage_in_person_LDR")]
    pub percentage_in_person_ldr: f64,
    #[serde(rename = "days_together_since_LDR")]
    pub days_together_since_ldr: String,
    pub days_together_since_long_distance: String,
    pub days_together_current_year: i64,
    pub average_in_person_duration: f64,
    pub average_time_together_in_person: String,
    pub average_time_between_visits: String,
    pub average_days_together_per_month: f64,
    pub longest_gap_between_meetings: Option<String>,
    pub shortest_gap_between_meetings: Option<String>,
    pub number_of_locations_visited: usize,
    pub most_visited_city: String,
    pub total_trips_taken: usize,
    pub time_since_last_visit: String,
    pub time_until_next_visit: Option<String>,
    pub recent_gifts: Vec<RecentGift>,
    pub upcoming_events: Vec<UpcomingEvent>,
}

impl Stats {
    /// Runs the whole pipeline: interval table, reduction, auxiliary views.
    pub fn compute(data: &RelationshipData, current_date: NaiveDate) -> Result<Self> {
        let anchors = AnchorDates {
            relationship_start_date: data.relationship_start_date,
            long_distance_date: data.long_distance_date,
            current_date,
        };

        let table = interval::build_table(&data.time_together, anchors.long_distance_date)?;
        let mut stats = calculate(&table, &data.future_plans, &anchors)?;
        stats.recent_gifts = events::recent_gifts(&data.gifts_and_letters);
        stats.upcoming_events = events::upcoming_events(&data.custom_alerts, current_date);

        Ok(stats)
    }
}

/// Reduces the interval table into a [`Stats`] record.
///
/// The auxiliary views are left empty; [`Stats::compute`] fills them.
pub fn calculate(
    table: &[IntervalRecord],
    future_plans: &[Interval],
    anchors: &AnchorDates,
) -> Result<Stats> {
    if table.is_empty() {
        return Err(StatsError::EmptyDataset("time_together"));
    }

    let relationship_days = (anchors.current_date - anchors.relationship_start_date).num_days();
    let long_distance_days = (anchors.current_date - anchors.long_distance_date).num_days();

    let percentage_long_distance = round1(
        ratio(
            long_distance_days,
            relationship_days,
            "long_distance_duration",
            "relationship_duration",
        )? * 100.0,
    );

    let total_in_person: i64 = table.iter().map(|r| r.duration_days).sum();
    let percentage_in_person_ldr = round1(
        ratio(
            total_in_person,
            long_distance_days,
            "total_in_person_duration",
            "long_distance_duration",
        )? * 100.0,
    );

    let since_long_distance: i64 = table
        .iter()
        .filter(|r| r.start >= anchors.long_distance_date)
        .map(|r| r.duration_days)
        .sum();
    let current_year = anchors.current_date.year();
    let days_together_current_year: i64 = table
        .iter()
        .filter(|r| r.start.year() == current_year)
        .map(|r| r.duration_days)
        .sum();

    let trips = table.len();
    let average_in_person = total_in_person as f64 / trips as f64;

    // Days together per 30-day month of long distance.
    let average_days_together_per_month = round1(per_month(
        since_long_distance,
        long_distance_days,
    )?);

    let gaps: Vec<i64> = table.iter().map(|r| r.gap_before_days).collect();
    let longest_gap = gaps.iter().max().copied();
    let shortest_gap = gaps.iter().min().copied();
    // Rounded to whole days before it is broken into units.
    let average_gap =
        (gaps.iter().sum::<i64>() as f64 / gaps.len() as f64).round_ties_even() as i64;

    let (most_visited_city, locations) = most_visited(table);

    // Non-empty table, so there is always a last end date.
    let last_end = table.iter().map(|r| r.end).max().unwrap_or(anchors.current_date);

    let time_until_next_visit =
        next_visit(future_plans, anchors.current_date).map(format_days);
    if time_until_next_visit.is_none() {
        warn!("no future visits after {}", anchors.current_date);
    }

    debug!(
        trips,
        total_in_person,
        since_long_distance,
        average_gap,
        "reduced interval table"
    );

    Ok(Stats {
        current_year,
        relationship_duration: format_days(relationship_days),
        long_distance_duration: format_days(long_distance_days),
        percentage_long_distance,
        total_in_person_duration: total_in_person,
        percentage_in_person_ldr,
        days_together_since_ldr: format_days(since_long_distance),
        days_together_since_long_distance: format_days(since_long_distance),
        days_together_current_year,
        average_in_person_duration: round1(average_in_person),
        average_time_together_in_person: format_days(average_in_person as i64),
        average_time_between_visits: format_days(average_gap),
        average_days_together_per_month,
        longest_gap_between_meetings: longest_gap.map(format_days),
        shortest_gap_between_meetings: shortest_gap.map(format_days),
        number_of_locations_visited: locations,
        most_visited_city,
        total_trips_taken: trips,
        time_since_last_visit: format_days((anchors.current_date - last_end).num_days()),
        time_until_next_visit,
        recent_gifts: Vec::new(),
        upcoming_events: Vec::new(),
    })
}

/// Days until the first plan (in input order) starting after `current_date`.
pub fn next_visit(future_plans: &[Interval], current_date: NaiveDate) -> Option<i64> {
    future_plans
        .iter()
        .find(|plan| plan.start > current_date)
        .map(|plan| (plan.start - current_date).num_days())
}

/// Modal label and the number of distinct labels.
/// Ties go to the alphabetically first label.
fn most_visited(table: &[IntervalRecord]) -> (String, usize) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in table {
        *counts.entry(record.label.as_str()).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (&label, &count) in &counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((label, count));
        }
    }

    (
        best.map(|(label, _)| label.to_string()).unwrap_or_default(),
        counts.len(),
    )
}

fn ratio(
    numerator: i64,
    denominator: i64,
    num_name: &'static str,
    den_name: &'static str,
) -> Result<f64> {
    if denominator == 0 {
        return Err(StatsError::DegenerateAnchor {
            numerator: num_name,
            denominator: den_name,
        });
    }
    Ok(numerator as f64 / denominator as f64)
}

fn per_month(days_together: i64, long_distance_days: i64) -> Result<f64> {
    if long_distance_days == 0 {
        return Err(StatsError::DegenerateAnchor {
            numerator: "days_together_since_LDR",
            denominator: "long_distance_duration",
        });
    }
    Ok(days_together as f64 / (long_distance_days as f64 / 30.0))
}

/// One decimal, ties to even.
fn round1(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn anchors(current: &str) -> AnchorDates {
        AnchorDates {
            relationship_start_date: d("2020-01-01"),
            long_distance_date: d("2021-01-01"),
            current_date: d(current),
        }
    }

    fn visits() -> Vec<Interval> {
        vec![
            Interval::new(d("2021-02-01"), d("2021-02-07"), "Paris"),
            Interval::new(d("2021-05-10"), d("2021-05-19"), "Berlin"),
            Interval::new(d("2023-12-20"), d("2024-01-02"), "Paris"),
            Interval::new(d("2024-03-01"), d("2024-03-03"), "Berlin"),
        ]
    }

    fn plans() -> Vec<Interval> {
        vec![
            Interval::new(d("2024-05-01"), d("2024-05-03"), "Rome"),
            Interval::new(d("2024-07-15"), d("2024-07-20"), "Rome"),
        ]
    }

    fn reduce(
        intervals: &[Interval],
        future: &[Interval],
        anchors: &AnchorDates,
    ) -> Result<Stats> {
        let table = interval::build_table(intervals, anchors.long_distance_date)?;
        calculate(&table, future, anchors)
    }

    #[test]
    fn full_reduction() {
        let stats = reduce(&visits(), &plans(), &anchors("2024-06-01")).unwrap();

        assert_eq!(stats.relationship_duration, "4 years 5 months 3 days");
        assert_eq!(stats.long_distance_duration, "3 years 5 months 2 days");
        assert_eq!(stats.percentage_long_distance, 77.3);
        assert_eq!(stats.total_in_person_duration, 34);
        assert_eq!(stats.percentage_in_person_ldr, 2.7);
        assert_eq!(stats.days_together_since_ldr, "1 month 4 days");
        assert_eq!(stats.days_together_since_long_distance, "1 month 4 days");
        assert_eq!(stats.days_together_current_year, 3);
        assert_eq!(stats.average_in_person_duration, 8.5);
        assert_eq!(stats.average_time_together_in_person, "1 week 1 day");
        assert_eq!(stats.average_days_together_per_month, 0.8);
        assert_eq!(stats.total_trips_taken, 4);
        assert_eq!(stats.number_of_locations_visited, 2);
        assert_eq!(stats.time_since_last_visit, "3 months");
        assert_eq!(stats.time_until_next_visit.as_deref(), Some("1 month 2 weeks"));
        assert_eq!(stats.current_year, 2024);
    }

    #[test]
    fn gap_metrics() {
        // gaps are [31, 91, 944, 58]
        let stats = reduce(&visits(), &[], &anchors("2024-06-01")).unwrap();

        assert_eq!(
            stats.longest_gap_between_meetings.as_deref(),
            Some("2 years 7 months 4 days")
        );
        assert_eq!(
            stats.shortest_gap_between_meetings.as_deref(),
            Some("1 month 1 day")
        );
        assert_eq!(stats.average_time_between_visits, "9 months 1 week 4 days");
    }

    #[test]
    fn average_gap_is_rounded_before_formatting() {
        // gaps [10, 1], mean 5.5
        let intervals = vec![
            Interval::new(d("2021-01-11"), d("2021-01-11"), "Oslo"),
            Interval::new(d("2021-01-13"), d("2021-01-14"), "Bergen"),
        ];
        let stats = reduce(&intervals, &[], &anchors("2021-03-01")).unwrap();
        assert_eq!(stats.average_time_between_visits, "6 days");
    }

    #[test]
    fn average_gap_ties_round_to_even() {
        // gaps [9, 20], mean 14.5
        let intervals = vec![
            Interval::new(d("2021-01-10"), d("2021-01-12"), "Oslo"),
            Interval::new(d("2021-02-02"), d("2021-02-03"), "Bergen"),
        ];
        let stats = reduce(&intervals, &[], &anchors("2021-03-01")).unwrap();
        assert_eq!(stats.average_time_between_visits, "2 weeks");
    }

    #[test]
    fn one_decimal_ties_round_to_even() {
        assert_eq!(round1(6.25), 6.2);
        assert_eq!(round1(77.3094), 77.3);
    }

    #[test]
    fn in_person_percentage_tie_rounds_to_even() {
        // 1 day out of 16 is exactly 6.25 %
        let short = AnchorDates {
            relationship_start_date: d("2020-01-01"),
            long_distance_date: d("2024-06-01"),
            current_date: d("2024-06-17"),
        };
        let one = vec![Interval::new(d("2024-06-05"), d("2024-06-05"), "Oslo")];
        let stats = reduce(&one, &[], &short).unwrap();
        assert_eq!(stats.percentage_in_person_ldr, 6.2);
    }

    #[test]
    fn per_month_divides_by_thirty_day_months() {
        assert_eq!(per_month(34, 1247).map(round1).unwrap(), 0.8);
        assert_eq!(per_month(30, 60).unwrap(), 15.0);
        assert!(matches!(
            per_month(5, 0),
            Err(StatsError::DegenerateAnchor { numerator: "days_together_since_LDR", .. })
        ));
    }

    #[test]
    fn single_interval_table() {
        let one = vec![Interval::new(d("2021-01-11"), d("2021-01-11"), "Oslo")];
        let stats = reduce(&one, &[], &anchors("2021-03-01")).unwrap();

        assert_eq!(
            stats.longest_gap_between_meetings.as_deref(),
            Some("1 week 3 days")
        );
        assert_eq!(
            stats.longest_gap_between_meetings,
            stats.shortest_gap_between_meetings
        );
        assert_eq!(stats.average_time_between_visits, "1 week 3 days");
        assert_eq!(stats.most_visited_city, "Oslo");
        assert_eq!(stats.total_in_person_duration, 1);
    }

    #[test]
    fn most_visited_tie_is_alphabetical_and_stable() {
        let first = reduce(&visits(), &[], &anchors("2024-06-01")).unwrap();
        let second = reduce(&visits(), &[], &anchors("2024-06-01")).unwrap();

        assert_eq!(first.most_visited_city, "Berlin");
        assert_eq!(first.most_visited_city, second.most_visited_city);
    }

    #[test]
    fn most_visited_prefers_higher_count() {
        let mut intervals = visits();
        intervals.push(Interval::new(d("2024-04-01"), d("2024-04-02"), "Paris"));
        let stats = reduce(&intervals, &[], &anchors("2024-06-01")).unwrap();
        assert_eq!(stats.most_visited_city, "Paris");
    }

    #[test]
    fn no_upcoming_visit() {
        let past_only = vec![
            Interval::new(d("2024-05-01"), d("2024-05-03"), "Rome"),
            Interval::new(d("2024-06-01"), d("2024-06-02"), "Rome"),
        ];
        let stats = reduce(&visits(), &past_only, &anchors("2024-06-01")).unwrap();
        assert_eq!(stats.time_until_next_visit, None);
        assert_eq!(next_visit(&[], d("2024-06-01")), None);
    }

    #[test]
    fn next_visit_uses_input_order() {
        let unsorted = vec![
            Interval::new(d("2024-09-01"), d("2024-09-02"), "Late"),
            Interval::new(d("2024-07-01"), d("2024-07-02"), "Early"),
        ];
        assert_eq!(next_visit(&unsorted, d("2024-06-01")), Some(92));
    }

    #[test]
    fn only_visits_after_long_distance_count_as_ldr_time() {
        let mut intervals = vec![Interval::new(d("2020-06-01"), d("2020-06-10"), "Home")];
        intervals.extend(visits());
        let stats = reduce(&intervals, &[], &anchors("2024-06-01")).unwrap();

        assert_eq!(stats.total_in_person_duration, 44);
        assert_eq!(stats.days_together_since_ldr, "1 month 4 days");
    }

    #[test]
    fn relationship_starting_today_is_degenerate() {
        let same_day = AnchorDates {
            relationship_start_date: d("2024-06-01"),
            long_distance_date: d("2024-06-01"),
            current_date: d("2024-06-01"),
        };
        let err = reduce(&visits(), &[], &same_day).unwrap_err();
        assert!(matches!(
            err,
            StatsError::DegenerateAnchor { denominator: "relationship_duration", .. }
        ));
    }

    #[test]
    fn long_distance_starting_today_is_degenerate() {
        let ldr_today = AnchorDates {
            relationship_start_date: d("2020-01-01"),
            long_distance_date: d("2024-06-01"),
            current_date: d("2024-06-01"),
        };
        let err = reduce(&visits(), &[], &ldr_today).unwrap_err();
        assert!(matches!(
            err,
            StatsError::DegenerateAnchor { denominator: "long_distance_duration", .. }
        ));
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = calculate(&[], &plans(), &anchors("2024-06-01")).unwrap_err();
        assert!(matches!(err, StatsError::EmptyDataset(_)));
    }
}
