//! Client-chosen date filtering.
//!
//! Ride dates are calendar dates in America/New_York, so relative windows
//! ("today", "last 7 days") anchor to the current date in that zone rather
//! than UTC. The aggregate endpoints filter server-side via `start`/`end`
//! query parameters; the ride list is filtered client-side with
//! [`DateFilter::contains`].

use anyhow::{Result, bail};
use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::America::New_York;
use std::fmt;
use std::str::FromStr;

/// A date window selected by the user. Relative variants are rolling
/// windows ending today; `Range` is inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    All,
    Today,
    /// Last 7 days.
    Week,
    /// Last 30 days.
    Month,
    /// Last 365 days.
    Year,
    Range {
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl DateFilter {
    /// Inclusive (start, end) bounds for a given anchor date. `None` means
    /// unbounded on that side.
    pub fn bounds(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match self {
            DateFilter::All => (None, None),
            DateFilter::Today => (Some(today), Some(today)),
            DateFilter::Week => (Some(today - Duration::days(6)), Some(today)),
            DateFilter::Month => (Some(today - Duration::days(29)), Some(today)),
            DateFilter::Year => (Some(today - Duration::days(364)), Some(today)),
            DateFilter::Range { start, end } => (Some(*start), Some(*end)),
        }
    }

    /// Whether a ride date falls inside the window.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let (start, end) = self.bounds(today);
        start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
    }

    /// `start`/`end` query parameters for the aggregate endpoints. Empty
    /// for [`DateFilter::All`].
    pub fn query_params(&self, today: NaiveDate) -> Vec<(&'static str, String)> {
        let (start, end) = self.bounds(today);
        let mut params = Vec::new();
        if let Some(start) = start {
            params.push(("start", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = end {
            params.push(("end", end.format("%Y-%m-%d").to_string()));
        }
        params
    }

    /// Approximate window length in days, used to pick a chart bucket
    /// granularity. `None` for unbounded filters.
    pub fn span_days(&self, today: NaiveDate) -> Option<i64> {
        let (start, end) = self.bounds(today);
        match (start, end) {
            (Some(start), Some(end)) => Some((end - start).num_days() + 1),
            _ => None,
        }
    }
}

impl FromStr for DateFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DateFilter::All),
            "today" => Ok(DateFilter::Today),
            "week" | "7d" => Ok(DateFilter::Week),
            "month" | "30d" => Ok(DateFilter::Month),
            "year" | "365d" => Ok(DateFilter::Year),
            other => {
                let Some((start, end)) = other.split_once("..") else {
                    bail!(
                        "invalid filter {s:?}: expected all, today, week, month, year, \
                         or YYYY-MM-DD..YYYY-MM-DD"
                    );
                };
                let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")?;
                let end = NaiveDate::parse_from_str(end, "%Y-%m-%d")?;
                if end < start {
                    bail!("invalid filter {s:?}: end date precedes start date");
                }
                Ok(DateFilter::Range { start, end })
            }
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFilter::All => write!(f, "all"),
            DateFilter::Today => write!(f, "today"),
            DateFilter::Week => write!(f, "week"),
            DateFilter::Month => write!(f, "month"),
            DateFilter::Year => write!(f, "year"),
            DateFilter::Range { start, end } => write!(
                f,
                "{}..{}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
        }
    }
}

/// Current calendar date in New York, where ride dates are recorded.
pub fn today_new_york() -> NaiveDate {
    Utc::now().with_timezone(&New_York).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_named_filters() {
        assert_eq!("all".parse::<DateFilter>().unwrap(), DateFilter::All);
        assert_eq!("Today".parse::<DateFilter>().unwrap(), DateFilter::Today);
        assert_eq!("7d".parse::<DateFilter>().unwrap(), DateFilter::Week);
        assert_eq!("month".parse::<DateFilter>().unwrap(), DateFilter::Month);
        assert_eq!("365d".parse::<DateFilter>().unwrap(), DateFilter::Year);
    }

    #[test]
    fn test_parse_range() {
        let filter = "2024-01-01..2024-02-01".parse::<DateFilter>().unwrap();
        assert_eq!(
            filter,
            DateFilter::Range {
                start: date(2024, 1, 1),
                end: date(2024, 2, 1),
            }
        );
    }

    #[test]
    fn test_parse_rejects_garbage_and_inverted_range() {
        assert!("yesterday".parse::<DateFilter>().is_err());
        assert!("2024-02-01..2024-01-01".parse::<DateFilter>().is_err());
    }

    #[test]
    fn test_week_bounds_are_seven_days_inclusive() {
        let today = date(2024, 3, 10);
        let (start, end) = DateFilter::Week.bounds(today);
        assert_eq!(start, Some(date(2024, 3, 4)));
        assert_eq!(end, Some(today));
        assert_eq!(DateFilter::Week.span_days(today), Some(7));
    }

    #[test]
    fn test_contains() {
        let today = date(2024, 3, 10);
        assert!(DateFilter::All.contains(date(1999, 1, 1), today));
        assert!(DateFilter::Today.contains(today, today));
        assert!(!DateFilter::Today.contains(date(2024, 3, 9), today));
        assert!(DateFilter::Week.contains(date(2024, 3, 4), today));
        assert!(!DateFilter::Week.contains(date(2024, 3, 3), today));
    }

    #[test]
    fn test_query_params() {
        let today = date(2024, 3, 10);
        assert!(DateFilter::All.query_params(today).is_empty());
        let params = DateFilter::Today.query_params(today);
        assert_eq!(
            params,
            vec![
                ("start", "2024-03-10".to_string()),
                ("end", "2024-03-10".to_string()),
            ]
        );
    }

    #[test]
    fn test_display_round_trip() {
        for s in ["all", "today", "week", "month", "year", "2024-01-01..2024-02-01"] {
            let filter = s.parse::<DateFilter>().unwrap();
            assert_eq!(filter.to_string(), s);
        }
    }
}
