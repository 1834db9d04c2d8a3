//! Ride summary numbers and time bucketing for the ride-volume chart.

use crate::filter::DateFilter;
use crate::parser::RideRecord;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Headline numbers shown above the charts.
#[derive(Debug, Default, Serialize)]
pub struct RideStats {
    pub total_rides: usize,
    pub transfers: usize,
    pub unique_stations: usize,
    pub unique_lines: usize,
}

impl RideStats {
    pub fn from_rides(rides: &[RideRecord]) -> Self {
        let mut stations = HashSet::new();
        let mut lines = HashSet::new();
        let mut transfers = 0;

        for ride in rides {
            stations.insert(ride.board_stop.as_str());
            stations.insert(ride.depart_stop.as_str());
            lines.insert(ride.line.as_str());
            if ride.transferred {
                transfers += 1;
            }
        }

        RideStats {
            total_rides: rides.len(),
            transfers,
            unique_stations: stations.len(),
            unique_lines: lines.len(),
        }
    }

    pub fn transfer_pct(&self) -> f64 {
        if self.total_rides == 0 {
            0.0
        } else {
            (self.transfers as f64 / self.total_rides as f64) * 100.0
        }
    }
}

/// Chart label granularity for ride-volume bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Day,
    Week,
    Month,
    Year,
}

impl Bucket {
    /// Label for the bucket containing a date. Labels sort
    /// lexicographically in chronological order.
    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            Bucket::Day => date.format("%Y-%m-%d").to_string(),
            Bucket::Week => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Bucket::Month => date.format("%Y-%m").to_string(),
            Bucket::Year => date.format("%Y").to_string(),
        }
    }
}

/// Picks a label granularity matching the filter's window length: days for
/// short windows, coarser buckets as the window grows.
pub fn granularity_for(filter: &DateFilter, today: NaiveDate) -> Bucket {
    match filter.span_days(today) {
        Some(days) if days <= 31 => Bucket::Day,
        Some(days) if days <= 120 => Bucket::Week,
        Some(days) if days <= 731 => Bucket::Month,
        Some(_) => Bucket::Year,
        // Unbounded windows get month buckets.
        None => Bucket::Month,
    }
}

/// Ride counts per bucket label, in chronological order.
pub fn bucket_rides(rides: &[RideRecord], bucket: Bucket) -> Vec<(String, u64)> {
    let mut buckets: BTreeMap<String, u64> = BTreeMap::new();
    for ride in rides {
        *buckets.entry(bucket.label(ride.date)).or_default() += 1;
    }
    buckets.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ride(line: &str, board: &str, depart: &str, transferred: bool, date: &str) -> RideRecord {
        RideRecord {
            line: line.to_string(),
            board_stop: board.to_string(),
            depart_stop: depart.to_string(),
            transferred,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    #[test]
    fn test_ride_stats_counts() {
        let rides = vec![
            ride("L", "Bedford Av", "14 St", false, "2024-03-01"),
            ride("6", "14 St", "Astor Pl", true, "2024-03-01"),
        ];
        let stats = RideStats::from_rides(&rides);
        assert_eq!(stats.total_rides, 2);
        assert_eq!(stats.transfers, 1);
        // Bedford Av, 14 St, Astor Pl
        assert_eq!(stats.unique_stations, 3);
        assert_eq!(stats.unique_lines, 2);
        assert_eq!(stats.transfer_pct(), 50.0);
    }

    #[test]
    fn test_transfer_pct_empty() {
        assert_eq!(RideStats::default().transfer_pct(), 0.0);
    }

    #[test]
    fn test_bucket_labels() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(Bucket::Day.label(date), "2024-03-05");
        assert_eq!(Bucket::Week.label(date), "2024-W10");
        assert_eq!(Bucket::Month.label(date), "2024-03");
        assert_eq!(Bucket::Year.label(date), "2024");
    }

    #[test]
    fn test_granularity_for_windows() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(granularity_for(&DateFilter::Today, today), Bucket::Day);
        assert_eq!(granularity_for(&DateFilter::Week, today), Bucket::Day);
        assert_eq!(granularity_for(&DateFilter::Month, today), Bucket::Day);
        assert_eq!(granularity_for(&DateFilter::Year, today), Bucket::Month);
        assert_eq!(granularity_for(&DateFilter::All, today), Bucket::Month);
    }

    #[test]
    fn test_bucket_rides_ordered() {
        let rides = vec![
            ride("L", "a", "b", false, "2024-03-02"),
            ride("L", "a", "b", false, "2024-03-01"),
            ride("L", "a", "b", false, "2024-03-02"),
        ];
        let buckets = bucket_rides(&rides, Bucket::Day);
        assert_eq!(
            buckets,
            vec![
                ("2024-03-01".to_string(), 1),
                ("2024-03-02".to_string(), 2),
            ]
        );
    }
}
