//! Per-station line-usage counting.
//!
//! The usage table is the sole source of truth for "which line is dominant
//! at a station". Every ride increments the count for its line at both the
//! boarding and departing stop. Lines are kept in first-observed order per
//! station so that ties resolve the same way regardless of how callers
//! later iterate.

use crate::parser::RideRecord;
use crate::reference::TransferComplex;
use std::collections::HashMap;

/// Line identifier used when a station has no recorded usage at all.
pub const FALLBACK_LINE: &str = "S";

/// Ride-frequency counts per `(station, line)` pair.
#[derive(Debug, Default)]
pub struct LineUsage {
    by_station: HashMap<String, Vec<(String, u64)>>,
}

impl LineUsage {
    /// Builds the usage table from raw ride records. A ride contributes to
    /// both its board stop and its depart stop independently.
    pub fn from_rides(rides: &[RideRecord]) -> Self {
        let mut usage = Self::default();
        for ride in rides {
            usage.bump(&ride.board_stop, &ride.line);
            usage.bump(&ride.depart_stop, &ride.line);
        }
        usage
    }

    fn bump(&mut self, station: &str, line: &str) {
        if station.is_empty() || line.is_empty() {
            return;
        }
        let lines = self.by_station.entry(station.to_string()).or_default();
        match lines.iter_mut().find(|(l, _)| l == line) {
            Some((_, count)) => *count += 1,
            None => lines.push((line.to_string(), 1)),
        }
    }

    /// Usage count for one line at one station.
    pub fn count(&self, station: &str, line: &str) -> u64 {
        self.by_station
            .get(station)
            .and_then(|lines| lines.iter().find(|(l, _)| l == line))
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Lines observed at a station, in first-observed order.
    pub fn lines_at(&self, station: &str) -> Vec<String> {
        self.by_station
            .get(station)
            .map(|lines| lines.iter().map(|(l, _)| l.clone()).collect())
            .unwrap_or_default()
    }

    /// The highest-usage line at a station. Ties keep the line observed
    /// first, so the result is stable under reordering of the input rides'
    /// counts.
    pub fn top_line(&self, station: &str) -> Option<&str> {
        let lines = self.by_station.get(station)?;
        lines
            .iter()
            .fold(None::<&(String, u64)>, |best, candidate| match best {
                Some(b) if b.1 >= candidate.1 => Some(b),
                _ => Some(candidate),
            })
            .map(|(line, _)| line.as_str())
    }

    /// The highest-usage line at a station among a list of candidates,
    /// tested in candidate order. Returns `None` if no candidate has any
    /// recorded usage.
    pub fn top_line_among<'c>(&self, station: &str, candidates: &'c [String]) -> Option<&'c str> {
        let mut best: Option<(&str, u64)> = None;
        for candidate in candidates {
            let count = self.count(station, candidate);
            if count > 0 && best.map_or(true, |(_, c)| count > c) {
                best = Some((candidate.as_str(), count));
            }
        }
        best.map(|(line, _)| line)
    }

    /// Cumulative usage of one line summed over a set of station names.
    pub fn combined_count<'a, I>(&self, stations: I, line: &str) -> u64
    where
        I: IntoIterator<Item = &'a String>,
    {
        stations
            .into_iter()
            .map(|station| self.count(station, line))
            .sum()
    }
}

/// Picks the dominant line for one station per the consolidation rules:
/// complex members prefer the busiest of the complex's declared lines,
/// falling back to the first declared line, then to [`FALLBACK_LINE`];
/// standalone stations take their busiest observed line.
pub fn primary_line(
    station: &str,
    complex: Option<&TransferComplex>,
    usage: &LineUsage,
) -> String {
    match complex {
        Some(complex) => usage
            .top_line_among(station, &complex.lines)
            .or_else(|| complex.lines.first().map(String::as_str))
            .unwrap_or(FALLBACK_LINE)
            .to_string(),
        None => usage
            .top_line(station)
            .unwrap_or(FALLBACK_LINE)
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ride(line: &str, board: &str, depart: &str) -> RideRecord {
        RideRecord {
            line: line.to_string(),
            board_stop: board.to_string(),
            depart_stop: depart.to_string(),
            transferred: false,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    fn complex(lines: &[&str]) -> TransferComplex {
        TransferComplex {
            id: "x".to_string(),
            name: "X Complex".to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
            station_names: vec![],
        }
    }

    #[test]
    fn test_ride_counts_both_stops() {
        let usage = LineUsage::from_rides(&[ride("L", "Bedford Av", "14 St")]);
        assert_eq!(usage.count("Bedford Av", "L"), 1);
        assert_eq!(usage.count("14 St", "L"), 1);
        assert_eq!(usage.count("14 St", "6"), 0);
    }

    #[test]
    fn test_top_line_prefers_highest_count() {
        let usage = LineUsage::from_rides(&[
            ride("L", "14 St", "Bedford Av"),
            ride("6", "14 St", "Astor Pl"),
            ride("6", "14 St", "Astor Pl"),
        ]);
        assert_eq!(usage.top_line("14 St"), Some("6"));
    }

    #[test]
    fn test_top_line_tie_keeps_first_observed() {
        let usage = LineUsage::from_rides(&[
            ride("L", "14 St", "Bedford Av"),
            ride("6", "14 St", "Astor Pl"),
        ]);
        assert_eq!(usage.top_line("14 St"), Some("L"));
    }

    #[test]
    fn test_top_line_among_ignores_unlisted_lines() {
        let usage = LineUsage::from_rides(&[
            ride("L", "14 St", "Bedford Av"),
            ride("L", "14 St", "Bedford Av"),
            ride("6", "14 St", "Astor Pl"),
        ]);
        let candidates = vec!["4".to_string(), "6".to_string()];
        assert_eq!(usage.top_line_among("14 St", &candidates), Some("6"));
    }

    #[test]
    fn test_top_line_among_none_without_usage() {
        let usage = LineUsage::from_rides(&[ride("L", "14 St", "Bedford Av")]);
        let candidates = vec!["4".to_string(), "6".to_string()];
        assert_eq!(usage.top_line_among("14 St", &candidates), None);
    }

    #[test]
    fn test_primary_line_complex_fallbacks() {
        let usage = LineUsage::from_rides(&[ride("L", "14 St", "Bedford Av")]);
        // Declared line with usage wins.
        assert_eq!(
            primary_line("14 St", Some(&complex(&["6", "L"])), &usage),
            "L"
        );
        // No declared line has usage: first declared line.
        assert_eq!(
            primary_line("14 St", Some(&complex(&["4", "5"])), &usage),
            "4"
        );
        // No declared lines at all: shuttle fallback.
        assert_eq!(primary_line("14 St", Some(&complex(&[])), &usage), "S");
    }

    #[test]
    fn test_primary_line_standalone_fallback() {
        let usage = LineUsage::default();
        assert_eq!(primary_line("Nowhere St", None, &usage), "S");
    }

    #[test]
    fn test_combined_count() {
        let usage = LineUsage::from_rides(&[
            ride("6", "14 St-Union Sq", "Astor Pl"),
            ride("6", "14 St", "Astor Pl"),
        ]);
        let stations = vec!["14 St-Union Sq".to_string(), "14 St".to_string()];
        assert_eq!(usage.combined_count(&stations, "6"), 2);
        // Astor Pl saw the 6 twice as the depart stop.
        assert_eq!(usage.count("Astor Pl", "6"), 2);
    }
}
