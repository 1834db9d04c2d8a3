//! Merges per-stop aggregate rows into consolidated display rows.
//!
//! Stations that fuzzy-match a transfer complex are grouped under the
//! complex's display name; everything else stands alone under its own
//! station name. Counts are summed, line sets unioned, and the dominant
//! line recomputed from cumulative ride usage across all contributing
//! stations. The function never fails: malformed rows degrade by omission.

use crate::engine::colors::color_for;
use crate::engine::matching::{classify_borough, find_complex};
use crate::engine::usage::{LineUsage, primary_line};
use crate::parser::{RideRecord, StopStat};
use crate::reference::{BoroughTable, ComplexTable};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// One consolidated display row, built fresh on every call.
#[derive(Debug, Clone, Serialize)]
pub struct ConsolidatedStop {
    /// Complex name when the stop matched a transfer complex, otherwise the
    /// original station name. This is the consolidation key.
    pub display_name: String,
    /// Sum of the counts of every merged aggregate row.
    pub count: u64,
    /// Line with the highest observed ride frequency at the consolidated
    /// location.
    pub primary_line: String,
    /// Union of lines declared by the complex and observed in rides, in
    /// first-seen order.
    pub lines: Vec<String>,
    /// Display color derived from `primary_line`.
    pub color: &'static str,
    pub is_transfer_complex: bool,
    /// Station names that contributed rows, in first-seen order.
    pub station_names: Vec<String>,
}

impl ConsolidatedStop {
    fn push_line(&mut self, line: &str) {
        if !self.lines.iter().any(|l| l == line) {
            self.lines.push(line.to_string());
        }
    }

    fn push_station(&mut self, station: &str) {
        if !self.station_names.iter().any(|s| s == station) {
            self.station_names.push(station.to_string());
        }
    }
}

/// Consolidates stop aggregate rows, in input order, into display rows
/// sorted by count descending (first-seen order preserved among equal
/// counts).
pub fn consolidate(
    stop_stats: &[StopStat],
    rides: &[RideRecord],
    complexes: &ComplexTable,
) -> Vec<ConsolidatedStop> {
    let usage = LineUsage::from_rides(rides);

    let mut stops: Vec<ConsolidatedStop> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in stop_stats {
        if row.stop_name.is_empty() {
            debug!("Skipping stop stat row with empty stop name");
            continue;
        }

        let complex = find_complex(&row.stop_name, complexes);
        let key = complex
            .map(|c| c.name.clone())
            .unwrap_or_else(|| row.stop_name.clone());

        match index.get(&key) {
            Some(&i) => {
                let stop = &mut stops[i];
                stop.count += row.count;
                stop.push_station(&row.stop_name);
                for line in usage.lines_at(&row.stop_name) {
                    stop.push_line(&line);
                }
                promote_primary_line(stop, &usage);
            }
            None => {
                let primary = primary_line(&row.stop_name, complex, &usage);
                let mut stop = ConsolidatedStop {
                    display_name: key.clone(),
                    count: row.count,
                    color: color_for(&primary),
                    primary_line: primary,
                    lines: Vec::new(),
                    is_transfer_complex: complex.is_some(),
                    station_names: vec![row.stop_name.clone()],
                };
                match complex {
                    Some(complex) => {
                        for line in &complex.lines {
                            stop.push_line(line);
                        }
                    }
                    None => {
                        for line in usage.lines_at(&row.stop_name) {
                            stop.push_line(&line);
                        }
                    }
                }
                index.insert(key, stops.len());
                stops.push(stop);
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    stops.sort_by(|a, b| b.count.cmp(&a.count));
    stops
}

/// Re-evaluates the dominant line after a merge by comparing cumulative
/// usage across every contributing station. Monotonic: the current primary
/// is only replaced by a line with strictly higher cumulative usage.
fn promote_primary_line(stop: &mut ConsolidatedStop, usage: &LineUsage) {
    let mut best_count = usage.combined_count(&stop.station_names, &stop.primary_line);
    let mut best: Option<String> = None;

    for line in &stop.lines {
        let count = usage.combined_count(&stop.station_names, line);
        if count > best_count {
            best_count = count;
            best = Some(line.clone());
        }
    }

    if let Some(line) = best {
        stop.color = color_for(&line);
        stop.primary_line = line;
    }
}

/// Ride-count totals per borough over a consolidated stop list, in borough
/// table order with "Unknown" last (and only when non-zero). A consolidated
/// stop classifies by the first of its contributing station names that
/// yields a borough.
pub fn borough_distribution(
    stops: &[ConsolidatedStop],
    boroughs: &BoroughTable,
) -> Vec<(String, u64)> {
    let mut totals: HashMap<&str, u64> = HashMap::new();

    for stop in stops {
        let borough = stop
            .station_names
            .iter()
            .map(|name| classify_borough(name, boroughs))
            .find(|b| *b != crate::engine::matching::UNKNOWN_BOROUGH)
            .unwrap_or(crate::engine::matching::UNKNOWN_BOROUGH);
        *totals.entry(borough).or_default() += stop.count;
    }

    let mut distribution: Vec<(String, u64)> = boroughs
        .names()
        .filter_map(|name| totals.get(name).map(|&count| (name.to_string(), count)))
        .collect();

    if let Some(&unknown) = totals.get(crate::engine::matching::UNKNOWN_BOROUGH) {
        distribution.push((
            crate::engine::matching::UNKNOWN_BOROUGH.to_string(),
            unknown,
        ));
    }

    distribution
}
