//! Chart-ready datasets built from engine output.
//!
//! These are plain label/value/color triples: the terminal renderer and the
//! JSON output both consume them unchanged.

use crate::engine::colors::{DEFAULT_COLOR, color_for};
use crate::engine::consolidate::ConsolidatedStop;
use crate::parser::LineStat;
use crate::reference::BoroughTable;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

#[derive(Debug, Serialize)]
pub struct ChartData {
    pub title: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub colors: Vec<String>,
}

/// Borough slice colors, keyed by the borough's index in the borough table
/// so a borough keeps its color even when others are absent.
const BOROUGH_PALETTE: &[&str] = &["#0039A6", "#FF6319", "#6CBE45", "#EE352E", "#FCCC0A"];

/// Ride volume over time (line chart), one point per bucket.
pub fn ride_volume(buckets: Vec<(String, u64)>) -> ChartData {
    let (labels, values): (Vec<_>, Vec<_>) = buckets.into_iter().unzip();
    let colors = vec![DEFAULT_COLOR.to_string(); labels.len()];
    ChartData {
        title: "Rides over time".to_string(),
        kind: ChartKind::Line,
        labels,
        values,
        colors,
    }
}

/// Most-visited consolidated stops (bar chart), colored by primary line.
pub fn top_stops(stops: &[ConsolidatedStop], top: usize) -> ChartData {
    stop_bars("Most visited stops", stops, top)
}

/// Most-transferred-at consolidated stops (bar chart).
pub fn transfer_activity(stops: &[ConsolidatedStop], top: usize) -> ChartData {
    stop_bars("Transfer activity", stops, top)
}

fn stop_bars(title: &str, stops: &[ConsolidatedStop], top: usize) -> ChartData {
    let shown = stops.iter().take(top);
    let mut labels = Vec::new();
    let mut values = Vec::new();
    let mut colors = Vec::new();
    for stop in shown {
        labels.push(stop.display_name.clone());
        values.push(stop.count);
        colors.push(stop.color.to_string());
    }
    ChartData {
        title: title.to_string(),
        kind: ChartKind::Bar,
        labels,
        values,
        colors,
    }
}

/// Ride counts per line (bar chart), colored with the line palette.
pub fn line_usage(lines: &[LineStat]) -> ChartData {
    let mut labels = Vec::new();
    let mut values = Vec::new();
    let mut colors = Vec::new();
    for stat in lines {
        labels.push(stat.line.clone());
        values.push(stat.ride_count);
        colors.push(color_for(&stat.line).to_string());
    }
    ChartData {
        title: "Line usage".to_string(),
        kind: ChartKind::Bar,
        labels,
        values,
        colors,
    }
}

/// Ride distribution across boroughs (pie chart). Slice colors come from
/// the borough's position in the reference table; names not in the table
/// ("Unknown" included) take the neutral gray.
pub fn borough_distribution(
    distribution: Vec<(String, u64)>,
    boroughs: &BoroughTable,
) -> ChartData {
    let mut labels = Vec::new();
    let mut values = Vec::new();
    let mut colors = Vec::new();
    for (borough, count) in distribution {
        let color = boroughs
            .names()
            .position(|name| name == borough)
            .map(|i| BOROUGH_PALETTE[i % BOROUGH_PALETTE.len()].to_string())
            .unwrap_or_else(|| DEFAULT_COLOR.to_string());
        colors.push(color);
        labels.push(borough);
        values.push(count);
    }
    ChartData {
        title: "Rides by borough".to_string(),
        kind: ChartKind::Pie,
        labels,
        values,
        colors,
    }
}
