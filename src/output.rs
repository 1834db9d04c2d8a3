//! Output formatting: terminal charts, JSON, and CSV export.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

use crate::charts::{ChartData, ChartKind};
use crate::engine::consolidate::ConsolidatedStop;
use crate::stats::RideStats;

const BAR_WIDTH: usize = 40;

/// Writes the headline summary numbers.
pub fn render_summary<W: Write>(out: &mut W, stats: &RideStats) -> Result<()> {
    writeln!(
        out,
        "{} rides | {} transfers ({:.0}%) | {} stations | {} lines",
        stats.total_rides,
        stats.transfers,
        stats.transfer_pct(),
        stats.unique_stations,
        stats.unique_lines,
    )?;
    Ok(())
}

/// Renders one chart dataset as scaled text bars. Pie charts render with a
/// percentage column instead of the raw-value column.
pub fn render_chart<W: Write>(out: &mut W, chart: &ChartData) -> Result<()> {
    writeln!(out, "\n{}", chart.title)?;
    writeln!(out, "{}", "-".repeat(chart.title.len()))?;

    if chart.values.is_empty() {
        writeln!(out, "(no data)")?;
        return Ok(());
    }

    let max = chart.values.iter().copied().max().unwrap_or(1).max(1);
    let total: u64 = chart.values.iter().sum();
    let label_width = chart.labels.iter().map(|l| l.len()).max().unwrap_or(0);

    for (label, value) in chart.labels.iter().zip(&chart.values) {
        let bar_len = ((*value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
        let bar = "#".repeat(bar_len.max(usize::from(*value > 0)));
        match chart.kind {
            ChartKind::Pie => {
                let pct = if total == 0 {
                    0.0
                } else {
                    (*value as f64 / total as f64) * 100.0
                };
                writeln!(out, "{label:<label_width$}  {bar:<BAR_WIDTH$} {pct:>5.1}%")?;
            }
            ChartKind::Bar | ChartKind::Line => {
                writeln!(out, "{label:<label_width$}  {bar:<BAR_WIDTH$} {value}")?;
            }
        }
    }
    Ok(())
}

/// Writes any serializable report as pretty-printed JSON.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, report: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    Ok(())
}

/// Flat CSV row for a consolidated stop; list fields are joined with `;`.
#[derive(Serialize)]
struct StopCsvRow<'a> {
    display_name: &'a str,
    count: u64,
    primary_line: &'a str,
    lines: String,
    color: &'a str,
    is_transfer_complex: bool,
    station_names: String,
}

/// Writes consolidated stops to a CSV file, header included.
pub fn export_stops_csv(path: &str, stops: &[ConsolidatedStop]) -> Result<()> {
    debug!(path, rows = stops.len(), "Writing consolidated stop CSV");
    let mut writer = csv::Writer::from_path(path)?;

    for stop in stops {
        writer.serialize(StopCsvRow {
            display_name: &stop.display_name,
            count: stop.count,
            primary_line: &stop.primary_line,
            lines: stop.lines.join(";"),
            color: stop.color,
            is_transfer_complex: stop.is_transfer_complex,
            station_names: stop.station_names.join(";"),
        })?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_stop() -> ConsolidatedStop {
        ConsolidatedStop {
            display_name: "Union Sq Complex".to_string(),
            count: 15,
            primary_line: "6".to_string(),
            lines: vec!["4".to_string(), "6".to_string(), "L".to_string()],
            color: "#00933C",
            is_transfer_complex: true,
            station_names: vec!["14 St-Union Sq".to_string(), "14 St".to_string()],
        }
    }

    #[test]
    fn test_render_summary() {
        let stats = RideStats {
            total_rides: 4,
            transfers: 1,
            unique_stations: 5,
            unique_lines: 2,
        };
        let mut buf = Vec::new();
        render_summary(&mut buf, &stats).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("4 rides"));
        assert!(text.contains("(25%)"));
    }

    #[test]
    fn test_render_chart_scales_bars() {
        let chart = ChartData {
            title: "Test".to_string(),
            kind: ChartKind::Bar,
            labels: vec!["big".to_string(), "small".to_string()],
            values: vec![40, 10],
            colors: vec![String::new(), String::new()],
        };
        let mut buf = Vec::new();
        render_chart(&mut buf, &chart).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains(&"#".repeat(40)));
        assert!(text.contains(&format!("small  {}", "#".repeat(10))));
    }

    #[test]
    fn test_render_chart_empty() {
        let chart = ChartData {
            title: "Empty".to_string(),
            kind: ChartKind::Pie,
            labels: vec![],
            values: vec![],
            colors: vec![],
        };
        let mut buf = Vec::new();
        render_chart(&mut buf, &chart).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("(no data)"));
    }

    #[test]
    fn test_render_pie_shows_percentages() {
        let chart = ChartData {
            title: "Boroughs".to_string(),
            kind: ChartKind::Pie,
            labels: vec!["Manhattan".to_string(), "Brooklyn".to_string()],
            values: vec![3, 1],
            colors: vec![String::new(), String::new()],
        };
        let mut buf = Vec::new();
        render_chart(&mut buf, &chart).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("75.0%"));
        assert!(text.contains("25.0%"));
    }

    #[test]
    fn test_export_stops_csv_writes_header_and_rows() {
        let path = temp_path("subway_dash_test_export.csv");
        let _ = fs::remove_file(&path);

        export_stops_csv(&path, &[sample_stop()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("display_name"));
        assert!(lines[1].contains("Union Sq Complex"));
        assert!(lines[1].contains("4;6;L"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_round_trips() {
        let mut buf = Vec::new();
        write_json(&mut buf, &sample_stop()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["count"], 15);
        assert_eq!(value["primary_line"], "6");
    }
}
