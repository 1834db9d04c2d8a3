//! JSON payload decoding for the tracker backend endpoints.
//!
//! The backend has shipped a couple of shapes over time: the ride list is
//! either a bare array or wrapped in `{ "rides": [...] }`, stop fields are
//! `board_stop`/`depart_stop` or `boarding_stop`/`departing_stop`, and the
//! ride date arrives as `date`, `ride_date`, or `created_at` (sometimes a
//! full timestamp). Current builds paginate the ride list and report the
//! page count under `pagination.pages`. Rows that are missing required
//! fields are dropped rather than failing the payload.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// One subway ride as recorded by the backend. Ride dates are calendar dates
/// in America/New_York.
#[derive(Debug, Clone, Serialize)]
pub struct RideRecord {
    pub line: String,
    pub board_stop: String,
    pub depart_stop: String,
    pub transferred: bool,
    pub date: NaiveDate,
}

/// One row from a per-stop aggregate endpoint. `count` is a visit count or a
/// transfer count depending on which endpoint produced it.
#[derive(Debug, Clone, Serialize)]
pub struct StopStat {
    pub stop_name: String,
    pub count: u64,
}

/// One row from the popular-lines aggregate endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LineStat {
    pub line: String,
    pub ride_count: u64,
}

/// Decodes the ride-list payload, accepting both the wrapped and bare-array
/// forms and both field-name generations. Rows missing a line, a stop, or a
/// parseable date are skipped.
pub fn parse_rides(payload: &Value) -> Result<Vec<RideRecord>> {
    let items = match payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("rides").and_then(Value::as_array) {
            Some(items) => items.as_slice(),
            None => bail!("ride payload object has no `rides` array"),
        },
        other => bail!("unexpected ride payload shape: {}", type_name(other)),
    };

    let rides = items
        .iter()
        .filter_map(|item| {
            let line = item["line"].as_str()?.to_string();
            let board_stop = item["board_stop"]
                .as_str()
                .or_else(|| item["boarding_stop"].as_str())?
                .to_string();
            let depart_stop = item["depart_stop"]
                .as_str()
                .or_else(|| item["departing_stop"].as_str())?
                .to_string();
            let transferred = item["transferred"].as_bool().unwrap_or(false);
            let raw_date = item["date"]
                .as_str()
                .or_else(|| item["ride_date"].as_str())
                .or_else(|| item["created_at"].as_str())?;
            let date = parse_calendar_date(raw_date)?;

            Some(RideRecord {
                line,
                board_stop,
                depart_stop,
                transferred,
                date,
            })
        })
        .collect::<Vec<_>>();

    if rides.len() < items.len() {
        debug!(
            skipped = items.len() - rides.len(),
            "Dropped malformed ride rows"
        );
    }

    Ok(rides)
}

/// Decodes a per-stop aggregate payload. `count_field` selects between
/// `visit_count` and `transfer_count`. Rows with an empty or missing
/// `stop_name` are dropped.
pub fn parse_stop_stats(payload: &Value, count_field: &str) -> Result<Vec<StopStat>> {
    let Some(items) = payload.as_array() else {
        bail!("expected a JSON array of stop stats");
    };

    let stats = items
        .iter()
        .filter_map(|item| {
            let stop_name = item["stop_name"].as_str()?.to_string();
            if stop_name.is_empty() {
                return None;
            }
            let count = item[count_field].as_u64()?;
            Some(StopStat { stop_name, count })
        })
        .collect::<Vec<_>>();

    if stats.len() < items.len() {
        debug!(
            skipped = items.len() - stats.len(),
            count_field, "Dropped malformed stop stat rows"
        );
    }

    Ok(stats)
}

/// Number of pages reported by the paginated ride endpoint. `None` for the
/// bare-array and unpaginated wrapped forms.
pub fn page_count(payload: &Value) -> Option<u64> {
    payload["pagination"]["pages"].as_u64()
}

/// Decodes the popular-lines aggregate payload.
pub fn parse_line_stats(payload: &Value) -> Result<Vec<LineStat>> {
    let Some(items) = payload.as_array() else {
        bail!("expected a JSON array of line stats");
    };

    Ok(items
        .iter()
        .filter_map(|item| {
            let line = item["line"].as_str()?.to_string();
            if line.is_empty() {
                return None;
            }
            let ride_count = item["ride_count"].as_u64()?;
            Some(LineStat { line, ride_count })
        })
        .collect())
}

/// Parses an ISO calendar date, tolerating a trailing time component as sent
/// by older backend builds (`2024-03-01T08:12:00`).
fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
