//! Trait and orchestration for the ride-tracker backend.
//!
//! The backend exposes four read-only JSON endpoints; the dashboard needs
//! all four before the engine can run. [`fetch_dashboard_data`] issues the
//! requests concurrently and, if any fail, reports them as one aggregated
//! error so the caller surfaces a single message naming every failed
//! request. No retries are performed.

use crate::filter::DateFilter;
use crate::parser::{LineStat, RideRecord, StopStat};
use anyhow::{Result, bail};
use async_trait::async_trait;

/// Abstraction over the ride-tracker backend's read endpoints.
///
/// The aggregate endpoints accept an optional date window; the ride list is
/// unfiltered server-side and is narrowed client-side by the caller.
#[async_trait]
pub trait TrackerApi {
    async fn rides(&self) -> Result<Vec<RideRecord>>;
    async fn visited_stops(&self, filter: &DateFilter) -> Result<Vec<StopStat>>;
    async fn transfer_stops(&self, filter: &DateFilter) -> Result<Vec<StopStat>>;
    async fn popular_lines(&self, filter: &DateFilter) -> Result<Vec<LineStat>>;
}

/// All four fetched inputs, ready for the engine.
#[derive(Debug)]
pub struct DashboardData {
    pub rides: Vec<RideRecord>,
    pub visited_stops: Vec<StopStat>,
    pub transfer_stops: Vec<StopStat>,
    pub popular_lines: Vec<LineStat>,
}

/// Fetches all four endpoints concurrently. Failures are collected and
/// reported as a single error naming each failed request.
pub async fn fetch_dashboard_data<A: TrackerApi>(
    api: &A,
    filter: &DateFilter,
) -> Result<DashboardData> {
    let (rides, visited, transfers, lines) = tokio::join!(
        api.rides(),
        api.visited_stops(filter),
        api.transfer_stops(filter),
        api.popular_lines(filter),
    );

    let mut failures = Vec::new();
    let describe = |name: &str, e: &anyhow::Error| format!("{name}: {e}");

    let rides = rides
        .map_err(|e| failures.push(describe("rides", &e)))
        .unwrap_or_default();
    let visited_stops = visited
        .map_err(|e| failures.push(describe("visited-stops", &e)))
        .unwrap_or_default();
    let transfer_stops = transfers
        .map_err(|e| failures.push(describe("transfer-stops", &e)))
        .unwrap_or_default();
    let popular_lines = lines
        .map_err(|e| failures.push(describe("popular-lines", &e)))
        .unwrap_or_default();

    if !failures.is_empty() {
        bail!("dashboard fetch failed [{}]", failures.join("; "));
    }

    Ok(DashboardData {
        rides,
        visited_stops,
        transfer_stops,
        popular_lines,
    })
}
