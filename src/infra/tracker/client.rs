//! Concrete [`TrackerApi`] implementation over HTTP.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::filter::{DateFilter, today_new_york};
use crate::parser::{self, LineStat, RideRecord, StopStat};
use crate::services::tracker_api::TrackerApi;

/// Page size requested from the paginated ride endpoint. The backend
/// defaults to 20 rows per page.
const RIDES_PER_PAGE: u64 = 200;

/// HTTP client for a ride-tracker backend instance.
pub struct TrackerClient<C: HttpClient = BasicClient> {
    base_url: String,
    http: C,
}

impl TrackerClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, BasicClient::new())
    }
}

impl<C: HttpClient> TrackerClient<C> {
    pub fn with_client(base_url: &str, http: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn endpoint(&self, path: &str, filter: Option<&DateFilter>) -> Result<Url> {
        let base = format!("{}{}", self.base_url, path);
        let params = filter
            .map(|f| f.query_params(today_new_york()))
            .unwrap_or_default();
        let url = if params.is_empty() {
            Url::parse(&base)
        } else {
            Url::parse_with_params(&base, &params)
        }
        .with_context(|| format!("building URL for {base}"))?;
        debug!(url = %url, "Tracker request");
        Ok(url)
    }

    fn rides_endpoint(&self, page: u64) -> Result<Url> {
        let base = format!("{}/rides/", self.base_url);
        let url = Url::parse_with_params(
            &base,
            &[
                ("page", page.to_string()),
                ("per_page", RIDES_PER_PAGE.to_string()),
            ],
        )
        .with_context(|| format!("building URL for {base}"))?;
        debug!(url = %url, "Tracker request");
        Ok(url)
    }
}

#[async_trait]
impl<C: HttpClient> TrackerApi for TrackerClient<C> {
    /// Walks every page of the ride list. Unpaginated payloads (no
    /// `pagination` object) yield a single request.
    async fn rides(&self) -> Result<Vec<RideRecord>> {
        let mut rides = Vec::new();
        let mut page = 1;
        loop {
            let payload = fetch_json(&self.http, self.rides_endpoint(page)?).await?;
            let batch = parser::parse_rides(&payload)?;
            let exhausted = batch.is_empty();
            rides.extend(batch);
            match parser::page_count(&payload) {
                Some(pages) if page < pages && !exhausted => page += 1,
                _ => break,
            }
        }
        Ok(rides)
    }

    async fn visited_stops(&self, filter: &DateFilter) -> Result<Vec<StopStat>> {
        let url = self.endpoint("/stats/visited-stops", Some(filter))?;
        let payload = fetch_json(&self.http, url).await?;
        parser::parse_stop_stats(&payload, "visit_count")
    }

    async fn transfer_stops(&self, filter: &DateFilter) -> Result<Vec<StopStat>> {
        let url = self.endpoint("/stats/transfer-stops", Some(filter))?;
        let payload = fetch_json(&self.http, url).await?;
        parser::parse_stop_stats(&payload, "transfer_count")
    }

    async fn popular_lines(&self, filter: &DateFilter) -> Result<Vec<LineStat>> {
        let url = self.endpoint("/stats/popular-lines", Some(filter))?;
        let payload = fetch_json(&self.http, url).await?;
        parser::parse_line_stats(&payload)
    }
}
