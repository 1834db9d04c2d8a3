mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Result, bail};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GETs a URL and decodes the JSON body. Non-2xx responses are errors
/// carrying the status and URL.
pub async fn fetch_json<C: HttpClient>(client: &C, url: reqwest::Url) -> Result<serde_json::Value> {
    let mut req = reqwest::Request::new(reqwest::Method::GET, url);
    *req.timeout_mut() = Some(REQUEST_TIMEOUT);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        bail!("GET {} returned {}", resp.url(), status);
    }

    Ok(resp.json().await?)
}
