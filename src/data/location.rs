//! IP geolocation
//!
//! Detects the user's city from their public IP address using ipinfo.io.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

/// Default IP geolocation endpoint
pub const DEFAULT_LOCATION_URL: &str = "https://ipinfo.io/json";

const LOCATION_TIMEOUT: Duration = Duration::from_secs(6);

/// The only part of the ipinfo.io response we use
#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    city: Option<String>,
}

/// Client for detecting the current city from the public IP
#[derive(Debug, Clone)]
pub struct GeoLocator {
    http_client: Client,
    url: String,
}

impl Default for GeoLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoLocator {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_LOCATION_URL)
    }

    /// Creates a GeoLocator against a custom endpoint
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            url: url.into(),
        }
    }

    /// Detects the city for the current public IP
    ///
    /// Every failure (network, status, body, missing city) yields `None`;
    /// the caller reports it as a location error.
    pub async fn detect_city(&self) -> Option<String> {
        let response = match self
            .http_client
            .get(&self.url)
            .timeout(LOCATION_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Location request failed: {}", e);
                return None;
            }
        };

        let status = response.status();
        let body = response.text().await.ok()?;
        let city = parse_city(status, &body);
        debug!("Detected city: {:?}", city);
        city
    }
}

/// Extracts the city from an ipinfo.io response
fn parse_city(status: StatusCode, body: &str) -> Option<String> {
    if status != StatusCode::OK {
        return None;
    }
    serde_json::from_str::<IpInfoResponse>(body)
        .ok()?
        .city
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
