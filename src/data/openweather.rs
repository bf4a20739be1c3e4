//! OpenWeatherMap API client
//!
//! Fetches current conditions (`/data/2.5/weather`) and the 5 day / 3 hour
//! forecast (`/data/2.5/forecast`) for a city name, in metric units, and
//! parses them into our data structures.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::{capitalize, CurrentWeather, Forecast, ForecastEntry, WeatherIcon};
use crate::cache::CacheManager;

/// Default endpoint for current conditions
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Default endpoint for the 5 day / 3 hour forecast
pub const DEFAULT_FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

const WEATHER_TIMEOUT: Duration = Duration::from_secs(8);
const FORECAST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// The API answered with a non-success status; holds its message
    #[error("{0}")]
    Api(String),
}

/// The request URL carries the API key, so it never goes into the message
impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        WeatherError::RequestFailed(e.without_url())
    }
}

impl WeatherError {
    /// Whether a cached copy may stand in for the failed request
    fn is_transport(&self) -> bool {
        matches!(self, WeatherError::RequestFailed(_))
    }
}

/// Data returned by the client, with a flag for cache fallback
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    /// True when served from an expired cache entry after a failed request
    pub is_stale: bool,
}

impl<T> Fetched<T> {
    fn fresh(data: T) -> Self {
        Self { data, is_stale: false }
    }

    fn stale(data: T) -> Self {
        Self { data, is_stale: true }
    }
}

/// Cache time-to-live per endpoint, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    pub weather_minutes: u64,
    pub forecast_minutes: u64,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            weather_minutes: 10,
            forecast_minutes: 60,
        }
    }
}

/// Client for the OpenWeatherMap API
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    /// HTTP client for making requests
    http_client: Client,
    /// API key sent as `appid`
    api_key: String,
    weather_url: String,
    forecast_url: String,
    /// Cache manager for persisting responses
    cache_manager: Option<CacheManager>,
    ttl: CacheTtl,
}

impl OpenWeatherClient {
    /// Create a new client against the public endpoints, without a cache
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            cache_manager: None,
            ttl: CacheTtl::default(),
        }
    }

    /// Override the endpoint URLs
    pub fn with_endpoints(mut self, weather_url: impl Into<String>, forecast_url: impl Into<String>) -> Self {
        self.weather_url = weather_url.into();
        self.forecast_url = forecast_url.into();
        self
    }

    /// Persist responses through the given cache manager
    pub fn with_cache(mut self, cache_manager: CacheManager, ttl: CacheTtl) -> Self {
        self.cache_manager = Some(cache_manager);
        self.ttl = ttl;
        self
    }

    /// Generates a cache key for an endpoint and city
    fn cache_key(kind: &str, city: &str) -> String {
        let slug: String = city
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}_{}", kind, slug)
    }

    /// Fetch current conditions for a city
    ///
    /// # Behavior
    /// - A fresh cache entry is returned without a request
    /// - Otherwise the API is queried and the result cached
    /// - If the request itself fails (network, timeout), an expired cache
    ///   entry is returned with `is_stale = true` when one exists
    pub async fn fetch_current(&self, city: &str) -> Result<Fetched<CurrentWeather>, WeatherError> {
        let key = Self::cache_key("weather", city);
        self.cached_or_fetch(&key, self.ttl.weather_minutes, self.request_current(city))
            .await
    }

    /// Fetch the multi-day forecast for a city, with the same cache behaviour
    /// as [`fetch_current`](Self::fetch_current)
    pub async fn fetch_forecast(&self, city: &str) -> Result<Fetched<Forecast>, WeatherError> {
        let key = Self::cache_key("forecast", city);
        self.cached_or_fetch(&key, self.ttl.forecast_minutes, self.request_forecast(city))
            .await
    }

    async fn cached_or_fetch<T, F>(&self, key: &str, ttl_minutes: u64, request: F) -> Result<Fetched<T>, WeatherError>
    where
        T: Serialize + DeserializeOwned,
        F: std::future::Future<Output = Result<T, WeatherError>>,
    {
        if let Some(ref cache_manager) = self.cache_manager {
            if let Some(cached) = cache_manager.read::<T>(key) {
                if !cached.is_expired {
                    debug!("Serving fresh cache entry {}", key);
                    return Ok(Fetched::fresh(cached.data));
                }
            }
        }

        match request.await {
            Ok(data) => {
                if let Some(ref cache_manager) = self.cache_manager {
                    if let Err(e) = cache_manager.write(key, &data, ttl_minutes) {
                        warn!("Failed to write cache entry {}: {}", key, e);
                    }
                }
                Ok(Fetched::fresh(data))
            }
            Err(e) if e.is_transport() => {
                if let Some(ref cache_manager) = self.cache_manager {
                    if let Some(cached) = cache_manager.read::<T>(key) {
                        warn!("Request failed ({}), serving expired cache entry {}", e, key);
                        return Ok(Fetched::stale(cached.data));
                    }
                }
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    fn query<'a>(&'a self, city: &'a str) -> [(&'static str, &'a str); 3] {
        [("q", city), ("appid", self.api_key.as_str()), ("units", "metric")]
    }

    async fn request_current(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        debug!("Requesting current weather for {}", city);
        let response = self
            .http_client
            .get(&self.weather_url)
            .query(&self.query(city))
            .timeout(WEATHER_TIMEOUT)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        parse_current_response(city, status, &body)
    }

    async fn request_forecast(&self, city: &str) -> Result<Forecast, WeatherError> {
        debug!("Requesting forecast for {}", city);
        let response = self
            .http_client
            .get(&self.forecast_url)
            .query(&self.query(city))
            .timeout(FORECAST_TIMEOUT)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        parse_forecast_response(status, &body)
    }
}

/// Parse a `/weather` response body into CurrentWeather
fn parse_current_response(city: &str, status: StatusCode, body: &str) -> Result<CurrentWeather, WeatherError> {
    if status != StatusCode::OK {
        return Err(api_error(body, "Unable to fetch weather"));
    }

    let response: OwmCurrentResponse = serde_json::from_str(body)?;
    let condition = response
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MissingField("weather".to_string()))?;

    Ok(CurrentWeather {
        city: city.trim().to_string(),
        temperature: response.main.temp,
        humidity: response.main.humidity.round().clamp(0.0, 100.0) as u8,
        description: capitalize(&condition.description),
        icon: WeatherIcon::new(condition.icon),
        fetched_at: Utc::now(),
    })
}

/// Parse a `/forecast` response body into a Forecast
fn parse_forecast_response(status: StatusCode, body: &str) -> Result<Forecast, WeatherError> {
    if status != StatusCode::OK {
        return Err(api_error(body, "Unable to fetch forecast"));
    }

    let response: OwmForecastResponse = serde_json::from_str(body)?;
    let timezone_offset = response.city.and_then(|c| c.timezone).unwrap_or(0);

    Ok(Forecast {
        timezone_offset,
        entries: response
            .list
            .into_iter()
            .map(|item| ForecastEntry {
                timestamp_utc: item.dt,
                temperature: item.main.temp,
            })
            .collect(),
    })
}

/// Builds an Api error from the body's `message`, or the fallback text
fn api_error(body: &str, fallback: &str) -> WeatherError {
    let message = serde_json::from_str::<OwmErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    WeatherError::Api(message)
}

#[derive(Debug, Deserialize)]
struct OwmErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
    icon: String,
}

/// `/weather` response structure
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmCity {
    timezone: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
}

/// `/forecast` response structure
#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    city: Option<OwmCity>,
    list: Vec<OwmForecastItem>,
}
