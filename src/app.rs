//! Application state management for the weather dashboard
//!
//! This module contains the main application state, handling keyboard input,
//! data loading, and turning API results into what the dashboard displays.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use tracing::{info, warn};

use crate::cli::StartupConfig;
use crate::daily::{select_daily_samples, DailySeries};
use crate::data::openweather::Fetched;
use crate::data::{CurrentWeather, Forecast, GeoLocator, OpenWeatherClient, WeatherError};

/// Shown when the forecast yields no daily samples
pub const NO_FORECAST_POINTS: &str = "No forecast points found (try again in a bit).";

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Before the first load completes
    Loading,
    /// Weather, icon and forecast chart
    Dashboard,
}

/// Whether keystrokes go to the city field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Work requested by a key press, run by the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Fetch weather and forecast for a city
    Search(String),
    /// Detect the city by IP, then search for it
    AutoLocate,
}

/// A modal error message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub title: &'static str,
    pub message: String,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    pub input_mode: InputMode,
    /// Contents of the city input field
    pub city_input: String,
    /// City of the data currently shown
    pub current_city: Option<String>,
    pub weather: Option<CurrentWeather>,
    /// Weather was served from an expired cache entry
    pub weather_stale: bool,
    /// One temperature per day for the chart
    pub forecast: DailySeries,
    /// Forecast was served from an expired cache entry
    pub forecast_stale: bool,
    /// Errors waiting to be shown, oldest first
    pub errors: VecDeque<ErrorDialog>,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Action for the event loop to run next
    pub pending: Option<PendingAction>,
    /// Timestamp of last data refresh
    pub last_refresh: Option<DateTime<Local>>,
    weather_client: OpenWeatherClient,
    geo_locator: GeoLocator,
}

impl App {
    /// Creates a new App; the first action loads the startup city or
    /// auto-detects one
    pub fn new(weather_client: OpenWeatherClient, geo_locator: GeoLocator, startup: StartupConfig) -> Self {
        let pending = match startup.initial_city {
            Some(ref city) => PendingAction::Search(city.clone()),
            None => PendingAction::AutoLocate,
        };

        Self {
            state: AppState::Loading,
            input_mode: InputMode::Normal,
            city_input: startup.initial_city.unwrap_or_default(),
            current_city: None,
            weather: None,
            weather_stale: false,
            forecast: DailySeries::default(),
            forecast_stale: false,
            errors: VecDeque::new(),
            show_help: false,
            should_quit: false,
            pending: Some(pending),
            last_refresh: None,
            weather_client,
            geo_locator,
        }
    }

    /// The error dialog currently shown, if any
    pub fn current_error(&self) -> Option<&ErrorDialog> {
        self.errors.front()
    }

    fn push_error(&mut self, title: &'static str, message: impl Into<String>) {
        let message = message.into();
        warn!("{}: {}", title, message);
        self.errors.push_back(ErrorDialog { title, message });
    }

    /// Runs the pending action, if any
    pub async fn run_pending(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };

        match action {
            PendingAction::Search(city) => self.show_weather(&city).await,
            PendingAction::AutoLocate => self.auto_weather().await,
        }

        self.state = AppState::Dashboard;
    }

    /// Fetches current weather and forecast for `city` concurrently
    pub async fn show_weather(&mut self, city: &str) {
        info!("Loading weather for {}", city);
        let (weather, forecast) = futures::future::join(
            self.weather_client.fetch_current(city),
            self.weather_client.fetch_forecast(city),
        )
        .await;

        self.current_city = Some(city.to_string());
        self.apply_weather(weather);
        self.apply_forecast(forecast);
        self.last_refresh = Some(Local::now());
    }

    /// Detects the city by IP and loads its weather
    pub async fn auto_weather(&mut self) {
        match self.geo_locator.detect_city().await {
            Some(city) => {
                self.city_input = city.clone();
                self.show_weather(&city).await;
            }
            None => self.push_error("Location Error", "Could not detect location."),
        }
    }

    /// Updates the summary from a weather result; failures keep the
    /// previous summary
    pub fn apply_weather(&mut self, result: Result<Fetched<CurrentWeather>, WeatherError>) {
        match result {
            Ok(fetched) => {
                self.weather_stale = fetched.is_stale;
                self.weather = Some(fetched.data);
            }
            Err(e) => self.push_error("Weather Error", e.to_string()),
        }
    }

    /// Samples the forecast into the chart series; failures and empty
    /// samples keep the previous chart
    pub fn apply_forecast(&mut self, result: Result<Fetched<Forecast>, WeatherError>) {
        match result {
            Ok(fetched) => {
                let samples = select_daily_samples(&fetched.data.entries, fetched.data.timezone_offset);
                if samples.is_empty() {
                    self.push_error("Forecast Error", NO_FORECAST_POINTS);
                } else {
                    self.forecast = DailySeries::from(samples.as_slice());
                    self.forecast_stale = fetched.is_stale;
                }
            }
            Err(e) => self.push_error("Forecast Error", e.to_string()),
        }
    }

    /// Queues a search for the city field's contents
    fn submit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        let city = self.city_input.trim().to_string();
        if city.is_empty() {
            self.push_error("Input Error", "Please enter a city name.");
        } else {
            self.pending = Some(PendingAction::Search(city));
        }
    }

    /// Queues a reload of the current city, or auto-detection if none
    fn request_refresh(&mut self) {
        self.pending = Some(match self.current_city {
            Some(ref city) => PendingAction::Search(city.clone()),
            None => PendingAction::AutoLocate,
        });
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - any key (error shown): dismiss the error
    /// - `/` or `e`: edit the city field
    /// - `Enter`: search for the city in the field
    /// - `Esc` (editing): stop editing
    /// - `a`: auto-detect city
    /// - `r`: refresh
    /// - `?`: toggle help
    /// - `q`: quit
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if !self.errors.is_empty() {
            self.errors.pop_front();
            return;
        }

        if self.show_help {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        if self.state == AppState::Loading {
            if key_event.code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        }

        match self.input_mode {
            InputMode::Editing => match key_event.code {
                KeyCode::Enter => self.submit_search(),
                KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Backspace => {
                    self.city_input.pop();
                }
                KeyCode::Char(c) => self.city_input.push(c),
                _ => {}
            },
            InputMode::Normal => match key_event.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('/') | KeyCode::Char('e') => self.input_mode = InputMode::Editing,
                KeyCode::Enter => self.submit_search(),
                KeyCode::Char('a') => self.pending = Some(PendingAction::AutoLocate),
                KeyCode::Char('r') => self.request_refresh(),
                KeyCode::Char('?') => self.show_help = true,
                _ => {}
            },
        }
    }
}
