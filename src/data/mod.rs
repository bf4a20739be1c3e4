//! Core data models for the weather dashboard
//!
//! This module contains the data types shared between the API clients, the
//! daily sampler and the UI: current conditions, raw forecast entries and the
//! weather icon mapping.

pub mod location;
pub mod openweather;

pub use location::GeoLocator;
pub use openweather::{OpenWeatherClient, WeatherError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current weather conditions for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// City name as requested
    pub city: String,
    /// Current temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Capitalized condition description, e.g. "Light rain"
    pub description: String,
    /// OpenWeatherMap icon code for the condition
    pub icon: WeatherIcon,
    /// When this data was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CurrentWeather {
    /// The three summary lines shown under the icon
    pub fn summary_lines(&self) -> [String; 3] {
        [
            format!("{} Weather", title_case(&self.city)),
            format!("🌡 Temp: {}°C   💧 {}%", self.temperature, self.humidity),
            format!("🌥 {}", self.description),
        ]
    }
}

/// A single forecast sample as supplied by the forecast API
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Sample time, seconds since the Unix epoch (UTC)
    pub timestamp_utc: i64,
    /// Temperature in Celsius
    pub temperature: f64,
}

/// A multi-day forecast batch for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Seconds added to UTC to get the city's local time
    pub timezone_offset: i64,
    /// Forecast samples, usually 3 hours apart
    pub entries: Vec<ForecastEntry>,
}

/// Types of weather conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Showers,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
    Unknown,
}

impl WeatherCondition {
    pub fn name(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::PartlyCloudy => "Partly cloudy",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Showers => "Showers",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Mist => "Mist",
            WeatherCondition::Unknown => "Unknown",
        }
    }
}

/// OpenWeatherMap icon code such as `"10d"`
///
/// The first two digits identify the condition group, the trailing letter
/// is `d` for day and `n` for night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherIcon(pub String);

impl WeatherIcon {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// Condition group encoded in the icon code
    ///
    /// - 01: clear sky
    /// - 02: few clouds
    /// - 03, 04: scattered / broken clouds
    /// - 09: shower rain
    /// - 10: rain
    /// - 11: thunderstorm
    /// - 13: snow
    /// - 50: mist
    pub fn condition(&self) -> WeatherCondition {
        match self.code().get(..2) {
            Some("01") => WeatherCondition::Clear,
            Some("02") => WeatherCondition::PartlyCloudy,
            Some("03") | Some("04") => WeatherCondition::Cloudy,
            Some("09") => WeatherCondition::Showers,
            Some("10") => WeatherCondition::Rain,
            Some("11") => WeatherCondition::Thunderstorm,
            Some("13") => WeatherCondition::Snow,
            Some("50") => WeatherCondition::Mist,
            _ => WeatherCondition::Unknown,
        }
    }

    pub fn is_night(&self) -> bool {
        self.code().ends_with('n')
    }

    /// Terminal glyph standing in for the icon bitmap
    pub fn glyph(&self) -> &'static str {
        match (self.condition(), self.is_night()) {
            (WeatherCondition::Clear, false) => "\u{2600}",        // ☀
            (WeatherCondition::Clear, true) => "\u{1F319}",        // 🌙
            (WeatherCondition::PartlyCloudy, _) => "\u{26C5}",     // ⛅
            (WeatherCondition::Cloudy, _) => "\u{2601}",           // ☁
            (WeatherCondition::Showers, _) => "\u{1F326}",         // 🌦
            (WeatherCondition::Rain, _) => "\u{1F327}",            // 🌧
            (WeatherCondition::Thunderstorm, _) => "\u{26C8}",     // ⛈
            (WeatherCondition::Snow, _) => "\u{2744}",             // ❄
            (WeatherCondition::Mist, _) => "\u{1F32B}",            // 🌫
            (WeatherCondition::Unknown, _) => "?",
        }
    }
}

/// First character uppercased, the rest lowercased
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Uppercases the first letter of every word, lowercases the others
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_weather() -> CurrentWeather {
        CurrentWeather {
            city: "new york".to_string(),
            temperature: 22.5,
            humidity: 65,
            description: "Light rain".to_string(),
            icon: WeatherIcon::new("10d"),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_lines() {
        let lines = sample_weather().summary_lines();
        assert_eq!(lines[0], "New York Weather");
        assert_eq!(lines[1], "🌡 Temp: 22.5°C   💧 65%");
        assert_eq!(lines[2], "🌥 Light rain");
    }

    #[test]
    fn test_icon_condition_mapping() {
        assert_eq!(WeatherIcon::new("01d").condition(), WeatherCondition::Clear);
        assert_eq!(WeatherIcon::new("02n").condition(), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherIcon::new("03d").condition(), WeatherCondition::Cloudy);
        assert_eq!(WeatherIcon::new("04n").condition(), WeatherCondition::Cloudy);
        assert_eq!(WeatherIcon::new("09d").condition(), WeatherCondition::Showers);
        assert_eq!(WeatherIcon::new("10d").condition(), WeatherCondition::Rain);
        assert_eq!(WeatherIcon::new("11n").condition(), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherIcon::new("13d").condition(), WeatherCondition::Snow);
        assert_eq!(WeatherIcon::new("50d").condition(), WeatherCondition::Mist);
        assert_eq!(WeatherIcon::new("").condition(), WeatherCondition::Unknown);
        assert_eq!(WeatherIcon::new("7").condition(), WeatherCondition::Unknown);
    }

    #[test]
    fn test_icon_code_round_trips_through_json() {
        let icon: WeatherIcon = serde_json::from_str(r#""04n""#).unwrap();
        assert_eq!(icon.code(), "04n");
        assert_eq!(serde_json::to_string(&icon).unwrap(), r#""04n""#);
    }

    #[test]
    fn test_icon_night_glyph() {
        assert!(WeatherIcon::new("01n").is_night());
        assert!(!WeatherIcon::new("01d").is_night());
        assert_ne!(WeatherIcon::new("01n").glyph(), WeatherIcon::new("01d").glyph());
        assert_eq!(WeatherIcon::new("10n").glyph(), WeatherIcon::new("10d").glyph());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("light RAIN"), "Light rain");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("é"), "É");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("SAINT-ÉTIENNE"), "Saint-Étienne");
        assert_eq!(title_case("o'fallon"), "O'Fallon");
    }

    #[test]
    fn test_current_weather_serialization_roundtrip() {
        let weather = sample_weather();
        let json = serde_json::to_string(&weather).expect("Failed to serialize CurrentWeather");
        assert!(json.contains("\"icon\":\"10d\""));

        let deserialized: CurrentWeather =
            serde_json::from_str(&json).expect("Failed to deserialize CurrentWeather");
        assert_eq!(deserialized, weather);
    }
}
