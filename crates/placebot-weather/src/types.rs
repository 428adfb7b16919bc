use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::Sleet, // Freezing drizzle
            61 | 63 | 80 => Self::Rain,
            65 | 81 | 82 => Self::HeavyRain,
            66 | 67 => Self::Sleet, // Freezing rain
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Clear, // Unknown codes default to clear
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }
}

/// Current conditions at a point, valid for a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Temperature in degrees Celsius
    pub temperature_c: f64,
    pub condition: WeatherCondition,
    /// When the snapshot was retrieved
    pub fetched_at: DateTime<Utc>,
}

/// A city resolved through forward geocoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodedCity {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Weather API error: {status}")]
    Api { status: u16 },

    #[error("Unexpected response shape: {0}")]
    Parse(String),

    #[error("City not found: {0}")]
    CityNotFound(String),
}

impl WeatherError {
    /// User-facing message; never exposes upstream error text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Could not reach the weather service. Try again later.".to_string(),
            Self::Api { .. } => "The weather service returned an error. Try again later.".to_string(),
            Self::Parse(_) => "The weather service sent an unexpected reply.".to_string(),
            Self::CityNotFound(name) => format!("Could not find a city named \"{}\".", name),
        }
    }
}
