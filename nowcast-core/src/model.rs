use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Provider payload as decoded, temperature still in Kelvin.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub description: String,
    pub icon: String,
    pub temperature_kelvin: f64,
    pub humidity_percent: u8,
    pub location_name: String,
    pub observed_at: DateTime<Utc>,
}

/// A decoded, unit-converted weather snapshot for a single query.
///
/// Fields are private so an observation cannot be altered once built; the
/// only way in is [`WeatherObservation::from_report`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherObservation {
    description: String,
    icon: String,
    temperature_celsius: f64,
    humidity_percent: u8,
    location_name: String,
    observed_at: DateTime<Utc>,
}

impl WeatherObservation {
    pub fn from_report(report: WeatherReport) -> Self {
        Self {
            description: report.description,
            icon: report.icon,
            temperature_celsius: kelvin_to_celsius(report.temperature_kelvin),
            humidity_percent: report.humidity_percent,
            location_name: report.location_name,
            observed_at: report.observed_at,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.temperature_celsius
    }

    pub fn humidity_percent(&self) -> u8 {
        self.humidity_percent
    }

    pub fn location_name(&self) -> &str {
        &self.location_name
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@2x.png", self.icon)
    }
}

impl From<WeatherReport> for WeatherObservation {
    fn from(report: WeatherReport) -> Self {
        Self::from_report(report)
    }
}

/// What the user sees for the latest request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestOutcome {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Success(WeatherObservation),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherState {
    pub outcome: RequestOutcome,
    pub busy: bool,
}
