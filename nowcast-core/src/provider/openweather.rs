use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    WeatherError,
    model::{Coordinates, WeatherReport},
};

use super::WeatherApi;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn fetch_current(&self, query: &[(&str, String)]) -> Result<WeatherReport, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                WeatherError::Network(format!(
                    "Failed to send request to OpenWeather: {}",
                    e.without_url()
                ))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Network(format!(
                "Failed to read OpenWeather response body: {}",
                e.without_url()
            ))
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "OpenWeather request failed");
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        parse_current(&body, Utc::now())
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn fetch_by_city(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        debug!(city, "fetching current weather by city");
        self.fetch_current(&[("q", city.to_string())]).await
    }

    async fn fetch_by_coordinates(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherReport, WeatherError> {
        debug!(
            lat = coords.latitude,
            lon = coords.longitude,
            "fetching current weather by coordinates"
        );
        self.fetch_current(&[
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
        ])
        .await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

/// Decode a current-weather body. `fetched_at` stands in when the body has no `dt`.
fn parse_current(body: &str, fetched_at: DateTime<Utc>) -> Result<WeatherReport, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::Decode("response contained no weather conditions".into()))?;

    if parsed.main.humidity > 100 {
        return Err(WeatherError::Decode(format!(
            "humidity {}% is out of range",
            parsed.main.humidity
        )));
    }

    let observed_at = parsed
        .dt
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .unwrap_or(fetched_at);

    Ok(WeatherReport {
        description: weather.description,
        icon: weather.icon,
        temperature_kelvin: parsed.main.temp,
        humidity_percent: parsed.main.humidity,
        location_name: parsed.name,
        observed_at,
    })
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<OwErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
