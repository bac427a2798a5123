//! Where "use my location" gets its coordinates from.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{Config, WeatherError, model::Coordinates};

pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json/";

/// The user's answer to "may we look up your location?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPermission {
    Granted,
    Denied,
}

impl From<bool> for LocationPermission {
    fn from(granted: bool) -> Self {
        if granted { Self::Granted } else { Self::Denied }
    }
}

#[async_trait]
pub trait Locator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, WeatherError>;
}

/// Always answers with the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Coordinates);

#[async_trait]
impl Locator for FixedLocator {
    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        Ok(self.0)
    }
}

/// Approximate location from the caller's public IP address (ip-api.com).
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpApiLocator {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_GEOLOCATION_URL)
    }

    pub fn with_url(url: &str) -> Self {
        Self {
            url: url.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_url(config.geolocation_url.as_deref().unwrap_or(DEFAULT_GEOLOCATION_URL))
    }
}

impl Default for IpApiLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Locator for IpApiLocator {
    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        let unavailable = |what: String| {
            warn!(reason = %what, "IP geolocation failed");
            WeatherError::LocationUnavailable(what)
        };

        let res = self
            .http
            .get(&self.url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(|e| unavailable(format!("geolocation request failed: {e}")))?;

        if !res.status().is_success() {
            return Err(unavailable(format!("geolocation service returned {}", res.status())));
        }

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|e| unavailable(format!("unreadable geolocation response: {e}")))?;

        match body {
            IpApiResponse { status, lat: Some(lat), lon: Some(lon), .. } if status == "success" => {
                debug!(lat, lon, "resolved approximate location");
                Ok(Coordinates::new(lat, lon))
            }
            IpApiResponse { message, .. } => Err(unavailable(
                message.unwrap_or_else(|| "geolocation service gave no coordinates".to_string()),
            )),
        }
    }
}
