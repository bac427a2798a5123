use crate::{
    Config, WeatherError,
    model::{Coordinates, WeatherReport},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// A source of current weather reports.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn fetch_by_city(&self, city: &str) -> Result<WeatherReport, WeatherError>;

    async fn fetch_by_coordinates(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherReport, WeatherError>;
}

/// Construct the OpenWeather client from config.
pub fn api_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherApi>> {
    let api_key = config.api_key()?;

    let client = match config.base_url.as_deref() {
        Some(base_url) => OpenWeatherClient::with_base_url(api_key.to_owned(), base_url),
        None => OpenWeatherClient::new(api_key.to_owned()),
    };

    Ok(Arc::new(client))
}
