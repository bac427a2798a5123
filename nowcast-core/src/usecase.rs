use std::sync::Arc;

use tracing::debug;

use crate::{
    WeatherError,
    model::{Coordinates, WeatherObservation},
    provider::WeatherApi,
};

/// Turns provider reports into Celsius observations.
#[derive(Debug, Clone)]
pub struct WeatherUseCase {
    api: Arc<dyn WeatherApi>,
}

impl WeatherUseCase {
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self { api }
    }

    pub async fn get_weather(&self, city: &str) -> Result<WeatherObservation, WeatherError> {
        let report = self.api.fetch_by_city(city).await?;
        debug!(city, kelvin = report.temperature_kelvin, "converting report");
        Ok(WeatherObservation::from_report(report))
    }

    pub async fn get_weather_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherObservation, WeatherError> {
        let report = self
            .api
            .fetch_by_coordinates(Coordinates::new(latitude, longitude))
            .await?;
        debug!(latitude, longitude, kelvin = report.temperature_kelvin, "converting report");
        Ok(WeatherObservation::from_report(report))
    }
}
