//! Core library for the `nowcast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and the Kelvin-to-Celsius use case
//! - A state holder that publishes the outcome of the latest request
//! - Location lookup for "weather where I am"
//!
//! It is used by `nowcast-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod state;
pub mod usecase;

pub use config::Config;
pub use error::WeatherError;
pub use location::{FixedLocator, IpApiLocator, LocationPermission, Locator};
pub use model::{
    Coordinates, RequestOutcome, WeatherObservation, WeatherReport, WeatherState,
    kelvin_to_celsius,
};
pub use provider::{WeatherApi, api_from_config, openweather::OpenWeatherClient};
pub use state::WeatherStore;
pub use usecase::WeatherUseCase;
