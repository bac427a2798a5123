use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Text};
use nowcast_core::{
    Config, Coordinates, IpApiLocator, LocationPermission, Locator, RequestOutcome,
    WeatherState, WeatherStore, WeatherUseCase, api_from_config,
};
use tracing::debug;

use crate::render;

const HERE_COMMAND: &str = ":here";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "nowcast", version, about = "Current weather for a city or your location")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and location preference.
    Configure,

    /// Show the current weather for a city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,

        /// Print the observation as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the current weather at a latitude/longitude.
    #[command(allow_negative_numbers = true)]
    Coords {
        lat: f64,
        lon: f64,

        #[arg(long)]
        json: bool,
    },

    /// Show the current weather at your approximate location.
    Here {
        /// Skip the location permission prompt.
        #[arg(long, short)]
        yes: bool,

        #[arg(long)]
        json: bool,
    },

    /// Look up cities as you type them; `:here` uses your location.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        let mut config = Config::load_from(&config_path)?;

        match self.command {
            Command::Configure => configure(&mut config, &config_path).await,
            Command::Show { city, json } => {
                let store = store_from(&config)?;
                let handle = store
                    .on_city_input(&city)
                    .ok_or_else(|| anyhow!("City name must not be empty"))?;
                handle.await?;
                report(&store.snapshot(), json)
            }
            Command::Coords { lat, lon, json } => {
                let store = store_from(&config)?;
                store.fetch_coordinates(Coordinates::new(lat, lon)).await?;
                report(&store.snapshot(), json)
            }
            Command::Here { yes, json } => {
                let store = store_from(&config)?;
                let permission = ask_location_permission(&config, yes).await?;
                let locator = Arc::new(IpApiLocator::from_config(&config));
                store.fetch_location(permission, locator).await?;
                report(&store.snapshot(), json)
            }
            Command::Interactive => interactive(&config).await,
        }
    }
}

fn store_from(config: &Config) -> Result<WeatherStore> {
    let api = api_from_config(config)?;
    Ok(WeatherStore::new(WeatherUseCase::new(api)))
}

fn report(state: &WeatherState, json: bool) -> Result<()> {
    match &state.outcome {
        RequestOutcome::Success(obs) if json => {
            println!("{}", serde_json::to_string_pretty(obs)?);
            Ok(())
        }
        RequestOutcome::Success(_) => {
            println!("{}", render::state(state));
            Ok(())
        }
        RequestOutcome::Failure(msg) => Err(anyhow!("{msg}")),
        RequestOutcome::Idle | RequestOutcome::Loading => bail!("No weather data available"),
    }
}

/// Permission decided without prompting, if the flags or config settle it.
fn preset_permission(config: &Config, yes: bool) -> Option<LocationPermission> {
    if yes {
        return Some(LocationPermission::Granted);
    }
    config.allow_location.map(LocationPermission::from)
}

/// Run a blocking inquire prompt off the async runtime.
async fn prompt<T, F>(ask: F) -> Result<Option<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, InquireError> + Send + 'static,
{
    match tokio::task::spawn_blocking(ask).await? {
        Ok(answer) => Ok(Some(answer)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn ask_location_permission(config: &Config, yes: bool) -> Result<LocationPermission> {
    if let Some(permission) = preset_permission(config, yes) {
        debug!(?permission, "location permission preset");
        return Ok(permission);
    }

    let granted = prompt(|| {
        Confirm::new("Allow nowcast to look up your approximate location?")
            .with_default(false)
            .with_help_message("Your public IP address is sent to ip-api.com")
            .prompt()
    })
    .await?
    .unwrap_or(false);

    Ok(LocationPermission::from(granted))
}

async fn configure(config: &mut Config, path: &Path) -> Result<()> {
    let Some(api_key) = prompt(|| {
        Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt()
    })
    .await?
    else {
        bail!("Configuration cancelled");
    };

    config.set_api_key(api_key);
    config.api_key().context("The API key must not be blank")?;

    let always_allow = prompt(|| {
        Confirm::new("Allow location lookups without asking each time?")
            .with_default(false)
            .prompt()
    })
    .await?
    .unwrap_or(false);
    config.allow_location = always_allow.then_some(true);

    config.save_to(path)?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

async fn interactive(config: &Config) -> Result<()> {
    let store = store_from(config)?;
    let locator: Arc<dyn Locator> = Arc::new(IpApiLocator::from_config(config));

    println!("Type a city name, `{HERE_COMMAND}` for your location, Esc to quit.");

    while let Some(input) = prompt(|| Text::new("City:").prompt()).await? {
        let handle = if input.trim() == HERE_COMMAND {
            let permission = ask_location_permission(config, false).await?;
            Some(store.fetch_location(permission, locator.clone()))
        } else {
            store.on_city_input(&input)
        };

        let Some(handle) = handle else { continue };
        handle.await?;
        println!("{}", render::state(&store.snapshot()));
    }

    Ok(())
}
