use chrono::Local;
use nowcast_core::{RequestOutcome, WeatherObservation, WeatherState};

pub fn observation(obs: &WeatherObservation) -> String {
    let observed = obs.observed_at().with_timezone(&Local);

    format!(
        "{}\n  Temperature: {:.2} °C\n  Humidity: {}%\n  Weather: {}\n  Observed: {}\n  Icon: {}",
        obs.location_name(),
        obs.temperature_celsius(),
        obs.humidity_percent(),
        obs.description(),
        observed.format("%Y-%m-%d %H:%M"),
        obs.icon_url(),
    )
}

pub fn state(state: &WeatherState) -> String {
    match &state.outcome {
        RequestOutcome::Idle => "No weather data available".to_string(),
        RequestOutcome::Loading => "Loading...".to_string(),
        RequestOutcome::Success(obs) => observation(obs),
        RequestOutcome::Failure(msg) => format!("Error: {msg}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nowcast_core::WeatherReport;

    fn london() -> WeatherObservation {
        WeatherObservation::from_report(WeatherReport {
            description: "Clear sky".to_string(),
            icon: "01d".to_string(),
            temperature_kelvin: 300.0,
            humidity_percent: 80,
            location_name: "London".to_string(),
            observed_at: Utc::now(),
        })
    }

    #[test]
    fn observation_lists_every_field() {
        let text = observation(&london());

        assert!(text.starts_with("London\n"));
        assert!(text.contains("Temperature: 26.85 °C"));
        assert!(text.contains("Humidity: 80%"));
        assert!(text.contains("Weather: Clear sky"));
        assert!(text.contains("Icon: https://openweathermap.org/img/wn/01d@2x.png"));
    }

    #[test]
    fn state_covers_every_outcome() {
        let render = |outcome| {
            state(&WeatherState {
                outcome,
                busy: false,
            })
        };

        assert_eq!(render(RequestOutcome::Idle), "No weather data available");
        assert_eq!(render(RequestOutcome::Loading), "Loading...");
        assert_eq!(
            render(RequestOutcome::Failure("City not found".into())),
            "Error: City not found"
        );
        assert!(render(RequestOutcome::Success(london())).contains("26.85"));
    }
}
