use thiserror::Error;

/// Everything that can go wrong between a user action and a rendered observation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode weather response: {0}")]
    Decode(String),

    #[error("Weather provider returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Location permission denied")]
    PermissionDenied,
}

impl WeatherError {
    /// Message shown to the user in a failed outcome. Never empty.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Check your connection and try again.".to_string(),
            Self::Decode(_) => "The weather service sent an unexpected response.".to_string(),
            Self::Api { status: 404, .. } => "City not found".to_string(),
            Self::Api { status: 401, .. } => {
                "The weather service rejected the API key. Run `nowcast configure`.".to_string()
            }
            Self::Api { message, .. } if !message.trim().is_empty() => {
                format!("Weather service error: {message}")
            }
            Self::Api { status, .. } => format!("Weather service error (status {status})"),
            Self::LocationUnavailable(_) => "Unable to retrieve location".to_string(),
            Self::PermissionDenied => "Location permission denied".to_string(),
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        WeatherError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_a_user_message() {
        let errors = [
            WeatherError::Network("connection refused".into()),
            WeatherError::Decode("missing field `main`".into()),
            WeatherError::Api {
                status: 404,
                message: "city not found".into(),
            },
            WeatherError::Api {
                status: 500,
                message: String::new(),
            },
            WeatherError::LocationUnavailable("no fix".into()),
            WeatherError::PermissionDenied,
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "{err:?} has an empty message");
        }
    }

    #[test]
    fn api_error_prefers_provider_message() {
        let err = WeatherError::Api {
            status: 429,
            message: "too many requests".into(),
        };
        assert_eq!(err.user_message(), "Weather service error: too many requests");

        let err = WeatherError::Api {
            status: 503,
            message: "  ".into(),
        };
        assert_eq!(err.user_message(), "Weather service error (status 503)");
    }

    #[test]
    fn unknown_city_reads_naturally() {
        let err = WeatherError::Api {
            status: 404,
            message: "city not found".into(),
        };
        assert_eq!(err.user_message(), "City not found");
    }

    #[test]
    fn serde_errors_become_decode_errors() {
        let err: WeatherError = serde_json::from_str::<u8>("\"nope\"").unwrap_err().into();
        assert!(matches!(err, WeatherError::Decode(_)));
    }
}
