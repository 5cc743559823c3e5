use thiserror::Error;

/// Errors raised while resolving a city or fetching its weather.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Geocoding returned no results for the requested name.
    #[error("No coordinates found for '{0}'")]
    NotFound(String),

    /// The response decoded fine but lacked the section we asked for.
    #[error("No {0} data available")]
    MissingData(&'static str),

    /// Provider answered with a non-success status.
    #[error("Open-Meteo request failed with status {status}: {reason}")]
    Api { status: u16, reason: String },

    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse Open-Meteo response")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid date '{0}' in forecast")]
    InvalidDate(String),

    #[error("Unknown temperature unit '{0}'. Supported units: celsius, fahrenheit.")]
    InvalidUnit(String),
}

pub type Result<T> = std::result::Result<T, WeatherError>;
