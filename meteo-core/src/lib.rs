//! Core library for the `meteo` CLI.
//!
//! This crate defines:
//! - Endpoint configuration
//! - The `WeatherSource` abstraction and its Open-Meteo client
//! - Shared domain models (locations, current weather, daily forecasts)
//! - The WMO weather code table
//!
//! It is used by `meteo-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod weather_code;

pub use config::Config;
pub use error::{Result, WeatherError};
pub use model::{CurrentWeather, DailyForecast, ForecastDay, Location, TemperatureUnit};
pub use provider::{OpenMeteoClient, WeatherSource, source_from_config};
