use crate::{
    Config,
    error::Result,
    model::{CurrentWeather, DailyForecast, Location, TemperatureUnit},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// The three lookups the CLI performs for each city.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Resolve `city` to the first matching location.
    async fn geocode(&self, city: &str, language: &str) -> Result<Location>;

    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
        unit: TemperatureUnit,
    ) -> Result<CurrentWeather>;

    /// 7-day daily forecast (max/min temperature and weather code).
    async fn daily_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        unit: TemperatureUnit,
    ) -> Result<DailyForecast>;
}

/// Construct the Open-Meteo source from config.
pub fn source_from_config(config: &Config) -> Result<Box<dyn WeatherSource>> {
    Ok(Box::new(OpenMeteoClient::new(config)?))
}
