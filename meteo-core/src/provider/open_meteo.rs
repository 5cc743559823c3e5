use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    Config,
    error::{Result, WeatherError},
    model::{CurrentWeather, DailyForecast, Location, TemperatureUnit},
};

use super::WeatherSource;

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weathercode";

/// Client for the Open-Meteo geocoding and forecast endpoints. No API key needed.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
        })
    }

    async fn fetch(&self, url: &str, query: &[(&'static str, String)]) -> Result<String> {
        debug!(url, ?query, "sending Open-Meteo request");

        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Api {
                status: status.as_u16(),
                reason: error_reason(&body),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn geocode(&self, city: &str, language: &str) -> Result<Location> {
        let body = self.fetch(&self.geocoding_url, &geocoding_query(city, language)).await?;
        parse_geocoding(city, &body)
    }

    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
        unit: TemperatureUnit,
    ) -> Result<CurrentWeather> {
        let query = current_weather_query(latitude, longitude, unit);
        let body = self.fetch(&self.forecast_url, &query).await?;
        parse_current_weather(&body)
    }

    async fn daily_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        unit: TemperatureUnit,
    ) -> Result<DailyForecast> {
        let query = daily_forecast_query(latitude, longitude, unit);
        let body = self.fetch(&self.forecast_url, &query).await?;
        parse_daily_forecast(&body)
    }
}

pub fn geocoding_query(city: &str, language: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", city.to_string()),
        ("count", "1".to_string()),
        ("language", language.to_string()),
        ("format", "json".to_string()),
    ]
}

pub fn current_weather_query(
    latitude: f64,
    longitude: f64,
    unit: TemperatureUnit,
) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", latitude.to_string()),
        ("longitude", longitude.to_string()),
        ("current_weather", "true".to_string()),
        ("timezone", "auto".to_string()),
        ("temperature_unit", unit.as_str().to_string()),
        ("windspeed_unit", "kmh".to_string()),
    ]
}

pub fn daily_forecast_query(
    latitude: f64,
    longitude: f64,
    unit: TemperatureUnit,
) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", latitude.to_string()),
        ("longitude", longitude.to_string()),
        ("daily", DAILY_FIELDS.to_string()),
        ("timezone", "auto".to_string()),
        ("temperature_unit", unit.as_str().to_string()),
    ]
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<Location>>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
    daily: Option<DailyForecast>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    reason: String,
}

/// Take the first geocoding result; an empty or absent list means `NotFound`.
pub fn parse_geocoding(city: &str, body: &str) -> Result<Location> {
    let parsed: GeocodingResponse = serde_json::from_str(body)?;

    parsed
        .results
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| WeatherError::NotFound(city.to_string()))
}

pub fn parse_current_weather(body: &str) -> Result<CurrentWeather> {
    let parsed: ForecastResponse = serde_json::from_str(body)?;
    parsed.current_weather.ok_or(WeatherError::MissingData("current weather"))
}

pub fn parse_daily_forecast(body: &str) -> Result<DailyForecast> {
    let parsed: ForecastResponse = serde_json::from_str(body)?;
    parsed.daily.ok_or(WeatherError::MissingData("daily forecast"))
}

fn error_reason(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.reason)
        .unwrap_or_else(|_| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
