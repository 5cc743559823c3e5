//! Sequential per-city pipeline: geocode, current weather, optional forecast
//! and chart. A failure only abandons the remaining steps for that city.

use std::{
    io::{self, Write},
    path::PathBuf,
};

use meteo_core::{TemperatureUnit, WeatherSource};
use tracing::{debug, info};

use crate::{chart, display};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub unit: TemperatureUnit,
    pub language: String,
    pub show_forecast: bool,
    /// Only honoured together with `show_forecast`.
    pub show_chart: bool,
    pub chart_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn all_failed(&self) -> bool {
        self.succeeded == 0 && self.failed > 0
    }
}

/// Process `cities` in order, printing results and per-city errors to `out`.
///
/// Only a failure to write the error line itself aborts the batch.
pub async fn run<W: Write>(
    source: &dyn WeatherSource,
    cities: &[String],
    options: &BatchOptions,
    out: &mut W,
) -> io::Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for city in cities {
        info!(city = %city, "fetching weather");

        match process_city(source, city, options, out).await {
            Ok(()) => summary.succeeded += 1,
            Err(err) => {
                debug!(city = %city, error = ?err, "city failed");
                writeln!(out, "Error for {city}: {err:#}\n")?;
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

async fn process_city<W: Write>(
    source: &dyn WeatherSource,
    city: &str,
    options: &BatchOptions,
    out: &mut W,
) -> anyhow::Result<()> {
    let location = source.geocode(city, &options.language).await?;
    let country = location.country_or_unknown();
    debug!(
        city,
        name = %location.name,
        latitude = location.latitude,
        longitude = location.longitude,
        "resolved location"
    );

    let current = source
        .current_weather(location.latitude, location.longitude, options.unit)
        .await?;
    display::write_current_weather(out, &location.name, country, &current, options.unit)?;

    if !options.show_forecast {
        return Ok(());
    }

    let daily = source
        .daily_forecast(location.latitude, location.longitude, options.unit)
        .await?;
    display::write_daily_forecast(out, &location.name, country, &daily, options.unit)?;

    if options.show_chart {
        let path = chart::save(&options.chart_dir, &location.name, country, &daily, options.unit)?;
        writeln!(out, "Chart saved to {}\n", path.display())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use meteo_core::{CurrentWeather, DailyForecast, Location, WeatherError};
    use std::{collections::HashMap, sync::Mutex};

    /// In-memory source: known cities resolve, everything else is `NotFound`.
    #[derive(Debug, Default)]
    struct FakeSource {
        locations: HashMap<String, Location>,
        daily: Option<DailyForecast>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn with_city(mut self, city: &str, country: Option<&str>) -> Self {
            self.locations.insert(
                city.to_string(),
                Location {
                    latitude: 30.0,
                    longitude: 31.0,
                    name: city.to_string(),
                    country: country.map(str::to_string),
                },
            );
            self
        }

        fn with_daily(mut self, daily: DailyForecast) -> Self {
            self.daily = Some(daily);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherSource for FakeSource {
        async fn geocode(&self, city: &str, language: &str) -> meteo_core::Result<Location> {
            self.calls.lock().unwrap().push(format!("geocode:{city}:{language}"));
            self.locations
                .get(city)
                .cloned()
                .ok_or_else(|| WeatherError::NotFound(city.to_string()))
        }

        async fn current_weather(
            &self,
            _latitude: f64,
            _longitude: f64,
            unit: TemperatureUnit,
        ) -> meteo_core::Result<CurrentWeather> {
            self.calls.lock().unwrap().push(format!("current:{unit}"));
            Ok(CurrentWeather { temperature: Some(22.0), windspeed: Some(3.0), weathercode: Some(0) })
        }

        async fn daily_forecast(
            &self,
            _latitude: f64,
            _longitude: f64,
            unit: TemperatureUnit,
        ) -> meteo_core::Result<DailyForecast> {
            self.calls.lock().unwrap().push(format!("daily:{unit}"));
            self.daily.clone().ok_or(WeatherError::MissingData("daily forecast"))
        }
    }

    fn options() -> BatchOptions {
        BatchOptions {
            unit: TemperatureUnit::Celsius,
            language: "en".into(),
            show_forecast: false,
            show_chart: false,
            chart_dir: PathBuf::from("."),
        }
    }

    fn sample_daily() -> DailyForecast {
        DailyForecast {
            time: vec!["2025-02-02".into()],
            temperature_2m_max: vec![Some(28.0)],
            temperature_2m_min: vec![Some(18.0)],
            weathercode: vec![Some(2)],
        }
    }

    async fn run_to_string(
        source: &FakeSource,
        cities: &[&str],
        options: &BatchOptions,
    ) -> (String, BatchSummary) {
        let cities: Vec<String> = cities.iter().map(|c| c.to_string()).collect();
        let mut out = Vec::new();
        let summary = run(source, &cities, options, &mut out).await.expect("write to Vec");
        (String::from_utf8(out).unwrap(), summary)
    }

    #[tokio::test]
    async fn failing_city_does_not_abort_the_batch() {
        let source = FakeSource::default().with_city("Cairo", Some("Egypt"));

        let (text, summary) = run_to_string(&source, &["Atlantis", "Cairo"], &options()).await;

        let error_at = text
            .find("Error for Atlantis: No coordinates found for 'Atlantis'")
            .expect("error line printed");
        let weather_at = text
            .find("Current weather in Cairo, Egypt:")
            .expect("second city still processed");
        assert!(error_at < weather_at);
        assert!(text.contains("Temperature: 22°C"));
        assert_eq!(summary, BatchSummary { succeeded: 1, failed: 1 });
        assert!(!summary.all_failed());
    }

    #[tokio::test]
    async fn missing_country_is_shown_as_unknown() {
        let source = FakeSource::default().with_city("Null Island", None);

        let (text, _) = run_to_string(&source, &["Null Island"], &options()).await;

        assert!(text.contains("Current weather in Null Island, Unknown:"));
    }

    #[tokio::test]
    async fn forecast_is_skipped_unless_requested() {
        let source = FakeSource::default()
            .with_city("Cairo", Some("Egypt"))
            .with_daily(sample_daily());

        let (text, _) = run_to_string(&source, &["Cairo"], &options()).await;

        assert!(!text.contains("7-day forecast"));
        assert_eq!(source.calls(), vec!["geocode:Cairo:en", "current:celsius"]);
    }

    #[tokio::test]
    async fn forecast_follows_current_weather() {
        let source = FakeSource::default()
            .with_city("Cairo", Some("Egypt"))
            .with_daily(sample_daily());
        let opts = BatchOptions {
            unit: TemperatureUnit::Fahrenheit,
            language: "ar".into(),
            show_forecast: true,
            ..options()
        };

        let (text, summary) = run_to_string(&source, &["Cairo"], &opts).await;

        let current_at = text.find("Current weather in Cairo, Egypt:").unwrap();
        let forecast_at = text.find("7-day forecast for Cairo, Egypt:").unwrap();
        assert!(current_at < forecast_at);
        assert!(text.contains("Temperature: 22°F"));
        assert!(text.contains("2025-02-02 | Max: 28°F | Min: 18°F | Partly cloudy"));
        assert_eq!(
            source.calls(),
            vec!["geocode:Cairo:ar", "current:fahrenheit", "daily:fahrenheit"]
        );
        assert_eq!(summary.succeeded, 1);
    }

    #[tokio::test]
    async fn missing_forecast_keeps_current_output_and_reports_error() {
        let source = FakeSource::default().with_city("Cairo", Some("Egypt"));
        let opts = BatchOptions { show_forecast: true, ..options() };

        let (text, summary) = run_to_string(&source, &["Cairo"], &opts).await;

        assert!(text.contains("Current weather in Cairo, Egypt:"));
        assert!(text.contains("Error for Cairo: No daily forecast data available\n\n"));
        assert!(summary.all_failed());
    }

    #[tokio::test]
    async fn chart_requires_forecast() {
        let source = FakeSource::default()
            .with_city("Cairo", Some("Egypt"))
            .with_daily(sample_daily());
        let opts = BatchOptions { show_chart: true, ..options() };

        let (text, summary) = run_to_string(&source, &["Cairo"], &opts).await;

        assert!(!text.contains("Chart saved to"));
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn chart_is_written_after_forecast() {
        let dir = std::env::temp_dir().join(format!("meteo-batch-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let source = FakeSource::default()
            .with_city("Cairo", Some("Egypt"))
            .with_daily(sample_daily());
        let opts = BatchOptions {
            show_forecast: true,
            show_chart: true,
            chart_dir: dir.clone(),
            ..options()
        };

        let (text, summary) = run_to_string(&source, &["Cairo"], &opts).await;

        let chart_path = dir.join("cairo-forecast.svg");
        assert!(text.contains(&format!("Chart saved to {}", chart_path.display())));
        assert!(chart_path.exists());
        assert_eq!(summary.succeeded, 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn chart_write_failure_reports_the_cause() {
        let dir = std::env::temp_dir()
            .join(format!("meteo-batch-missing-{}", std::process::id()))
            .join("not-created");

        let source = FakeSource::default()
            .with_city("Cairo", Some("Egypt"))
            .with_daily(sample_daily());
        let opts = BatchOptions {
            show_forecast: true,
            show_chart: true,
            chart_dir: dir.clone(),
            ..options()
        };

        let (text, summary) = run_to_string(&source, &["Cairo"], &opts).await;

        let prefix = format!(
            "Error for Cairo: Failed to write chart file: {}: ",
            dir.join("cairo-forecast.svg").display()
        );
        let line = text.lines().find(|l| l.starts_with("Error for Cairo")).expect("error line");
        assert!(line.starts_with(&prefix), "unexpected error line: {line}");
        assert!(line.len() > prefix.len(), "cause missing: {line}");
        assert!(summary.all_failed());
    }

    #[tokio::test]
    async fn every_city_failing_is_reported() {
        let source = FakeSource::default();

        let (text, summary) = run_to_string(&source, &["Atlantis", "Lemuria"], &options()).await;

        assert!(text.contains("Error for Atlantis:"));
        assert!(text.contains("Error for Lemuria:"));
        assert!(summary.all_failed());
    }
}
