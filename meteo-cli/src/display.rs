//! Plain-text rendering of current conditions and daily forecasts.

use std::io::{self, Write};

use meteo_core::{
    CurrentWeather, DailyForecast, TemperatureUnit, model::parse_iso_date, weather_code,
};

const PLACEHOLDER: &str = "?";

fn value_or_placeholder(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

/// `YYYY-MM-DD` when the value parses as an ISO date, otherwise the raw string.
fn format_date(raw: &str) -> String {
    parse_iso_date(raw)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn write_current_weather<W: Write>(
    out: &mut W,
    name: &str,
    country: &str,
    weather: &CurrentWeather,
    unit: TemperatureUnit,
) -> io::Result<()> {
    let symbol = unit.symbol();

    writeln!(out, "Current weather in {name}, {country}:")?;
    writeln!(out, "  • Condition: {}", weather_code::describe(weather.weathercode))?;
    writeln!(out, "  • Temperature: {}{symbol}", value_or_placeholder(weather.temperature))?;
    writeln!(out, "  • Wind speed: {} km/h", value_or_placeholder(weather.windspeed))?;
    writeln!(out)
}

pub fn write_daily_forecast<W: Write>(
    out: &mut W,
    name: &str,
    country: &str,
    daily: &DailyForecast,
    unit: TemperatureUnit,
) -> io::Result<()> {
    let symbol = unit.symbol();

    writeln!(out, "7-day forecast for {name}, {country}:")?;
    for day in daily.days() {
        writeln!(
            out,
            "{} | Max: {}{symbol} | Min: {}{symbol} | {}",
            format_date(day.date),
            value_or_placeholder(day.max),
            value_or_placeholder(day.min),
            weather_code::describe(day.weathercode),
        )?;
    }
    writeln!(out)
}
