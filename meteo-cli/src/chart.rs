//! Line chart of the daily max/min temperatures, rendered to SVG.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use meteo_core::{DailyForecast, TemperatureUnit, WeatherError, model::parse_iso_date};
use plotters::prelude::*;
use plotters::style::FontTransform;

const CHART_SIZE: (u32, u32) = (960, 540);
const Y_PADDING: f64 = 2.0;

/// Render the chart and write it as `<slug>-forecast.svg` into `dir`.
pub fn save(
    dir: &Path,
    name: &str,
    country: &str,
    daily: &DailyForecast,
    unit: TemperatureUnit,
) -> Result<PathBuf> {
    let svg = render_svg(name, country, daily, unit)?;

    let path = dir.join(format!("{}-forecast.svg", slug(name)));
    fs::write(&path, svg)
        .with_context(|| format!("Failed to write chart file: {}", path.display()))?;

    Ok(path)
}

/// Every date must parse; unlike the text table there is no fallback.
fn parse_dates(daily: &DailyForecast) -> Result<Vec<NaiveDate>, WeatherError> {
    daily
        .time
        .iter()
        .map(|raw| parse_iso_date(raw).ok_or_else(|| WeatherError::InvalidDate(raw.clone())))
        .collect()
}

pub fn render_svg(
    name: &str,
    country: &str,
    daily: &DailyForecast,
    unit: TemperatureUnit,
) -> Result<String> {
    let dates = parse_dates(daily)?;
    let symbol = unit.symbol();

    let max_points: Vec<(i32, f64)> = daily
        .days()
        .enumerate()
        .filter_map(|(i, day)| day.max.map(|t| (i as i32, t)))
        .collect();
    let min_points: Vec<(i32, f64)> = daily
        .days()
        .enumerate()
        .filter_map(|(i, day)| day.min.map(|t| (i as i32, t)))
        .collect();

    let day_count = daily.days().count();
    let Some((y_low, y_high)) = temperature_bounds(&max_points, &min_points) else {
        bail!("No forecast temperatures to chart for {name}");
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("7-Day Forecast for {name}, {country}"), ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(90)
            .y_label_area_size(60)
            .build_cartesian_2d(0..day_count as i32, (y_low - Y_PADDING)..(y_high + Y_PADDING))?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc(format!("Temperature ({symbol})"))
            .x_labels(day_count + 1)
            .x_label_formatter(&|idx: &i32| {
                usize::try_from(*idx)
                    .ok()
                    .and_then(|i| dates.get(i))
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .x_label_style(("sans-serif", 13).into_font().transform(FontTransform::Rotate90))
            .draw()?;

        chart
            .draw_series(LineSeries::new(max_points, &RED))?
            .label(format!("Max Temp ({symbol})"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

        chart
            .draw_series(LineSeries::new(min_points, &BLUE))?
            .label(format!("Min Temp ({symbol})"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
    }

    Ok(svg)
}

fn temperature_bounds(max_points: &[(i32, f64)], min_points: &[(i32, f64)]) -> Option<(f64, f64)> {
    max_points
        .iter()
        .chain(min_points)
        .map(|(_, t)| *t)
        .fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
}

/// File-name friendly version of a place name.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }

    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() { "location".to_string() } else { trimmed.to_string() }
}
