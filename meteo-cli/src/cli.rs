use std::{io, path::PathBuf, process::ExitCode};

use clap::Parser;
use meteo_core::{Config, TemperatureUnit};
use tracing::{info, warn};

use crate::batch::{self, BatchOptions};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "meteo",
    version,
    about = "Fetch weather data for one or more cities via Open-Meteo"
)]
pub struct Cli {
    /// One or more city names (e.g. Cairo London "New York").
    #[arg(required = true, num_args = 1..)]
    pub cities: Vec<String>,

    /// Temperature unit: celsius or fahrenheit.
    #[arg(long, default_value_t = TemperatureUnit::Celsius)]
    pub units: TemperatureUnit,

    /// Language for the geocoding API.
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Show the 7-day forecast.
    #[arg(long)]
    pub daily: bool,

    /// Chart the 7-day forecast (used together with --daily).
    #[arg(long)]
    pub plot: bool,

    /// Directory the forecast charts are written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub plot_dir: PathBuf,

    /// TOML file overriding API endpoints and request timeout.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity on stderr (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            unit: self.units,
            language: self.lang.clone(),
            show_forecast: self.daily,
            show_chart: self.daily && self.plot,
            chart_dir: self.plot_dir.clone(),
        }
    }

    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        info!(?config, "using configuration");

        if self.plot && !self.daily {
            warn!("--plot has no effect without --daily");
        }

        let source = meteo_core::source_from_config(&config)?;
        let options = self.batch_options();

        let mut stdout = io::stdout().lock();
        let summary = batch::run(&*source, &self.cities, &options, &mut stdout).await?;

        if summary.all_failed() {
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }
}
