use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use dashboard_core::{Config, Dashboard, config::MIN_TIMEOUT_SECS};
use inquire::{CustomType, Password, PasswordDisplayMode, Text, validator::Validation};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "City weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and, optionally, endpoint roots and timeout.
    Configure {
        /// Also prompt for endpoint URLs and the request timeout.
        #[arg(long)]
        advanced: bool,
    },

    /// Show the dashboard for a city.
    Show {
        /// City name, e.g. "London" or "Sao Paulo".
        city: String,

        /// Print the raw view model as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { advanced } => configure(advanced),
            Command::Show { city, json } => show(&city, json).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure(advanced: bool) -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut cfg = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        cfg.set_api_key(api_key);
    }

    if advanced {
        let endpoints = &mut cfg.endpoints;
        endpoints.base_url = prompt_url("Current weather URL:", &endpoints.base_url)?;
        endpoints.forecast_url = prompt_url("3-hour forecast URL:", &endpoints.forecast_url)?;
        endpoints.air_quality_url = prompt_url("Air pollution URL:", &endpoints.air_quality_url)?;
        endpoints.seven_day_url = prompt_url("Daily forecast URL:", &endpoints.seven_day_url)?;

        cfg.timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
            .with_default(cfg.timeout_secs)
            .with_error_message("Please enter a whole number of seconds")
            .with_validator(|secs: &u64| {
                Ok(if *secs < MIN_TIMEOUT_SECS {
                    Validation::Invalid(format!("Timeout must be at least {MIN_TIMEOUT_SECS} second").into())
                } else {
                    Validation::Valid
                })
            })
            .prompt()
            .context("Failed to read timeout")?;
    }

    cfg.require_api_key()?;
    cfg.save_to(&path)?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn prompt_url(message: &str, current: &str) -> anyhow::Result<String> {
    Text::new(message)
        .with_default(current)
        .prompt()
        .with_context(|| format!("Failed to read {message}"))
}

async fn show(city: &str, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    debug!(timeout_secs = cfg.timeout_secs, "Configuration loaded");

    let dashboard = Dashboard::from_config(&cfg)?;
    let vm = dashboard.lookup(city).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&vm).context("Failed to serialize view model")?);
    } else if vm.error.is_none() {
        print!("{}", render::dashboard(&vm, chrono::Local::now()));
    }

    match vm.error {
        Some(error) => Err(anyhow!(error)),
        None => Ok(()),
    }
}
