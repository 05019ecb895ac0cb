use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use cityweather_core::{Config, FetchController, FetchOutcome, OpenWeatherClient, Units};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Select, Text};

use crate::{
    transcript::{GivenTranscript, PromptTranscriber},
    view::TerminalView,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather for a city")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default units.
    Configure,

    /// Print the config file location.
    ConfigPath,

    /// Show current weather for a city. Prompts repeatedly when no city is given.
    Show {
        /// City name, optionally with a country code ("Paris,FR").
        city: Option<String>,

        /// Unit system: imperial, metric or standard.
        #[arg(long)]
        units: Option<Units>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Ask by voice, e.g. "what is the weather in Tokyo".
    Listen {
        /// Use this transcript instead of prompting for one.
        #[arg(long)]
        transcript: Option<String>,

        /// Unit system: imperial, metric or standard.
        #[arg(long)]
        units: Option<Units>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure(self.config)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::ConfigPath => {
                let path = match self.config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };
                println!("{}", path.display());
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, units, json } => {
                let controller = build_controller(self.config, units)?;
                let mut view = TerminalView::new(controller.units(), json);

                match city {
                    Some(city) => {
                        controller.on_fetch_requested(&city, &mut view).await;
                    }
                    None => prompt_loop(&controller, &mut view).await?,
                }

                Ok(exit_code(view.failed))
            }
            Command::Listen { transcript, units } => {
                let controller = build_controller(self.config, units)?;
                let mut view = TerminalView::new(controller.units(), false);

                let outcome = match transcript {
                    Some(text) => {
                        controller.on_voice_requested(&GivenTranscript(text), &mut view).await
                    }
                    None => controller.on_voice_requested(&PromptTranscriber, &mut view).await,
                };

                Ok(exit_code(outcome == FetchOutcome::Failed))
            }
        }
    }
}

fn exit_code(failed: bool) -> ExitCode {
    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut cfg = match path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    cfg.apply_env();
    Ok(cfg)
}

fn build_controller(
    path: Option<PathBuf>,
    units: Option<Units>,
) -> anyhow::Result<FetchController<OpenWeatherClient>> {
    let mut cfg = load_config(path)?;
    if let Some(units) = units {
        cfg.units = units;
    }
    tracing::debug!(units = %cfg.units, endpoint = %cfg.endpoint, "configuration loaded");

    let client = OpenWeatherClient::new(&cfg)?;
    Ok(FetchController::new(client))
}

async fn prompt_loop(
    controller: &FetchController<OpenWeatherClient>,
    view: &mut TerminalView,
) -> anyhow::Result<()> {
    loop {
        let answer = Text::new("Enter city name:")
            .with_help_message("Esc or an empty line to quit")
            .prompt();

        let city = match answer {
            Ok(city) if city.trim().is_empty() => return Ok(()),
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to read city name"),
        };

        controller.on_fetch_requested(&city, view).await;
    }
}

fn configure(path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut cfg = match &path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }
    cfg.set_api_key(api_key);

    let start = Units::all().iter().position(|u| *u == cfg.units).unwrap_or(0);
    cfg.units = Select::new("Default units:", Units::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;

    let saved_to = match path {
        Some(path) => {
            cfg.save_to(&path)?;
            path
        }
        None => cfg.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_units() {
        let cli = Cli::try_parse_from(["cityweather", "show", "Paris", "--units", "metric"])
            .expect("should parse");

        match cli.command {
            Command::Show { city, units, json } => {
                assert_eq!(city.as_deref(), Some("Paris"));
                assert_eq!(units, Some(Units::Metric));
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_units() {
        let err = Cli::try_parse_from(["cityweather", "show", "Paris", "--units", "kelvin"])
            .unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn parses_listen_with_global_config() {
        let cli = Cli::try_parse_from([
            "cityweather",
            "listen",
            "--transcript",
            "weather in Oslo",
            "--config",
            "/tmp/cw.toml",
        ])
        .expect("should parse");

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cw.toml")));
        assert!(matches!(
            cli.command,
            Command::Listen { transcript: Some(ref t), .. } if t == "weather in Oslo"
        ));
    }

    #[test]
    fn missing_api_key_fails_at_startup() {
        // Only meaningful when the environment does not supply a key.
        if std::env::var("WEATHER_API_KEY").is_ok() || std::env::var("weather_api_key").is_ok() {
            return;
        }

        let dir = tempfile::tempdir().expect("tempdir");
        let err = build_controller(Some(dir.path().join("config.toml")), None).unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
    }
}
