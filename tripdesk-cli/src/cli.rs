use anyhow::{Context, anyhow, bail};
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use tracing::debug;
use tripdesk_core::{
    ApiKey, CredentialKind, Credentials, Error, Services, Settings, TripRequest,
    flow::{
        self,
        trip::{DEFAULT_TRIP_DAYS, MAX_TRIP_DAYS, MIN_TRIP_DAYS, MONTHS},
    },
};

use crate::render::{MarketView, TripView};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tripdesk", version, about = "AI trip planner and currency & stock agent")]
pub struct Cli {
    #[command(flatten)]
    pub keys: KeyArgs,

    /// Log service calls to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// API keys. Each flag falls back to its environment variable.
#[derive(Debug, Args)]
pub struct KeyArgs {
    /// Groq API key.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true, global = true)]
    pub groq_key: Option<String>,

    /// OpenWeather API key.
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true, global = true)]
    pub weather_key: Option<String>,

    /// ExchangeRate API key.
    #[arg(long, env = "EXCHANGE_API_KEY", hide_env_values = true, global = true)]
    pub exchange_key: Option<String>,

    /// Ask for any missing key interactively.
    #[arg(long, global = true)]
    pub prompt_keys: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plan a trip: current weather, midday forecast and an AI itinerary.
    Trip {
        /// Destination city.
        city: String,

        /// Trip duration in days.
        #[arg(long, default_value_t = DEFAULT_TRIP_DAYS,
              value_parser = clap::value_parser!(u8).range(i64::from(MIN_TRIP_DAYS)..=i64::from(MAX_TRIP_DAYS)))]
        days: u8,

        /// Month of travel, e.g. "March" or "mar"; defaults to the current month.
        #[arg(long, value_parser = parse_month)]
        month: Option<String>,
    },

    /// Currency, exchange rates and stock index for a country.
    Market {
        /// Country name, e.g. "Japan" or "United States".
        country: String,
    },

    /// Inspect or create the settings file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the settings file location.
    Path,

    /// Print effective settings and which keys are available.
    Show,

    /// Write a settings file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Accepts a full month name or any unambiguous prefix of at least three letters.
fn parse_month(raw: &str) -> Result<String, String> {
    let needle = raw.trim().to_lowercase();
    if needle.len() >= 3 {
        if let Some(month) = MONTHS.iter().find(|m| m.to_lowercase().starts_with(&needle)) {
            return Ok((*month).to_string());
        }
    }
    Err(format!("unknown month '{raw}', expected one of: {}", MONTHS.join(", ")))
}

fn current_month() -> String {
    MONTHS[Local::now().month0() as usize].to_string()
}

impl KeyArgs {
    fn flag_value(&self, kind: CredentialKind) -> Option<ApiKey> {
        let raw = match kind {
            CredentialKind::Llm => self.groq_key.as_deref(),
            CredentialKind::Weather => self.weather_key.as_deref(),
            CredentialKind::Exchange => self.exchange_key.as_deref(),
        };
        raw.and_then(ApiKey::new)
    }

    /// Flag/env values, then interactive prompts for the `needed` kinds if enabled.
    pub fn credentials(&self, needed: &[CredentialKind]) -> anyhow::Result<Credentials> {
        let mut creds = Credentials::new(
            self.flag_value(CredentialKind::Llm),
            self.flag_value(CredentialKind::Weather),
            self.flag_value(CredentialKind::Exchange),
        );

        if !self.prompt_keys {
            return Ok(creds);
        }

        for kind in needed.iter() {
            if creds.is_present(*kind) {
                continue;
            }
            let entered = Password::new(&format!("{} API Key", kind.label()))
                .without_confirmation()
                .with_display_mode(PasswordDisplayMode::Masked)
                .with_help_message(&format!("or set {}", kind.env_var()))
                .prompt()
                .with_context(|| format!("Failed to read {} API key", kind.label()))?;

            if let Some(key) = ApiKey::new(entered) {
                creds = creds.with(*kind, key);
            }
        }

        Ok(creds)
    }
}

fn flag_for(kind: CredentialKind) -> &'static str {
    match kind {
        CredentialKind::Llm => "--groq-key",
        CredentialKind::Weather => "--weather-key",
        CredentialKind::Exchange => "--exchange-key",
    }
}

/// Turns a flow failure into the message shown to the user.
fn user_error(err: Error) -> anyhow::Error {
    match err {
        Error::MissingCredential(kind) => anyhow!(
            "Please provide the {} API key ({} or {}, or pass --prompt-keys).",
            kind.label(),
            flag_for(kind),
            kind.env_var()
        ),
        Error::NotFound(_) => anyhow!("City not found or weather API error."),
        other => anyhow!(other),
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Trip { city, days, month } => {
                let creds = self.keys.credentials(&[CredentialKind::Llm, CredentialKind::Weather])?;
                let services = load_services()?;
                let req = TripRequest { city, days, month: month.unwrap_or_else(current_month) };

                let report = flow::plan_trip(&services, &creds, &req).await.map_err(user_error)?;
                print!("{}", TripView(&report));
            }
            Command::Market { country } => {
                let creds =
                    self.keys.credentials(&[CredentialKind::Llm, CredentialKind::Exchange])?;
                let services = load_services()?;

                let report =
                    flow::market_report(&services, &creds, &country).await.map_err(user_error)?;
                print!("{}", MarketView(&report));
            }
            Command::Config { action } => run_config(action, &self.keys)?,
        }

        Ok(())
    }
}

fn load_services() -> anyhow::Result<Services> {
    let settings = Settings::load()?;
    debug!(?settings, "loaded settings");
    Services::from_settings(&settings)
}

fn run_config(action: ConfigAction, keys: &KeyArgs) -> anyhow::Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", Settings::config_file_path()?.display());
        }
        ConfigAction::Show => {
            let settings = Settings::load()?;
            print!("{}", settings.to_toml()?);

            let creds = keys.credentials(&[])?;
            println!();
            for kind in CredentialKind::all() {
                let state = if creds.is_present(*kind) { "set" } else { "missing" };
                println!("# {} key ({}): {state}", kind.as_str(), kind.env_var());
            }
        }
        ConfigAction::Init { force } => {
            let path = Settings::config_file_path()?;
            if path.exists() && !force {
                bail!("Config file already exists: {} (use --force to overwrite)", path.display());
            }
            Settings::default().save_to(&path)?;
            println!("Wrote default settings to {}", path.display());
        }
    }

    Ok(())
}
