//! repp-ui - Real Estate Price Predictor client
//!
//! Obtains a price estimate from the prediction service either from
//! manually entered property attributes or from a listing URL.
//!
//! Rendered results go to stdout; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repp_common::config::{ClientConfig, ConfigOverrides};
use repp_common::{AttributeField, Locale, Preferences, Theme};
use repp_ui::render::{render_prediction, render_state};
use repp_ui::session::Session;
use repp_ui::{ApiClient, InputForm, InputMode, SubmissionController, SubmitOutcome};

/// Command-line arguments for repp-ui
#[derive(Parser, Debug)]
#[command(name = "repp-ui")]
#[command(about = "Real estate price prediction client")]
#[command(version)]
struct Args {
    /// Prediction service base address (overrides REPP_API_URL and config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides REPP_TIMEOUT_SECS and config file)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Config file path (default: <config dir>/repp/config.toml)
    #[arg(long, global = true, env = "REPP_CONFIG")]
    config: Option<PathBuf>,

    /// Display language (ru, en)
    #[arg(long, global = true, default_value = "ru")]
    locale: Locale,

    /// Color scheme (light, dark)
    #[arg(long, global = true, default_value = "light")]
    theme: Theme,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict from manually entered attributes; omitted keys are sent empty
    Predict {
        /// Attribute value, repeatable (e.g. -a TotalArea=54.5 -a Floor=7)
        #[arg(short = 'a', long = "attr", value_name = "KEY=VALUE", value_parser = parse_attribute)]
        attributes: Vec<(AttributeField, String)>,
    },

    /// Predict from a listing URL
    Link {
        /// Listing URL
        url: String,
    },

    /// Check that the prediction service is running
    Health,

    /// Interactive session (type `help` once started)
    Interactive,
}

fn parse_attribute(raw: &str) -> Result<(AttributeField, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let field = key.trim().parse::<AttributeField>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("repp_ui={level},repp_common={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let overrides = ConfigOverrides {
        api_base_url: args.api_url.clone(),
        request_timeout_secs: args.timeout_secs,
        config_file: args.config.clone(),
    };
    let (config, diagnostics) = ClientConfig::resolve_with_diagnostics(&overrides)
        .context("Failed to resolve configuration")?;

    init_tracing(&config.log_level);

    // Build identification first, before any network delay
    info!("Starting {}", repp_ui::build_id());
    for problem in &diagnostics {
        warn!("{} (using defaults)", problem);
    }
    info!("Prediction service: {}", config.api_base_url);

    let api = ApiClient::new(&config).context("Failed to create prediction service client")?;

    let mut prefs = Preferences::new();
    if prefs.locale() != args.locale {
        prefs.toggle_locale();
    }
    if prefs.theme() != args.theme {
        prefs.toggle_theme();
    }

    match args.command {
        Command::Predict { attributes } => {
            let mut form = InputForm::new();
            for (field, value) in attributes {
                form.set_attribute(field, value);
            }
            Ok(submit_once(&form, &api, prefs).await)
        }
        Command::Link { url } => {
            let mut form = InputForm::new();
            form.set_mode(InputMode::Link);
            form.set_link(url);
            Ok(submit_once(&form, &api, prefs).await)
        }
        Command::Health => match api.health().await {
            Ok(status) => {
                println!("{}", status);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                error!("Health check failed: {}", e);
                eprintln!("{}", e);
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Interactive => {
            let mut session = Session::new(api, prefs);
            session
                .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await
                .context("Interactive session I/O failed")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Submit one form and print the outcome
async fn submit_once(form: &InputForm, api: &ApiClient, prefs: Preferences) -> ExitCode {
    let mut controller = SubmissionController::new();
    controller.on_success(move |prediction| println!("{}", render_prediction(prediction, &prefs)));

    match controller.submit(form, api).await {
        SubmitOutcome::Success(_) => ExitCode::SUCCESS,
        SubmitOutcome::Failed(_) => {
            eprintln!("{}", render_state(controller.state(), &prefs));
            ExitCode::FAILURE
        }
        SubmitOutcome::Rejected(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
        SubmitOutcome::Ignored => ExitCode::FAILURE,
    }
}
