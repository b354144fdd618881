//! Control surface for the capture pipeline.
//!
//! Triggers one extraction/delivery run at a time and renders the
//! controller's status transitions. The endpoint base URL is the one
//! persisted setting; everything else is per-invocation flags.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use url::Url;

use jobsnap::{
    Controller, ExtractionInvoker, HttpPageFetcher, HttpTransport, RunConfig, RunStatus, Settings,
};

#[derive(Parser)]
#[command(
    name = "jobsnap",
    version,
    about = "Capture a job posting and deliver it to the processing server"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Capture the job posting at URL and deliver it
    Run {
        /// Address of the job-posting page
        url: Url,

        /// Override the configured endpoint base URL for this run
        #[arg(long)]
        endpoint: Option<String>,

        /// Per-stage timeout in seconds (document fetch, delivery)
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },

    /// Show or change the delivery endpoint
    Endpoint {
        #[command(subcommand)]
        action: EndpointAction,
    },
}

#[derive(Subcommand)]
enum EndpointAction {
    /// Print the configured endpoint base URL
    Get,
    /// Set and persist the endpoint base URL
    Set { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            url,
            endpoint,
            timeout,
        } => run(url, endpoint, Duration::from_secs(timeout)).await,
        Command::Endpoint { action } => endpoint_command(action),
    }
}

fn settings_path() -> Result<PathBuf> {
    Settings::default_path().context("could not determine the user config directory")
}

async fn run(url: Url, endpoint_override: Option<String>, timeout: Duration) -> Result<()> {
    let settings = Settings::load(&settings_path()?)?;
    let mut config = RunConfig::from_settings(&settings).with_request_timeout(timeout);
    if let Some(endpoint) = endpoint_override {
        config = config.with_endpoint(endpoint);
    }

    let endpoint: Url = config
        .endpoint
        .parse()
        .with_context(|| format!("invalid endpoint URL: {}", config.endpoint))?;

    let fetcher =
        HttpPageFetcher::new(config.request_timeout).context("failed to build HTTP client")?;
    let transport = HttpTransport::new(&endpoint, config.request_timeout)
        .context("failed to build transport")?;

    let mut controller = Controller::new(ExtractionInvoker::new(fetcher), transport)
        .with_success_display(config.success_display);

    // Render status transitions while the run is in flight.
    let mut status = controller.status();
    let renderer = tokio::spawn(async move {
        loop {
            render_status(&status.borrow_and_update().clone());
            if status.changed().await.is_err() {
                break;
            }
        }
    });

    let outcome = controller.run(&url).await;
    renderer.abort();

    match outcome {
        Ok(confirmation) => {
            println!(
                "{} {}",
                "✅".green(),
                "Job posting delivered.".green().bold()
            );
            tracing::debug!(confirmation = %confirmation.as_json(), "server confirmation");
            Ok(())
        }
        Err(e) => {
            tracing::debug!(error = %e, "run failed");
            eprintln!("{} {}", "❌".red(), e.user_message().red());
            std::process::exit(1);
        }
    }
}

fn render_status(status: &RunStatus) {
    match status {
        RunStatus::Idle => {}
        RunStatus::Extracting | RunStatus::Sending => {
            println!("{}", status.to_string().cyan());
        }
        RunStatus::Success => println!("{}", status.to_string().green()),
        RunStatus::Error(_) => println!("{}", status.to_string().red()),
    }
}

fn endpoint_command(action: EndpointAction) -> Result<()> {
    let path = settings_path()?;
    let mut settings = Settings::load(&path)?;

    match action {
        EndpointAction::Get => {
            println!("{}", settings.endpoint);
        }
        EndpointAction::Set { url } => {
            Url::parse(&url).with_context(|| format!("invalid endpoint URL: {url}"))?;
            settings.endpoint = url;
            settings.save(&path)?;
            println!(
                "{} endpoint set to {}",
                "✔".green(),
                settings.endpoint.bold()
            );
        }
    }

    Ok(())
}
