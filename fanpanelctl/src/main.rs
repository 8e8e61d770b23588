//! Fan panel CLI
//!
//! Live fan status and settings editor for a fan controller.

use anyhow::Result;
use clap::Parser;
use fanpanelctl::cli::{
    generate_completion, handle_config, handle_curves, handle_settings, handle_status,
    handle_watch, Cli, Commands, OutputFormat,
};
use fanpanelctl::client::FanPanelClient;
use fanpanelctl::config::CliConfig;
use std::time::Duration;
use tracing::debug;

/// Initialize tracing subscriber for logging. Logs go to stderr so command
/// output stays clean.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build configuration using priority chain: defaults → file → env → CLI args
    let mut builder = CliConfig::builder();

    if !cli.no_config {
        builder = builder.with_config_file(cli.config.as_deref())?;
    }

    builder = builder.with_env_overrides();

    if let Some(ref server) = cli.server {
        builder = builder.with_server_url(server)?;
    }
    if let Some(format) = cli.format {
        builder = builder.with_output_format(format.as_str())?;
    }
    if cli.verbose {
        builder = builder.with_verbose(true);
    }
    if let Some(timeout) = cli.timeout {
        builder = builder.with_timeout(timeout)?;
    }
    if let Some(interval) = cli.interval {
        builder = builder.with_poll_interval(interval)?;
    }
    if let Some(ref path) = cli.fan_config {
        builder = builder.with_fan_config(path);
    }

    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.verbose);
    debug!("Effective configuration: {:?}", config);

    let output_format = match config.output_format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };
    let config_path = cli.config.clone().unwrap_or_else(CliConfig::default_path);
    let fan_config = config.fan_config_path();

    let connect = || {
        FanPanelClient::with_config(
            config.server_url.clone(),
            config.timeout,
            3,
            Duration::from_millis(500),
        )
    };

    let result = match cli.command {
        Commands::Status => match connect() {
            Ok(client) => handle_status(&client, &output_format).await,
            Err(e) => Err(e),
        },
        Commands::Watch => match connect() {
            Ok(client) => {
                let interval = Duration::from_secs(config.poll_interval);
                handle_watch(client, interval, &output_format).await
            }
            Err(e) => Err(e),
        },
        Commands::Curves {
            preset,
            svg,
            width,
            height,
        } => match connect() {
            Ok(client) => {
                handle_curves(
                    &client,
                    &fan_config,
                    preset,
                    svg,
                    (width, height),
                    &output_format,
                )
                .await
            }
            Err(e) => Err(e),
        },
        Commands::Settings { command } => handle_settings(command, &fan_config, &output_format),
        Commands::Config { command } => {
            handle_config(command, &config, &config_path, &output_format)
        }
        Commands::Completion { shell } => {
            generate_completion(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
