//! PitchLens CLI
//!
//! Command-line interface for the presentation analysis API.

use anyhow::Result;
use clap::Parser;
use pitchlensctl::cli::{
    generate_completion, handle_analyze, handle_config, handle_get, handle_health, handle_list,
    handle_metrics, handle_status, handle_upload, Cli, Commands, OutputFormat,
};
use pitchlensctl::client::ApiClient;
use pitchlensctl::config::CliConfig;
use std::time::Duration;
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority chain: defaults < file < env < CLI args. Each builder stage
    // only fills unset values, so the highest priority stage runs first.
    let mut builder = CliConfig::builder();

    if let Some(ref server) = cli.server {
        builder = builder.with_server_url(server)?;
    }
    if let Some(ref api_key) = cli.api_key {
        builder = builder.with_api_key(api_key);
    }
    if let Some(ref format) = cli.format {
        builder = builder.with_output_format(format.as_str())?;
    }
    if let Some(verbose) = cli.verbose {
        builder = builder.with_verbose(verbose);
    }
    if let Some(timeout) = cli.timeout {
        builder = builder.with_timeout(timeout)?;
    }

    builder = builder.with_env_overrides();

    if let Some(ref path) = cli.config {
        builder = builder.with_config_path(path);
    }
    builder = builder.with_config_file(!cli.no_config)?;

    // Build final configuration with validation
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            if cli.verbose.unwrap_or(false) {
                eprintln!("Error details: {:?}", e);
            }
            std::process::exit(1);
        }
    };

    let output_format = match config.output_format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };
    let verbose = config.verbose;

    init_tracing(verbose);

    debug!(
        server = %config.server_url,
        format = ?output_format,
        timeout = config.timeout,
        "Configuration resolved"
    );

    let needs_client = !matches!(
        cli.command,
        Commands::Config { .. } | Commands::Completion { .. }
    );

    let client = if needs_client {
        if config.api_key.is_empty() && !matches!(cli.command, Commands::Health) {
            warn!(
                "No API key configured; set {} or run `pitchlensctl config set api_key <key>`",
                pitchlensctl::config::ENV_API_KEY
            );
        }

        match ApiClient::builder(config.server_url.clone(), config.api_key.clone())
            .timeout(Duration::from_secs(config.timeout))
            .build()
        {
            Ok(client) => Some(client),
            Err(e) => {
                eprintln!("Error: Cannot create client for {}", config.server_url);
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    // Execute commands
    let result = match (cli.command, client.as_ref()) {
        (Commands::Config { command }, _) => {
            handle_config(command, &config, cli.config.as_deref(), &output_format).await
        }
        (Commands::Completion { shell }, _) => {
            generate_completion(shell);
            Ok(())
        }
        (command, Some(client)) => run_command(command, client, &output_format).await,
        (_, None) => Err(anyhow::anyhow!("No client available for this command")),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if verbose {
            eprintln!("Error details: {:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Dispatch commands that talk to the API
async fn run_command(command: Commands, client: &ApiClient, format: &OutputFormat) -> Result<()> {
    match command {
        Commands::Health => handle_health(client, format).await,
        Commands::Upload {
            file,
            rfc,
            company,
            presenter,
        } => {
            handle_upload(
                client,
                &file,
                &rfc,
                company.as_deref(),
                presenter.as_deref(),
                format,
            )
            .await
        }
        Commands::Get { rfc } => handle_get(client, &rfc, format).await,
        Commands::Status { rfc } => handle_status(client, &rfc, format).await,
        Commands::List { limit, offset } => handle_list(client, limit, offset, format).await,
        Commands::Analyze { text, file } => handle_analyze(client, text, file, format).await,
        Commands::Metrics => handle_metrics(client, format).await,
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

/// Initialize tracing on stderr so command output on stdout stays clean
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
