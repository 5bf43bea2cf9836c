//! Command execution handlers

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::client::ApiClient;
use crate::config::CliConfig;
use crate::format::{
    format_health, format_metrics, format_presentation, format_presentation_list, format_status,
    format_success, format_transcript_analysis, format_upload,
};

use super::commands::*;

/// Handle health command
pub async fn handle_health(client: &ApiClient, format: &OutputFormat) -> Result<()> {
    let health = client.check_health().await?;
    println!("{}", format_health(&health, &format.into())?);
    Ok(())
}

/// Handle upload command
pub async fn handle_upload(
    client: &ApiClient,
    file: &Path,
    rfc: &str,
    company: Option<&str>,
    presenter: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let response = client
        .upload_presentation_file(file, rfc, company, presenter)
        .await?;
    println!("{}", format_upload(&response, &format.into())?);
    Ok(())
}

/// Handle get command
pub async fn handle_get(client: &ApiClient, rfc: &str, format: &OutputFormat) -> Result<()> {
    let record = client.fetch_presentation(rfc).await?;
    println!("{}", format_presentation(&record, &format.into())?);
    Ok(())
}

/// Handle status command
pub async fn handle_status(client: &ApiClient, rfc: &str, format: &OutputFormat) -> Result<()> {
    let status = client.fetch_presentation_status(rfc).await?;
    println!("{}", format_status(&status, &format.into())?);
    Ok(())
}

/// Handle list command
pub async fn handle_list(
    client: &ApiClient,
    limit: u32,
    offset: u32,
    format: &OutputFormat,
) -> Result<()> {
    let list = client.list_presentations(limit, offset).await?;
    println!("{}", format_presentation_list(&list, &format.into())?);
    Ok(())
}

/// Handle analyze command
pub async fn handle_analyze(
    client: &ApiClient,
    text: Option<String>,
    file: Option<PathBuf>,
    format: &OutputFormat,
) -> Result<()> {
    let transcript = read_transcript(text, file.as_deref()).await?;
    let analysis = client.analyze_transcript(&transcript).await?;
    println!("{}", format_transcript_analysis(&analysis, &format.into())?);
    Ok(())
}

/// Resolve the transcript from inline text, a file, or stdin ("-")
pub async fn read_transcript(text: Option<String>, file: Option<&Path>) -> Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) if path == Path::new("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read transcript from stdin")?;
            Ok(buffer)
        }
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read transcript file: {}", path.display())),
        (None, None) => Err(anyhow::anyhow!("Provide transcript text or --file")),
    }
}

/// Handle metrics command
pub async fn handle_metrics(client: &ApiClient, format: &OutputFormat) -> Result<()> {
    let metrics = client.fetch_metrics().await?;
    println!("{}", format_metrics(&metrics, &format.into())?);
    Ok(())
}

/// Handle config command
///
/// `config_path` is the `--config` override; changes are written there when set.
/// `set` edits the file contents only, so values that came from flags or the
/// environment are never persisted.
pub async fn handle_config(
    command: ConfigCommands,
    current_config: &CliConfig,
    config_path: Option<&Path>,
    format: &OutputFormat,
) -> Result<()> {
    let save = |config: &CliConfig| match config_path {
        Some(path) => config.save_to(path),
        None => config.save(),
    };

    match command {
        ConfigCommands::Show => {
            let mut shown = current_config.clone();
            shown.api_key = current_config.masked_api_key();
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&shown)?);
                }
                OutputFormat::Table => {
                    println!("CLI Configuration:");
                    println!("{:<20} Value", "Setting");
                    println!("{}", "-".repeat(40));
                    println!("{:<20} {}", "Server URL", shown.server_url);
                    println!("{:<20} {}", "API Key", shown.api_key);
                    println!("{:<20} {}", "Output Format", shown.output_format);
                    println!("{:<20} {}", "Verbose", shown.verbose);
                    println!("{:<20} {}s", "Timeout", shown.timeout);
                }
            }
        }
        ConfigCommands::Set { key, value } => {
            let on_disk = match config_path {
                Some(path) => CliConfig::load_from(path)?,
                None => CliConfig::load()?,
            };
            let config = apply_config_value(on_disk, &key, &value)?;
            save(&config)?;
            let shown = if key == "api_key" {
                config.masked_api_key()
            } else {
                value
            };
            println!("{}", format_success(&format!("Set {} = {}", key, shown)));
        }
        ConfigCommands::Reset => {
            save(&CliConfig::default())?;
            println!("{}", format_success("Configuration reset to defaults"));
        }
    }

    Ok(())
}

/// Apply a single `config set` assignment, validating the value
pub fn apply_config_value(mut config: CliConfig, key: &str, value: &str) -> Result<CliConfig> {
    match key {
        "server_url" => {
            CliConfig::builder().with_server_url(value)?;
            config.server_url = value.to_string();
        }
        "api_key" => config.api_key = value.to_string(),
        "output_format" => {
            CliConfig::builder().with_output_format(value)?;
            config.output_format = value.to_string();
        }
        "verbose" => {
            config.verbose = value.to_lowercase() == "true" || value == "1";
        }
        "timeout" => {
            let timeout = value
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid timeout value. Must be a number"))?;
            CliConfig::builder().with_timeout(timeout)?;
            config.timeout = timeout;
        }
        _ => return Err(anyhow::anyhow!("Unknown config key: {}", key)),
    }

    Ok(config)
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
