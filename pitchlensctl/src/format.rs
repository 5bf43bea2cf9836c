//! Output formatting utilities for the CLI
//!
//! Provides table and JSON formatting with colors.

use anyhow::Result;
use colored::*;
use pitchlens_core::api::{
    HealthResponse, MetricsResponse, PresentationList, PresentationRecord, StatusResponse,
    TranscriptAnalysis, UploadResponse,
};
use pitchlens_core::{Analysis, PresentationStatus};

use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Table,
    Json,
}

fn color_score(score: f64) -> ColoredString {
    let text = format!("{:.1}", score);
    if score >= 8.0 {
        text.green()
    } else if score >= 5.0 {
        text.yellow()
    } else {
        text.red()
    }
}

fn color_status(status: PresentationStatus) -> ColoredString {
    match status {
        PresentationStatus::Completed => status.as_str().green(),
        PresentationStatus::Processing => status.as_str().yellow(),
        PresentationStatus::Failed | PresentationStatus::NotFound => status.as_str().red(),
        PresentationStatus::Unknown => status.as_str().dimmed(),
    }
}

fn or_na(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or("N/A")
        .to_string()
}

/// Render an analysis block: scores table, feedback list, summary
fn render_analysis(analysis: &Analysis) -> String {
    #[derive(Tabled)]
    struct ScoreRow {
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Score")]
        score: String,
    }

    // `overall` goes last, after the per-category scores
    let mut rows: Vec<ScoreRow> = analysis
        .scores
        .iter()
        .filter(|(name, _)| name.as_str() != pitchlens_core::OVERALL_SCORE)
        .map(|(name, score)| ScoreRow {
            category: name.clone(),
            score: color_score(*score).to_string(),
        })
        .collect();
    if let Some(overall) = analysis.overall() {
        rows.push(ScoreRow {
            category: pitchlens_core::OVERALL_SCORE.bold().to_string(),
            score: color_score(overall).bold().to_string(),
        });
    }

    let mut output = String::new();
    output.push_str(&Table::new(rows).with(Style::rounded()).to_string());

    let flagged = analysis.out_of_range_scores();
    if !flagged.is_empty() {
        output.push('\n');
        output.push_str(
            &format!("Scores outside 0-10: {}", flagged.join(", "))
                .red()
                .to_string(),
        );
    }

    output.push('\n');
    output.push_str(&"Feedback:".bold().to_string());
    for item in &analysis.feedback {
        output.push_str(&format!("\n  - {}", item));
    }

    output.push('\n');
    output.push_str(&format!("{} {}", "Summary:".bold(), analysis.summary));

    if let Some(duration) = analysis.estimated_duration {
        output.push('\n');
        output.push_str(&format!("Estimated duration: {}s", duration.to_string().cyan()));
    }

    output
}

/// Format health response
pub fn format_health(health: &HealthResponse, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(health)?),
        OutputFormat::Table => {
            let mut output = String::new();
            output.push_str(&"API Health".bold().to_string());
            output.push('\n');
            let status = if health.status == "healthy" {
                health.status.green()
            } else {
                health.status.red()
            };
            output.push_str(&format!("Status: {}", status));
            output.push('\n');
            output.push_str(&format!("Version: {}", health.version.cyan()));

            for (service, state) in &health.services {
                output.push('\n');
                output.push_str(&format!("  {:<16} {}", service, state));
            }

            Ok(output)
        }
    }
}

/// Format upload response
pub fn format_upload(response: &UploadResponse, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Table => {
            let mut output = String::new();
            output.push_str(&response.message.bold().to_string());
            output.push('\n');
            output.push_str(&format!("Presentation: {}", response.presentation_id.cyan()));
            output.push('\n');
            output.push_str(&format!("Transcript: {}", response.transcript));
            output.push('\n');
            output.push_str(&render_analysis(&response.analysis));
            Ok(output)
        }
    }
}

/// Format transcript analysis response
pub fn format_transcript_analysis(
    response: &TranscriptAnalysis,
    format: &OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Table => Ok(format!(
            "{}\n{}",
            "Transcript Analysis:".bold(),
            render_analysis(&response.analysis)
        )),
    }
}

/// Format a single presentation record
pub fn format_presentation(record: &PresentationRecord, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Table => {
            let mut output = String::new();
            output.push_str(&format!("{} {}", "Presentation".bold(), record.rfc.cyan()));
            output.push('\n');
            output.push_str(&format!("Company: {}", or_na(&record.company_name)));
            output.push('\n');
            output.push_str(&format!("Presenter: {}", or_na(&record.presenter_name)));
            output.push('\n');
            output.push_str(&format!("File: {}", or_na(&record.filename)));
            output.push('\n');
            output.push_str(&format!("Uploaded: {}", or_na(&record.upload_timestamp)));
            output.push('\n');
            output.push_str(&format!("Status: {}", color_status(record.status)));

            if let Some(analysis) = &record.analysis {
                output.push('\n');
                output.push_str(&render_analysis(analysis));
            }

            Ok(output)
        }
    }
}

/// Format status response
pub fn format_status(status: &StatusResponse, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(status)?),
        OutputFormat::Table => {
            let mut output = format!("{}: {}", status.rfc.cyan(), color_status(status.status));
            if let Some(message) = &status.message {
                output.push_str(&format!(" ({})", message));
            }
            Ok(output)
        }
    }
}

/// Format presentation list response
pub fn format_presentation_list(list: &PresentationList, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(list)?),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct PresentationRow {
                #[tabled(rename = "RFC")]
                rfc: String,
                #[tabled(rename = "Company")]
                company: String,
                #[tabled(rename = "Presenter")]
                presenter: String,
                #[tabled(rename = "Uploaded")]
                uploaded: String,
                #[tabled(rename = "Status")]
                status: String,
                #[tabled(rename = "Overall")]
                overall: String,
            }

            let rows: Vec<PresentationRow> = list
                .presentations
                .iter()
                .map(|record| PresentationRow {
                    rfc: record.rfc.cyan().to_string(),
                    company: or_na(&record.company_name),
                    presenter: or_na(&record.presenter_name),
                    uploaded: or_na(&record.upload_timestamp),
                    status: color_status(record.status).to_string(),
                    overall: record
                        .analysis
                        .as_ref()
                        .and_then(Analysis::overall)
                        .map(|score| color_score(score).to_string())
                        .unwrap_or_else(|| "-".dimmed().to_string()),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!(
                "{} ({} total)\n{}",
                "Presentations:".bold(),
                list.total,
                table
            ))
        }
    }
}

/// Format metrics response
pub fn format_metrics(metrics: &MetricsResponse, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(metrics)?),
        OutputFormat::Table => {
            let mut output = String::new();
            output.push_str(&"API Metrics".bold().to_string());
            output.push('\n');
            output.push_str(&format!(
                "Total presentations: {}",
                metrics.total_presentations.to_string().yellow()
            ));
            output.push('\n');
            output.push_str(&format!(
                "Total storage: {} MB",
                format!("{:.2}", metrics.total_storage_size_mb).yellow()
            ));
            if let Some(version) = &metrics.api_version {
                output.push('\n');
                output.push_str(&format!("API version: {}", version.cyan()));
            }
            Ok(output)
        }
    }
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}
