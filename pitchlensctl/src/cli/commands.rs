//! CLI command and subcommand definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PitchLens presentation analysis CLI
#[derive(Parser, Debug)]
#[command(name = "pitchlensctl")]
#[command(version, about = "Presentation analysis API client", long_about = None)]
pub struct Cli {
    /// Server URL including the API prefix (overrides config file)
    #[arg(short, long)]
    pub server: Option<String>,

    /// API key (overrides config file and PITCHLENS_API_KEY)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Output format (overrides config file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging (overrides config file)
    #[arg(short, long)]
    pub verbose: Option<bool>,

    /// Request timeout in seconds (overrides config file)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Don't load config file
    #[arg(long)]
    pub no_config: bool,

    /// Config file path (default: ~/.config/pitchlens/cli.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }
}

impl From<&OutputFormat> for crate::format::OutputFormat {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Table => crate::format::OutputFormat::Table,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check API reachability and version
    Health,

    /// Upload a presentation video for transcription and analysis
    Upload {
        /// Video file (mp4, webm, avi, mov or mkv)
        file: PathBuf,

        /// Company RFC the presentation is stored under
        #[arg(short, long)]
        rfc: String,

        /// Company name
        #[arg(long)]
        company: Option<String>,

        /// Presenter name
        #[arg(long)]
        presenter: Option<String>,
    },

    /// Show a stored presentation and its analysis
    Get {
        /// Company RFC
        rfc: String,
    },

    /// Show the processing status of a presentation
    Status {
        /// Company RFC
        rfc: String,
    },

    /// List stored presentations, newest first
    List {
        /// Maximum number of presentations to return
        #[arg(short, long, default_value_t = pitchlens_core::DEFAULT_LIST_LIMIT)]
        limit: u32,

        /// Number of presentations to skip
        #[arg(short, long, default_value_t = 0)]
        offset: u32,
    },

    /// Analyze a transcript without uploading a video
    Analyze {
        /// Transcript text
        #[arg(conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,

        /// Read the transcript from a file ("-" for stdin)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Show server-wide storage metrics
    Metrics,

    /// Show or manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Reset configuration to defaults
    Reset,
}
