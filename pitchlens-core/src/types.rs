//! Core types and data structures for PitchLens

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Header carrying the API key on authenticated requests
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Default page size for presentation listings
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Video container formats the analysis server accepts for upload
pub const SUPPORTED_VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "webm", "avi", "mov", "mkv"];

/// Inclusive bounds of every analysis score
pub const SCORE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

/// Score category holding the aggregate rating
pub const OVERALL_SCORE: &str = "overall";

/// Processing state of a presentation, as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationStatus {
    /// Upload analysed and stored
    Completed,
    /// Upload received, analysis still running
    Processing,
    /// Analysis failed server-side
    Failed,
    /// No record exists for the RFC
    NotFound,
    /// Any state string this client does not know about
    #[serde(other)]
    Unknown,
}

impl PresentationStatus {
    /// Whether no further transitions are expected for this record.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PresentationStatus::Completed | PresentationStatus::Failed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationStatus::Completed => "completed",
            PresentationStatus::Processing => "processing",
            PresentationStatus::Failed => "failed",
            PresentationStatus::NotFound => "not_found",
            PresentationStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PresentationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysis block produced by the server for a transcript.
///
/// The server writes Spanish keys (`resumen`, `duracion_estimada`); both
/// those and the English spellings are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Named category → score in [0, 10]
    pub scores: BTreeMap<String, f64>,
    /// Strengths and areas for improvement, in server order
    pub feedback: Vec<String>,
    /// Executive summary
    #[serde(rename = "resumen", alias = "summary")]
    pub summary: String,
    /// Estimated presentation length, when the server provides one
    #[serde(
        rename = "duracion_estimada",
        alias = "estimated_duration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub estimated_duration: Option<f64>,
}

impl Analysis {
    /// The aggregate `overall` score, if present.
    pub fn overall(&self) -> Option<f64> {
        self.scores.get(OVERALL_SCORE).copied()
    }

    /// Categories whose score falls outside [0, 10].
    ///
    /// The client never rewrites scores; this only lets callers flag them.
    pub fn out_of_range_scores(&self) -> Vec<&str> {
        self.scores
            .iter()
            .filter(|(_, score)| !SCORE_RANGE.contains(*score))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Validate an RFC (company tax identifier) before it is put on the wire.
pub fn validate_rfc(rfc: &str) -> Result<(), String> {
    if rfc.trim().is_empty() {
        return Err("RFC cannot be empty".to_string());
    }
    Ok(())
}

/// Whether `extension` (without the dot, any case) is an accepted video format.
pub fn is_supported_video_extension(extension: &str) -> bool {
    let lower = extension.to_ascii_lowercase();
    SUPPORTED_VIDEO_EXTENSIONS.contains(&lower.as_str())
}

/// Guess the MIME type for an accepted video extension.
pub fn video_mime_type(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        _ => "application/octet-stream",
    }
}
