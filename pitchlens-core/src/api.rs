//! API models for the presentation analysis REST API
//!
//! Request and response bodies exchanged with the server. The client only
//! builds requests and parses responses; it never mutates these values.

use crate::types::{Analysis, PresentationStatus, DEFAULT_LIST_LIMIT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `GET /health` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status, e.g. "healthy"
    pub status: String,
    /// Server API version
    pub version: String,
    /// Backing service name → connection state
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub services: BTreeMap<String, String>,
}

/// `POST /presentations/upload` response: analysis plus record metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    /// Identifier of the stored record (the RFC)
    pub presentation_id: String,
    pub message: String,
    /// Transcript extracted from the uploaded video
    pub transcript: String,
    pub analysis: Analysis,
}

/// `POST /analysis/transcript` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRequest {
    /// Always serialized, even when empty
    pub transcript: String,
}

/// `POST /analysis/transcript` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptAnalysis {
    pub transcript: String,
    pub analysis: Analysis,
}

/// Stored presentation snapshot (`GET /presentations/{rfc}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationRecord {
    /// Company tax identifier, primary key of the record
    pub rfc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presenter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_timestamp: Option<String>,
    pub status: PresentationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

/// `GET /presentations/{rfc}/status` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub rfc: String,
    pub status: PresentationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Pagination window for `GET /presentations`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

impl ListQuery {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

/// `GET /presentations` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationList {
    /// Count reported by the server
    pub total: u64,
    /// Records in server order
    pub presentations: Vec<PresentationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// `GET /metrics` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub total_presentations: u64,
    /// Storage used by all presentations, in megabytes
    pub total_storage_size_mb: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

/// Error body the server sends alongside non-2xx statuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
