//! Test utilities for client testing
//!
//! Provides an in-process mock of the analysis API that records every request.

use anyhow::Result;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use pitchlens_core::api::{
    ErrorBody, HealthResponse, ListQuery, MetricsResponse, PresentationList, PresentationRecord,
    StatusResponse, TranscriptAnalysis, UploadResponse,
};
use pitchlens_core::{Analysis, PresentationStatus};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// API key the mock server accepts
pub const TEST_API_KEY: &str = "test-api-key";

/// Number of presentations the mock server starts with
pub const SEEDED_PRESENTATIONS: usize = 12;

/// One request as seen by the mock server
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub json_body: Option<serde_json::Value>,
    pub form_fields: BTreeMap<String, String>,
    /// Uploaded file name and size
    pub file: Option<(String, usize)>,
}

impl RecordedRequest {
    fn from_parts(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Self {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            api_key: header("x-api-key"),
            content_type: header(CONTENT_TYPE.as_str()),
            ..Default::default()
        }
    }
}

/// How a route should misbehave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOverride {
    /// Answer with this status and an `{"error": ...}` body
    Status(u16),
    /// Answer 200 with a body that is not JSON
    Malformed,
}

/// Mock server state
#[derive(Debug, Clone)]
pub struct MockServerState {
    /// Stored presentations by RFC
    pub presentations: Arc<Mutex<BTreeMap<String, PresentationRecord>>>,
    /// Requests received, in arrival order
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Route name → forced behaviour
    pub overrides: Arc<Mutex<HashMap<String, RouteOverride>>>,
}

fn sample_analysis(overall: f64) -> Analysis {
    let mut scores = BTreeMap::new();
    for category in [
        "historia",
        "mision_vision",
        "productos",
        "valores",
        "mercado",
        "logros",
    ] {
        scores.insert(category.to_string(), 7.0);
    }
    scores.insert("overall".to_string(), overall);

    Analysis {
        scores,
        feedback: vec![
            "Mensaje claro y bien estructurado".to_string(),
            "Profundizar en logros cuantificables".to_string(),
        ],
        summary: "Presentación sólida de la empresa".to_string(),
        estimated_duration: Some(180.0),
    }
}

impl Default for MockServerState {
    fn default() -> Self {
        let mut presentations = BTreeMap::new();

        for i in 1..=SEEDED_PRESENTATIONS {
            let rfc = format!("TST{:09}", i);
            presentations.insert(
                rfc.clone(),
                PresentationRecord {
                    rfc,
                    company_name: Some(format!("Empresa {} S.A.", i)),
                    presenter_name: Some(format!("Presentador {}", i)),
                    filename: Some("presentation.webm".to_string()),
                    upload_timestamp: Some(format!("2024-03-{:02} 10:00:00", i)),
                    status: PresentationStatus::Completed,
                    transcript: Some(format!("Transcripción de prueba {}", i)),
                    analysis: Some(sample_analysis(6.0 + (i % 4) as f64)),
                },
            );
        }

        Self {
            presentations: Arc::new(Mutex::new(presentations)),
            requests: Arc::new(Mutex::new(Vec::new())),
            overrides: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl MockServerState {
    /// Snapshot of the requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// RFCs currently stored, sorted
    pub fn known_rfcs(&self) -> Vec<String> {
        self.presentations.lock().unwrap().keys().cloned().collect()
    }

    /// Force a route to misbehave.
    ///
    /// Route names: `health`, `upload`, `presentation`, `status`, `list`,
    /// `transcript`, `metrics`.
    pub fn override_route(&self, route: &str, behaviour: RouteOverride) {
        self.overrides
            .lock()
            .unwrap()
            .insert(route.to_string(), behaviour);
    }

    fn record(&self, request: RecordedRequest) {
        self.requests.lock().unwrap().push(request);
    }

    /// Response for an overridden route or a rejected credential, if any
    fn intercept(
        &self,
        route: &str,
        request: &RecordedRequest,
        authenticated: bool,
    ) -> Option<Response> {
        if let Some(behaviour) = self.overrides.lock().unwrap().get(route).copied() {
            return Some(match behaviour {
                RouteOverride::Status(code) => {
                    let status =
                        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                    error_response(status, "forced failure")
                }
                RouteOverride::Malformed => {
                    (StatusCode::OK, "<html>not json</html>").into_response()
                }
            });
        }

        if authenticated && request.api_key.as_deref() != Some(TEST_API_KEY) {
            return Some(error_response(StatusCode::UNAUTHORIZED, "API key inválida"));
        }

        None
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Mock server implementation
#[derive(Debug)]
pub struct MockServer {
    state: MockServerState,
    port: u16,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServer {
    /// Create a new mock server
    pub fn new() -> Self {
        Self {
            state: MockServerState::default(),
            port: 0, // Will be assigned when server starts
        }
    }

    /// Start the mock server and return its base URL
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = self.create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = self.url();

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        // Give the server a moment to start and verify it's running
        for _ in 0..20 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        Ok((self, server_url))
    }

    /// Base URL of the running server
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Get a reference to the server state
    pub fn state(&self) -> &MockServerState {
        &self.state
    }

    /// Create the mock server router
    fn create_router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/presentations/upload", post(upload_handler))
            .route("/presentations", get(list_handler))
            .route("/presentations/:rfc", get(presentation_handler))
            .route("/presentations/:rfc/status", get(status_handler))
            .route("/analysis/transcript", post(transcript_handler))
            .route("/metrics", get(metrics_handler))
            .with_state(self.state.clone())
    }
}

// Handler functions

async fn health_handler(
    State(state): State<MockServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let request = RecordedRequest::from_parts(&method, &uri, &headers);
    let intercepted = state.intercept("health", &request, false);
    state.record(request);
    if let Some(response) = intercepted {
        return response;
    }

    let mut services = BTreeMap::new();
    services.insert("storage".to_string(), "connected".to_string());
    services.insert("speech".to_string(), "connected".to_string());

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: "1.0.0".to_string(),
        services,
    })
    .into_response()
}

async fn upload_handler(
    State(state): State<MockServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut request = RecordedRequest::from_parts(&method, &uri, &headers);

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let size = field.bytes().await.map(|b| b.len()).unwrap_or(0);
            request.file = Some((file_name, size));
        } else {
            let value = field.text().await.unwrap_or_default();
            request.form_fields.insert(name, value);
        }
    }

    let intercepted = state.intercept("upload", &request, true);
    state.record(request.clone());
    if let Some(response) = intercepted {
        return response;
    }

    let Some((file_name, _)) = request.file else {
        return error_response(StatusCode::BAD_REQUEST, "No se envió ningún archivo");
    };
    let rfc = request.form_fields.get("rfc").cloned().unwrap_or_default();
    if rfc.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "El RFC es obligatorio");
    }

    let field = |name: &str| {
        request
            .form_fields
            .get(name)
            .filter(|v| !v.is_empty())
            .cloned()
    };
    let transcript = format!("Transcripción de {}", file_name);
    let analysis = sample_analysis(8.0);

    state.presentations.lock().unwrap().insert(
        rfc.clone(),
        PresentationRecord {
            rfc: rfc.clone(),
            company_name: field("company_name"),
            presenter_name: field("presenter_name"),
            filename: Some(file_name),
            upload_timestamp: Some("2024-04-01 12:00:00".to_string()),
            status: PresentationStatus::Completed,
            transcript: Some(transcript.clone()),
            analysis: Some(analysis.clone()),
        },
    );

    Json(UploadResponse {
        success: true,
        presentation_id: rfc,
        message: "Presentación analizada exitosamente".to_string(),
        transcript,
        analysis,
    })
    .into_response()
}

async fn presentation_handler(
    State(state): State<MockServerState>,
    Path(rfc): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let request = RecordedRequest::from_parts(&method, &uri, &headers);
    let intercepted = state.intercept("presentation", &request, true);
    state.record(request);
    if let Some(response) = intercepted {
        return response;
    }

    match state.presentations.lock().unwrap().get(&rfc) {
        Some(record) => Json(record.clone()).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Presentación no encontrada"),
    }
}

async fn status_handler(
    State(state): State<MockServerState>,
    Path(rfc): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let request = RecordedRequest::from_parts(&method, &uri, &headers);
    let intercepted = state.intercept("status", &request, true);
    state.record(request);
    if let Some(response) = intercepted {
        return response;
    }

    let stored = state.presentations.lock().unwrap().get(&rfc).map(|r| r.status);
    let response = match stored {
        Some(status) => StatusResponse {
            rfc,
            status,
            message: Some("Presentación procesada exitosamente".to_string()),
        },
        None => StatusResponse {
            rfc,
            status: PresentationStatus::NotFound,
            message: Some("Presentación no encontrada".to_string()),
        },
    };
    Json(response).into_response()
}

async fn list_handler(
    State(state): State<MockServerState>,
    Query(query): Query<ListQuery>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let request = RecordedRequest::from_parts(&method, &uri, &headers);
    let intercepted = state.intercept("list", &request, true);
    state.record(request);
    if let Some(response) = intercepted {
        return response;
    }

    let mut records: Vec<PresentationRecord> =
        state.presentations.lock().unwrap().values().cloned().collect();
    records.sort_by(|a, b| b.upload_timestamp.cmp(&a.upload_timestamp));
    let total = records.len() as u64;

    let presentations = records
        .into_iter()
        .skip(query.offset as usize)
        .take(query.limit as usize)
        .collect();

    Json(PresentationList {
        total,
        presentations,
        limit: Some(query.limit),
        offset: Some(query.offset),
    })
    .into_response()
}

async fn transcript_handler(
    State(state): State<MockServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let mut request = RecordedRequest::from_parts(&method, &uri, &headers);
    request.json_body = Some(body.clone());
    let intercepted = state.intercept("transcript", &request, true);
    state.record(request);
    if let Some(response) = intercepted {
        return response;
    }

    let Some(transcript) = body.get("transcript").and_then(|t| t.as_str()) else {
        return error_response(StatusCode::BAD_REQUEST, "Transcript requerido");
    };

    Json(TranscriptAnalysis {
        transcript: transcript.to_string(),
        analysis: sample_analysis(7.5),
    })
    .into_response()
}

async fn metrics_handler(
    State(state): State<MockServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let request = RecordedRequest::from_parts(&method, &uri, &headers);
    let intercepted = state.intercept("metrics", &request, true);
    state.record(request);
    if let Some(response) = intercepted {
        return response;
    }

    let total_presentations = state.presentations.lock().unwrap().len() as u64;

    Json(MetricsResponse {
        total_presentations,
        total_storage_size_mb: total_presentations as f64 * 42.5,
        api_version: Some("1.0.0".to_string()),
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_startup() {
        let server = MockServer::new();
        let (server, url) = server.start().await.unwrap();

        assert!(server.port > 0);
        assert!(url.contains(&server.port.to_string()));

        // Test basic connectivity
        let client = reqwest::Client::new();
        let response = client.get(format!("{}/health", url)).send().await.unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn test_rejects_missing_api_key() {
        let (_, url) = MockServer::new().start().await.unwrap();

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/metrics", url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 401);
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let (_, url) = MockServer::new().start().await.unwrap();

        let client = reqwest::Client::new();
        let list: PresentationList = client
            .get(format!("{}/presentations?limit=3&offset=0", url))
            .header("X-API-Key", TEST_API_KEY)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(list.total, SEEDED_PRESENTATIONS as u64);
        assert_eq!(list.presentations.len(), 3);
        assert_eq!(list.presentations[0].rfc, "TST000000012");
    }

    #[tokio::test]
    async fn test_override_route() {
        let (server, url) = MockServer::new().start().await.unwrap();
        server
            .state()
            .override_route("health", RouteOverride::Status(503));

        let client = reqwest::Client::new();
        let response = client.get(format!("{}/health", url)).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 503);
        assert_eq!(server.state().requests().len(), 1);
    }
}
