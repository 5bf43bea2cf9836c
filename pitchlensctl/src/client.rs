//! HTTP client for the presentation analysis API.

use pitchlens_core::api::{
    ErrorBody, HealthResponse, ListQuery, MetricsResponse, PresentationList, PresentationRecord,
    StatusResponse, TranscriptAnalysis, TranscriptRequest, UploadResponse,
};
use pitchlens_core::{
    decode_body, is_supported_video_extension, validate_rfc, video_mime_type, ClientError, Result,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Normalize a server URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Map a reqwest failure that happened before a response arrived.
fn transport_error(endpoint: &str, err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        ClientError::Transport {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }
}

/// Connection settings of an [`ApiClient`]. Immutable once built.
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    /// Base endpoint, without trailing separator
    pub base_url: String,
    /// API key sent in the `X-API-Key` header
    pub api_key: String,
    /// Per-request timeout; `None` leaves it to the transport
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A video to submit for analysis.
///
/// Company and presenter names are optional; they go on the wire as empty
/// form fields when absent.
#[derive(Debug, Clone)]
pub struct PresentationUpload {
    pub file_name: String,
    pub contents: Vec<u8>,
    pub rfc: String,
    pub company_name: Option<String>,
    pub presenter_name: Option<String>,
}

impl PresentationUpload {
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>, rfc: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            contents,
            rfc: rfc.into(),
            company_name: None,
            presenter_name: None,
        }
    }

    pub fn with_company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    pub fn with_presenter_name(mut self, presenter_name: impl Into<String>) -> Self {
        self.presenter_name = Some(presenter_name.into());
        self
    }

    fn mime_type(&self) -> &'static str {
        let extension = Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        video_mime_type(extension)
    }
}

/// Builder for [`ApiClient`].
#[derive(Debug)]
pub struct ApiClientBuilder {
    base_url: String,
    api_key: String,
    timeout: Option<Duration>,
}

impl ApiClientBuilder {
    /// Bound every request by `timeout`. No timeout is applied otherwise.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API key cannot be carried in an HTTP header
    /// - The HTTP client cannot be created
    pub fn build(self) -> Result<ApiClient> {
        let config = ClientConfig {
            base_url: normalize_url(&self.base_url),
            api_key: self.api_key,
            timeout: self.timeout,
        };

        let mut api_key_value = HeaderValue::from_str(&config.api_key).map_err(|_| {
            ClientError::InvalidInput("API key contains characters not allowed in a header".into())
        })?;
        api_key_value.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(api_key_header(), api_key_value.clone());
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder =
            Client::builder().user_agent(concat!("pitchlensctl/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ClientError::Transport {
            endpoint: config.base_url.clone(),
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(ApiClient {
            client,
            config,
            default_headers,
            api_key_value,
        })
    }
}

fn api_key_header() -> HeaderName {
    // HeaderName::from_static requires the lowercase form
    HeaderName::from_static("x-api-key")
}

/// HTTP client for the presentation analysis REST API.
///
/// One method per remote operation. Every call is a single request/response
/// exchange: nothing is retried or cached, and the only state is the
/// immutable [`ClientConfig`]. The client is cheap to clone and safe to
/// share between tasks; concurrent calls do not interfere, and no ordering
/// is guaranteed between them.
///
/// Dropping a returned future cancels the request.
///
/// # Examples
///
/// ```no_run
/// use pitchlensctl::client::ApiClient;
///
/// # async fn example() -> pitchlens_core::Result<()> {
/// let client = ApiClient::new("http://localhost:5000/api/v1/", "my-api-key")?;
///
/// let health = client.check_health().await?;
/// println!("Server version: {}", health.version);
///
/// let result = client.analyze_transcript("Buenos días...").await?;
/// println!("Overall: {:?}", result.analysis.overall());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    /// Credential plus JSON content type, sent on every JSON operation
    default_headers: HeaderMap,
    /// Credential alone, for the multipart upload
    api_key_value: HeaderValue,
}

impl ApiClient {
    /// Create a client with no request timeout.
    ///
    /// Trailing `/` on `base_url` is stripped, so `http://x/` and `http://x`
    /// produce identical request paths.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::builder(base_url, api_key).build()
    }

    /// Start building a client with optional settings.
    pub fn builder(base_url: impl Into<String>, api_key: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: None,
        }
    }

    /// Connection settings this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Normalized base endpoint.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    /// Send a request and translate the response.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<T> {
        debug!(endpoint, "Sending request");

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(endpoint, e))?;

        Self::handle_response(response, endpoint).await
    }

    /// Process an HTTP response and decode the body.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The body cannot be read
    /// - The status code is not 2xx ([`ClientError::RequestFailed`])
    /// - The body is not the expected JSON ([`ClientError::MalformedResponse`])
    async fn handle_response<T: DeserializeOwned>(
        response: Response,
        endpoint: &str,
    ) -> Result<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(endpoint, e))?;

        debug!(endpoint, status = status.as_u16(), "Received response");

        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "Request failed");
            return Err(request_failed(status, &text));
        }

        decode_body(endpoint, &text)
    }

    /// Check that the service is up.
    ///
    /// This endpoint is unauthenticated; no credential header is sent.
    pub async fn check_health(&self) -> Result<HealthResponse> {
        let request = self.client.get(self.url("health"));
        self.execute(request, "health").await
    }

    /// Upload a presentation video and receive its analysis.
    ///
    /// Sent as a multipart form (`file`, `rfc`, `company_name`,
    /// `presenter_name`). Only the credential header is attached so the
    /// transport can set the multipart boundary itself.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The RFC is empty or whitespace
    /// - The server answers with a non-2xx status
    pub async fn upload_presentation(&self, upload: PresentationUpload) -> Result<UploadResponse> {
        validate_rfc(&upload.rfc).map_err(ClientError::InvalidInput)?;

        let mime_type = upload.mime_type();
        let file_part = Part::bytes(upload.contents)
            .file_name(upload.file_name)
            .mime_str(mime_type)
            .map_err(|e| ClientError::InvalidInput(format!("Invalid file MIME type: {}", e)))?;

        let form = Form::new()
            .part("file", file_part)
            .text("rfc", upload.rfc)
            .text("company_name", upload.company_name.unwrap_or_default())
            .text("presenter_name", upload.presenter_name.unwrap_or_default());

        let request = self
            .client
            .post(self.url("presentations/upload"))
            .header(api_key_header(), self.api_key_value.clone())
            .multipart(form);

        self.execute(request, "presentations/upload").await
    }

    /// Read a local video file and upload it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist ([`ClientError::FileNotFound`])
    /// - Its existence cannot be checked ([`ClientError::Io`])
    /// - The extension is not mp4, webm, avi, mov or mkv
    /// - The file cannot be read
    /// - Any error of [`ApiClient::upload_presentation`]
    pub async fn upload_presentation_file(
        &self,
        path: impl AsRef<Path>,
        rfc: &str,
        company_name: Option<&str>,
        presenter_name: Option<&str>,
    ) -> Result<UploadResponse> {
        let path = path.as_ref();

        if !tokio::fs::try_exists(path).await? {
            return Err(ClientError::FileNotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        if !is_supported_video_extension(extension) {
            return Err(ClientError::UnsupportedFileType(extension.to_string()));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("presentation.{}", extension));
        let contents = tokio::fs::read(path).await?;

        debug!(file = %path.display(), bytes = contents.len(), "Uploading presentation file");

        let mut upload = PresentationUpload::new(file_name, contents, rfc);
        upload.company_name = company_name.map(str::to_string);
        upload.presenter_name = presenter_name.map(str::to_string);

        self.upload_presentation(upload).await
    }

    /// Fetch the stored record for an RFC.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The RFC is empty or whitespace
    /// - No record exists ([`ClientError::NotFound`] carrying the RFC)
    /// - Any other non-2xx status ([`ClientError::RequestFailed`])
    pub async fn fetch_presentation(&self, rfc: &str) -> Result<PresentationRecord> {
        validate_rfc(rfc).map_err(ClientError::InvalidInput)?;

        let path = format!("presentations/{}", urlencoding::encode(rfc));
        let request = self
            .client
            .get(self.url(&path))
            .headers(self.default_headers.clone());

        match self.execute(request, &path).await {
            Err(ClientError::RequestFailed { status: 404, .. }) => Err(ClientError::NotFound {
                rfc: rfc.to_string(),
            }),
            other => other,
        }
    }

    /// Fetch the processing state for an RFC.
    ///
    /// The server answers 200 with status `not_found` for unknown RFCs;
    /// non-2xx statuses map to [`ClientError::RequestFailed`] like every
    /// other operation.
    pub async fn fetch_presentation_status(&self, rfc: &str) -> Result<StatusResponse> {
        validate_rfc(rfc).map_err(ClientError::InvalidInput)?;

        let path = format!("presentations/{}/status", urlencoding::encode(rfc));
        let request = self
            .client
            .get(self.url(&path))
            .headers(self.default_headers.clone());

        self.execute(request, &path).await
    }

    /// List presentations, newest first.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of records (server default 50)
    /// * `offset` - Number of records to skip
    pub async fn list_presentations(&self, limit: u32, offset: u32) -> Result<PresentationList> {
        self.list_presentations_with(ListQuery::new(limit, offset))
            .await
    }

    /// List presentations with an explicit [`ListQuery`].
    pub async fn list_presentations_with(&self, query: ListQuery) -> Result<PresentationList> {
        let request = self
            .client
            .get(self.url("presentations"))
            .headers(self.default_headers.clone())
            .query(&query);

        self.execute(request, "presentations").await
    }

    /// Analyze a transcript without uploading a video.
    ///
    /// An empty transcript is still sent as `{"transcript": ""}`.
    pub async fn analyze_transcript(&self, transcript: &str) -> Result<TranscriptAnalysis> {
        let body = TranscriptRequest {
            transcript: transcript.to_string(),
        };
        let request = self
            .client
            .post(self.url("analysis/transcript"))
            .headers(self.default_headers.clone())
            .json(&body);

        self.execute(request, "analysis/transcript").await
    }

    /// Fetch storage and usage metrics.
    pub async fn fetch_metrics(&self) -> Result<MetricsResponse> {
        let request = self
            .client
            .get(self.url("metrics"))
            .headers(self.default_headers.clone());

        self.execute(request, "metrics").await
    }
}

/// Build the error for a non-2xx response.
///
/// `status_text` is the canonical reason for the code, or "Unknown Status"
/// for codes without one; the server's own wording goes in `detail`.
fn request_failed(status: StatusCode, body: &str) -> ClientError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|body| body.error);

    ClientError::RequestFailed {
        status: status.as_u16(),
        status_text: status
            .canonical_reason()
            .unwrap_or("Unknown Status")
            .to_string(),
        detail,
    }
}
