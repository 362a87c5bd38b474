//! ResolveIT REST API Client
//!
//! Typed HTTP client for the ResolveIT API, grouped by resource the same way
//! the browser interface groups its calls.
//!
//! ```rust,no_run
//! use resolveit::client::ResolveClient;
//!
//! # async fn run() -> Result<(), resolveit::client::ClientError> {
//! let mut client = ResolveClient::new("http://localhost:8080")?;
//! let session = client.auth().login("admin@example.com", "secret").await?;
//! client.set_token(session.token);
//!
//! for complaint in client.complaints().all().await? {
//!     println!("#{} {}", complaint.complaint_id, complaint.title);
//! }
//! # Ok(())
//! # }
//! ```

use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::api::dto::{EscalationRunResponse, HealthResponse, LoginResponse, RegisterRequest};
use crate::api::error::ErrorResponse;
use crate::auth::Session;
use crate::store::{
    Attachment, Category, Complaint, ComplaintDraft, ComplaintUpdate, Notification, Stats,
    Student, StudentInput, TimelineEntry, User,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("ResolveIT API unavailable at {0}")]
    Unavailable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// HTTP client for the ResolveIT API
#[derive(Clone)]
pub struct ResolveClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ResolveClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach a bearer token to every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    pub fn complaints(&self) -> ComplaintsApi<'_> {
        ComplaintsApi { client: self }
    }

    pub fn students(&self) -> StudentsApi<'_> {
        StudentsApi { client: self }
    }

    pub fn notifications(&self) -> NotificationsApi<'_> {
        NotificationsApi { client: self }
    }

    /// Active complaint categories
    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        self.fetch(self.request(Method::GET, "/api/categories")).await
    }

    /// All accounts (staff only)
    pub async fn users(&self) -> ClientResult<Vec<User>> {
        self.fetch(self.request(Method::GET, "/api/users")).await
    }

    /// Run the SLA escalation sweep now (staff only)
    pub async fn run_escalations(&self) -> ClientResult<usize> {
        let response: EscalationRunResponse = self
            .fetch(self.request(Method::POST, "/api/admin/escalations/run"))
            .await?;
        Ok(response.escalated)
    }

    /// Full health document from `/health`
    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.fetch(self.request(Method::GET, "/health")).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else if e.is_connect() {
                ClientError::Unavailable(self.base_url.clone())
            } else {
                ClientError::Transport(e)
            }
        })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status,
                message: error_message(&text),
            })
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        Ok(self.send(builder).await?.json().await?)
    }

    async fn fetch_text(&self, builder: RequestBuilder) -> ClientResult<String> {
        Ok(self.send(builder).await?.text().await?)
    }

    async fn execute(&self, builder: RequestBuilder) -> ClientResult<()> {
        self.send(builder).await.map(|_| ())
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.fetch(self.request(Method::POST, path).json(body)).await
    }
}

/// Prefer the server's structured message, fall back to the raw body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "No response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

// ============================================
// Resource groups
// ============================================

/// `/api/auth`
pub struct AuthApi<'a> {
    client: &'a ResolveClient,
}

impl AuthApi<'_> {
    /// Bad credentials come back in-band; they are surfaced as a 401 here.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let response: LoginResponse = self
            .client
            .post_json(
                "/api/auth/login",
                &json!({ "email": email, "password": password }),
            )
            .await?;

        match (response.token, response.user) {
            (Some(token), Some(user)) if response.status == "success" => {
                Ok(Session { token, user })
            }
            _ => Err(ClientError::Api {
                status: 401,
                message: response
                    .message
                    .unwrap_or_else(|| "Login failed".to_string()),
            }),
        }
    }

    /// Returns the server's plain-text answer, which is also the answer for
    /// an email that is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> ClientResult<String> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.map(str::to_string),
        };
        self.client
            .fetch_text(
                self.client
                    .request(Method::POST, "/api/auth/register")
                    .json(&body),
            )
            .await
    }
}

/// `/api/complaints`
pub struct ComplaintsApi<'a> {
    client: &'a ResolveClient,
}

impl ComplaintsApi<'_> {
    fn path(id: i64, action: &str) -> String {
        format!("/api/complaints/{}{}", id, action)
    }

    pub async fn all(&self) -> ClientResult<Vec<Complaint>> {
        self.client
            .fetch(self.client.request(Method::GET, "/api/complaints"))
            .await
    }

    pub async fn mine(&self) -> ClientResult<Vec<Complaint>> {
        self.client
            .fetch(self.client.request(Method::GET, "/api/complaints/me"))
            .await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Complaint> {
        self.client
            .fetch(self.client.request(Method::GET, &Self::path(id, "")))
            .await
    }

    pub async fn stats(&self) -> ClientResult<Stats> {
        self.client
            .fetch(self.client.request(Method::GET, "/api/complaints/stats"))
            .await
    }

    /// Submit a complaint, optionally with one evidence file
    pub async fn create(
        &self,
        draft: &ComplaintDraft,
        file: Option<(String, Vec<u8>)>,
    ) -> ClientResult<Complaint> {
        let json = serde_json::to_string(draft).map_err(|e| ClientError::Api {
            status: 400,
            message: format!("Cannot encode complaint: {}", e),
        })?;
        let part = multipart::Part::text(json).mime_str("application/json")?;
        let mut form = multipart::Form::new().part("complaint", part);
        if let Some((file_name, bytes)) = file {
            form = form.part("file", multipart::Part::bytes(bytes).file_name(file_name));
        }

        self.client
            .fetch(
                self.client
                    .request(Method::POST, "/api/complaints")
                    .multipart(form),
            )
            .await
    }

    pub async fn update(&self, id: i64, update: &ComplaintUpdate) -> ClientResult<Complaint> {
        self.client
            .fetch(
                self.client
                    .request(Method::PUT, &Self::path(id, ""))
                    .json(update),
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client
            .execute(self.client.request(Method::DELETE, &Self::path(id, "")))
            .await
    }

    pub async fn timeline(&self, id: i64) -> ClientResult<Vec<TimelineEntry>> {
        self.client
            .fetch(self.client.request(Method::GET, &Self::path(id, "/timeline")))
            .await
    }

    pub async fn attachments(&self, id: i64) -> ClientResult<Vec<Attachment>> {
        self.client
            .fetch(self.client.request(Method::GET, &Self::path(id, "/attachments")))
            .await
    }

    pub async fn assign(&self, id: i64, user_id: i64) -> ClientResult<Complaint> {
        self.client
            .post_json(&Self::path(id, "/assign"), &json!({ "userId": user_id }))
            .await
    }

    pub async fn comment(
        &self,
        id: i64,
        comment: &str,
        is_public: bool,
    ) -> ClientResult<TimelineEntry> {
        self.client
            .post_json(
                &Self::path(id, "/comment"),
                &json!({ "comment": comment, "isPublic": is_public }),
            )
            .await
    }

    pub async fn resolve(&self, id: i64, comment: Option<&str>) -> ClientResult<Complaint> {
        self.client
            .post_json(&Self::path(id, "/resolve"), &json!({ "comment": comment }))
            .await
    }

    pub async fn close(&self, id: i64, comment: Option<&str>) -> ClientResult<Complaint> {
        self.client
            .post_json(&Self::path(id, "/close"), &json!({ "comment": comment }))
            .await
    }

    pub async fn reopen(&self, id: i64, reason: &str) -> ClientResult<Complaint> {
        self.client
            .post_json(&Self::path(id, "/reopen"), &json!({ "reason": reason }))
            .await
    }

    /// CSV report body
    pub async fn export(&self) -> ClientResult<String> {
        self.client
            .fetch_text(self.client.request(Method::GET, "/api/complaints/export"))
            .await
    }
}

/// `/api/students`
pub struct StudentsApi<'a> {
    client: &'a ResolveClient,
}

impl StudentsApi<'_> {
    pub async fn list(&self) -> ClientResult<Vec<Student>> {
        self.client
            .fetch(self.client.request(Method::GET, "/api/students"))
            .await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Student> {
        self.client
            .fetch(
                self.client
                    .request(Method::GET, &format!("/api/students/{}", id)),
            )
            .await
    }

    pub async fn create(&self, input: &StudentInput) -> ClientResult<Student> {
        self.client.post_json("/api/students", input).await
    }

    pub async fn update(&self, id: i64, input: &StudentInput) -> ClientResult<Student> {
        self.client
            .fetch(
                self.client
                    .request(Method::PUT, &format!("/api/students/{}", id))
                    .json(input),
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client
            .execute(
                self.client
                    .request(Method::DELETE, &format!("/api/students/{}", id)),
            )
            .await
    }
}

/// `/api/notifications`
pub struct NotificationsApi<'a> {
    client: &'a ResolveClient,
}

impl NotificationsApi<'_> {
    pub async fn mine(&self) -> ClientResult<Vec<Notification>> {
        self.client
            .fetch(self.client.request(Method::GET, "/api/notifications/me"))
            .await
    }

    pub async fn mark_read(&self, id: i64) -> ClientResult<()> {
        self.client
            .execute(
                self.client
                    .request(Method::POST, &format!("/api/notifications/{}/read", id)),
            )
            .await
    }
}
