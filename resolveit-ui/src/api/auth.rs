//! Sign-in and registration.

use serde::{Deserialize, Serialize};

use super::client::{parse, post, send, send_json};
use crate::state::models::{Session, User};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    status: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Exchange credentials for a session. Bad credentials come back with
/// HTTP 200 and `status: "error"`.
pub async fn login(email: &str, password: &str) -> Result<Session, String> {
    let response = send_json(post("/auth/login"), &LoginRequest { email, password }).await?;
    let body: LoginResponse = parse(response).await?;

    match (body.status.as_str(), body.token, body.user) {
        ("success", Some(token), Some(user)) => Ok(Session { token, user }),
        _ => Err(body.message.unwrap_or_else(|| "Login failed".to_string())),
    }
}

/// Create a student account. Returns the server's confirmation text, which
/// is also how a taken email is reported.
pub async fn register(name: &str, email: &str, password: &str) -> Result<String, String> {
    let response = send_json(
        post("/auth/register"),
        &RegisterRequest {
            name,
            email,
            password,
        },
    )
    .await?;
    response
        .text()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Reachability probe used by the login page
pub async fn check_health() -> Result<(), String> {
    let base = super::get_api_base();
    let health = base.trim_end_matches("/api").to_string() + "/health/live";
    send(gloo_net::http::Request::get(&health)).await.map(|_| ())
}
