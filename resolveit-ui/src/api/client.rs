//! Request plumbing shared by every resource module.

use std::cell::RefCell;

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

const API_URL_KEY: &str = "resolveit_api_url";

thread_local! {
    static TOKEN: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

/// Set the API base URL in local storage
pub fn set_api_base(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(API_URL_KEY, url);
        }
    }
}

/// Replace the bearer token attached to every request
pub fn set_token(token: Option<String>) {
    TOKEN.with(|t| *t.borrow_mut() = token);
}

fn url(path: &str) -> String {
    format!("{}{}", get_api_base(), path)
}

fn authorize(builder: RequestBuilder) -> RequestBuilder {
    match TOKEN.with(|t| t.borrow().clone()) {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

pub(crate) fn get(path: &str) -> RequestBuilder {
    authorize(Request::get(&url(path)))
}

pub(crate) fn post(path: &str) -> RequestBuilder {
    authorize(Request::post(&url(path)))
}

pub(crate) fn put(path: &str) -> RequestBuilder {
    authorize(Request::put(&url(path)))
}

pub(crate) fn delete(path: &str) -> RequestBuilder {
    authorize(Request::delete(&url(path)))
}

#[derive(serde::Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

/// Message for a failed response body: the API's `error.message` when
/// present, else the raw text
pub(crate) fn error_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        return parsed.error.message;
    }
    let text = body.trim();
    if text.is_empty() {
        format!("Request failed ({})", status)
    } else {
        text.to_string()
    }
}

/// Turn a non-2xx response into its error message
pub(crate) async fn check(response: Response) -> Result<Response, String> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(error_message(status, &body))
}

pub(crate) async fn send(builder: RequestBuilder) -> Result<Response, String> {
    let response = builder
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    check(response).await
}

pub(crate) async fn send_json<B: Serialize>(
    builder: RequestBuilder,
    body: &B,
) -> Result<Response, String> {
    let response = builder
        .json(body)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    check(response).await
}

pub(crate) async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_api_body() {
        let body = r#"{"error":{"code":"INVALID_TRANSITION","message":"Complaint must be resolved first"},"request_id":"x"}"#;
        assert_eq!(error_message(409, body), "Complaint must be resolved first");
        assert_eq!(error_message(400, " Bad input \n"), "Bad input");
        assert_eq!(error_message(502, ""), "Request failed (502)");
    }
}
