//! Complaint submission, lifecycle actions and reporting.

use serde::Serialize;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, File, FormData, HtmlAnchorElement, Url};

use super::client::{check, delete, get, parse, post, put, send, send_json};
use crate::state::models::{Attachment, Complaint, ComplaintDraft, Stats, TimelineEntry};

const FALLBACK_REPORT_NAME: &str = "complaints_report.csv";

fn js_error(e: wasm_bindgen::JsValue) -> String {
    format!("Browser error: {:?}", e)
}

fn json_blob(json: &str) -> Result<Blob, String> {
    let parts = js_sys::Array::of1(&json.into());
    let options = BlobPropertyBag::new();
    options.set_type("application/json");
    Blob::new_with_str_sequence_and_options(&parts, &options).map_err(js_error)
}

/// Staff only
pub async fn all() -> Result<Vec<Complaint>, String> {
    parse(send(get("/complaints")).await?).await
}

pub async fn mine() -> Result<Vec<Complaint>, String> {
    parse(send(get("/complaints/me")).await?).await
}

pub async fn get_one(id: i64) -> Result<Complaint, String> {
    parse(send(get(&format!("/complaints/{}", id))).await?).await
}

pub async fn stats() -> Result<Stats, String> {
    parse(send(get("/complaints/stats")).await?).await
}

pub async fn timeline(id: i64) -> Result<Vec<TimelineEntry>, String> {
    parse(send(get(&format!("/complaints/{}/timeline", id))).await?).await
}

pub async fn attachments(id: i64) -> Result<Vec<Attachment>, String> {
    parse(send(get(&format!("/complaints/{}/attachments", id))).await?).await
}

/// Submit as multipart: a `complaint` JSON part and an optional `file`
pub async fn create(draft: &ComplaintDraft, file: Option<File>) -> Result<Complaint, String> {
    let json = serde_json::to_string(draft).map_err(|e| format!("Encode error: {}", e))?;

    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob("complaint", &json_blob(&json)?)
        .map_err(js_error)?;
    if let Some(file) = file {
        form.append_with_blob_and_filename("file", &file, &file.name())
            .map_err(js_error)?;
    }

    let response = post("/complaints")
        .body(form)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    parse(check(response).await?).await
}

/// Staff edit; only the fields present are changed
#[derive(Default, Serialize)]
pub struct ComplaintUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

pub async fn update(id: i64, update: &ComplaintUpdate) -> Result<Complaint, String> {
    parse(send_json(put(&format!("/complaints/{}", id)), update).await?).await
}

pub async fn remove(id: i64) -> Result<(), String> {
    send(delete(&format!("/complaints/{}", id))).await.map(|_| ())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignRequest {
    user_id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentRequest<'a> {
    comment: &'a str,
    is_public: bool,
}

#[derive(Serialize)]
struct NoteRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

#[derive(Serialize)]
struct ReopenRequest<'a> {
    reason: &'a str,
}

pub async fn assign(id: i64, user_id: i64) -> Result<Complaint, String> {
    let path = format!("/complaints/{}/assign", id);
    parse(send_json(post(&path), &AssignRequest { user_id }).await?).await
}

pub async fn comment(id: i64, comment: &str, is_public: bool) -> Result<TimelineEntry, String> {
    let path = format!("/complaints/{}/comment", id);
    parse(send_json(post(&path), &CommentRequest { comment, is_public }).await?).await
}

pub async fn resolve(id: i64, comment: Option<&str>) -> Result<Complaint, String> {
    let path = format!("/complaints/{}/resolve", id);
    parse(send_json(post(&path), &NoteRequest { comment }).await?).await
}

/// Owner accepts the resolution
pub async fn close(id: i64, comment: Option<&str>) -> Result<Complaint, String> {
    let path = format!("/complaints/{}/close", id);
    parse(send_json(post(&path), &NoteRequest { comment }).await?).await
}

/// Owner rejects the resolution
pub async fn reopen(id: i64, reason: &str) -> Result<Complaint, String> {
    let path = format!("/complaints/{}/reopen", id);
    parse(send_json(post(&path), &ReopenRequest { reason }).await?).await
}

/// File name from a `Content-Disposition` header value
pub fn disposition_file_name(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

/// Fetch the CSV report and hand it to the browser as a download
pub async fn export_csv() -> Result<String, String> {
    let response = send(get("/complaints/export")).await?;
    let file_name = response
        .headers()
        .get("content-disposition")
        .and_then(|h| disposition_file_name(&h))
        .unwrap_or_else(|| FALLBACK_REPORT_NAME.to_string());
    let csv = response
        .text()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;

    let parts = js_sys::Array::of1(&csv.into());
    let options = BlobPropertyBag::new();
    options.set_type("text/csv");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(js_error)?;
    let href = Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "No document available".to_string())?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| "Could not create download link".to_string())?;
    anchor.set_href(&href);
    anchor.set_download(&file_name);
    anchor.click();
    Url::revoke_object_url(&href).map_err(js_error)?;

    Ok(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_file_name() {
        assert_eq!(
            disposition_file_name("attachment; filename=\"complaints_report_20240301.csv\""),
            Some("complaints_report_20240301.csv".to_string())
        );
        assert_eq!(
            disposition_file_name("attachment;filename=report.csv"),
            Some("report.csv".to_string())
        );
        assert_eq!(disposition_file_name("attachment"), None);
    }
}
