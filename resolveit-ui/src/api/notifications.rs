//! Notification inbox.

use super::client::{get, parse, post, send};
use crate::state::models::Notification;

pub async fn mine() -> Result<Vec<Notification>, String> {
    parse(send(get("/notifications/me")).await?).await
}

pub async fn mark_read(id: i64) -> Result<(), String> {
    send(post(&format!("/notifications/{}/read", id)))
        .await
        .map(|_| ())
}
