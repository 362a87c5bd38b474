//! Student directory.

use super::client::{delete, get, parse, post, put, send, send_json};
use crate::state::models::{Student, StudentInput};

pub async fn list() -> Result<Vec<Student>, String> {
    parse(send(get("/students")).await?).await
}

pub async fn get_one(id: i64) -> Result<Student, String> {
    parse(send(get(&format!("/students/{}", id))).await?).await
}

pub async fn create(input: &StudentInput) -> Result<Student, String> {
    parse(send_json(post("/students"), input).await?).await
}

pub async fn update(id: i64, input: &StudentInput) -> Result<Student, String> {
    parse(send_json(put(&format!("/students/{}", id)), input).await?).await
}

pub async fn remove(id: i64) -> Result<(), String> {
    send(delete(&format!("/students/{}", id))).await.map(|_| ())
}
