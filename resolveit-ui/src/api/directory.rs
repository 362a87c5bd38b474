//! Categories and user accounts.

use super::client::{get, parse, send};
use crate::state::models::{Category, User};

pub async fn categories() -> Result<Vec<Category>, String> {
    parse(send(get("/categories")).await?).await
}

/// Staff only
pub async fn users() -> Result<Vec<User>, String> {
    parse(send(get("/users")).await?).await
}
