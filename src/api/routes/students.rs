//! Student Routes
//!
//! CRUD endpoints for the student directory.
//!
//! - GET /api/students - List all students
//! - POST /api/students - Add a student
//! - GET /api/students/:id - Get a student
//! - PUT /api/students/:id - Replace a student
//! - DELETE /api/students/:id - Remove a student

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::AuthUser;
use crate::api::state::AppState;
use crate::auth::is_valid_email;
use crate::store::{Student, StudentInput};

/// GET /api/students
pub async fn list_students(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<Student>>> {
    Ok(Json(state.db.list_students()?))
}

/// GET /api/students/:id
pub async fn get_student(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Student>> {
    let student = state
        .db
        .get_student(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Student with id {} not found", id)))?;
    Ok(Json(student))
}

/// POST /api/students
pub async fn create_student(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(input): Json<StudentInput>,
) -> ApiResult<(StatusCode, Json<Student>)> {
    validate_student(&input)?;
    let student = state.db.insert_student(&input)?;
    tracing::info!(student_id = student.id, "Student created");
    Ok((StatusCode::CREATED, Json(student)))
}

/// PUT /api/students/:id
pub async fn update_student(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<StudentInput>,
) -> ApiResult<Json<Student>> {
    validate_student(&input)?;
    let student = state.db.update_student(id, &input)?;
    tracing::info!(student_id = id, "Student updated");
    Ok(Json(student))
}

/// DELETE /api/students/:id
pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !state.db.delete_student(id)? {
        return Err(ApiError::NotFound(format!("Student with id {} not found", id)));
    }
    tracing::info!(student_id = id, "Student deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Validate student fields
fn validate_student(input: &StudentInput) -> ApiResult<()> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    if input.email.trim().is_empty() {
        return Err(ApiError::Validation("Email is required".to_string()));
    }
    if !is_valid_email(&input.email) {
        return Err(ApiError::Validation(format!(
            "Invalid email address: {}",
            input.email.trim()
        )));
    }
    if input.department.trim().is_empty() {
        return Err(ApiError::Validation("Department is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> StudentInput {
        StudentInput {
            name: "Kavya".into(),
            email: "kavya@uni.edu".into(),
            department: "ECE".into(),
            phone: None,
        }
    }

    #[test]
    fn test_validate_student() {
        assert!(validate_student(&input()).is_ok());

        let mut bad = input();
        bad.department = " ".into();
        assert!(validate_student(&bad).is_err());

        let mut bad = input();
        bad.email = "kavya".into();
        assert!(matches!(validate_student(&bad), Err(ApiError::Validation(_))));
    }
}
