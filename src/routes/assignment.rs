use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::CallerIdentity,
    error::ApiError,
    models::{Assignment, AssignmentWithSubmissions, Course},
    state::HandinState,
};

pub fn router() -> Router<HandinState> {
    Router::new()
        .route("/api/assignments", post(create_assignment))
        .route("/api/assignments/teacher", get(teacher_assignments))
        .route("/api/assignments/course/{course_id}", get(course_assignments))
}

/// Fields default to empty so a missing field reports the same itemized
/// error as a blank one instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAssignmentRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    course_id: String,
    #[serde(default)]
    deadline: String,
    #[serde(default)]
    instructions: String,
}

async fn create_assignment(
    caller: CallerIdentity,
    State(state): State<HandinState>,
    Json(body): Json<CreateAssignmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = body.name.trim();
    let course_id = body.course_id.trim();
    let deadline = body.deadline.trim();
    let instructions = body.instructions.trim();

    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push("assignment name is required".to_owned());
    }
    if course_id.is_empty() {
        errors.push("course ID is required".to_owned());
    }
    if deadline.is_empty() {
        errors.push("deadline is required".to_owned());
    }
    if instructions.is_empty() {
        errors.push("instructions are required".to_owned());
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let deadline = DateTime::parse_from_rfc3339(deadline)
        .map_err(|_| {
            ApiError::Validation(vec!["deadline must be a valid RFC 3339 timestamp".to_owned()])
        })?
        .with_timezone(&Utc);

    // Checked at creation only; the deadline keeps its meaning dynamically
    // once time passes it.
    if deadline <= Utc::now() {
        return Err(ApiError::Validation(vec![
            "deadline must be in the future".to_owned(),
        ]));
    }

    let course_id = Uuid::parse_str(course_id).map_err(|_| ApiError::InvalidIdentifier)?;
    let course = Course::find(&state.db_pool, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    let assignment = Assignment {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        course_id: course.id,
        course_name: course.title,
        deadline,
        instructions: instructions.to_owned(),
        created_at: Utc::now(),
    };

    assignment.insert(&state.db_pool).await?;

    tracing::info!(
        assignment = %assignment.id,
        course = %assignment.course_id,
        caller = %caller.id,
        role = ?caller.role,
        "assignment created"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "assignment created successfully",
            "assignment": assignment,
        })),
    ))
}

async fn teacher_assignments(
    _caller: CallerIdentity,
    State(state): State<HandinState>,
) -> Result<Json<Vec<AssignmentWithSubmissions>>, ApiError> {
    let assignments = Assignment::all(&state.db_pool).await?;
    let populated = Assignment::with_submissions(&state.db_pool, assignments).await?;

    Ok(Json(populated))
}

async fn course_assignments(
    _caller: CallerIdentity,
    State(state): State<HandinState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<AssignmentWithSubmissions>>, ApiError> {
    let course_id = Uuid::parse_str(&course_id).map_err(|_| ApiError::InvalidIdentifier)?;

    let assignments = Assignment::for_course(&state.db_pool, course_id).await?;
    let populated = Assignment::with_submissions(&state.db_pool, assignments).await?;

    Ok(Json(populated))
}
