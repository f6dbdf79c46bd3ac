use std::io;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_typed_multipart::{FieldData, TryFromMultipart, TypedMultipart};
use chrono::Utc;
use serde_json::json;
use tokio::fs;
use uuid::Uuid;

use crate::{
    auth::CallerIdentity,
    error::ApiError,
    models::{Assignment, Submission},
    state::HandinState,
    storage::PDF_MIME,
};

pub fn router() -> Router<HandinState> {
    Router::new()
        .route("/api/assignments/submit/{assignment_id}", post(submit))
        .route(
            "/api/assignments/submission-file/{submission_id}",
            get(submission_file),
        )
}

#[derive(Debug, TryFromMultipart)]
struct SubmitForm {
    #[form_data(limit = "10MiB")]
    submission_file: FieldData<Bytes>,
}

async fn submit(
    caller: CallerIdentity,
    State(state): State<HandinState>,
    Path(assignment_id): Path<String>,
    TypedMultipart(SubmitForm { submission_file }): TypedMultipart<SubmitForm>,
) -> Result<impl IntoResponse, ApiError> {
    let assignment_id = Uuid::parse_str(&assignment_id).map_err(|_| ApiError::InvalidIdentifier)?;

    let original_name = submission_file
        .metadata
        .file_name
        .clone()
        .ok_or(ApiError::RejectedFile("no file uploaded"))?;

    let ingested = state
        .files
        .ingest(
            &original_name,
            submission_file.metadata.content_type.as_deref(),
            &submission_file.contents,
        )
        .await?;

    // Past this point a file is on disk; every failure path must discard it
    // so a failed submit never leaves an orphan.
    let assignment = match Assignment::find(&state.db_pool, assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            state.files.discard(&ingested.stored_name).await;
            return Err(ApiError::NotFound("assignment"));
        }
        Err(error) => {
            state.files.discard(&ingested.stored_name).await;
            return Err(error.into());
        }
    };

    let submission = Submission {
        id: Uuid::new_v4(),
        assignment_id: assignment.id,
        student_id: caller.id,
        stored_file: ingested.stored_name.clone(),
        original_name: ingested.original_name,
        submitted_at: Utc::now(),
    };

    if let Err(error) = submission.insert(&state.db_pool).await {
        state.files.discard(&ingested.stored_name).await;
        return Err(error.into());
    }

    tracing::info!(
        submission = %submission.id,
        assignment = %assignment.id,
        student = %caller.id,
        size_bytes = ingested.size_bytes,
        "submission accepted"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "assignment submitted successfully",
            "submission": {
                "fileName": submission.original_name,
                "submissionDate": submission.submitted_at,
            },
        })),
    ))
}

// TODO: decide whether fetching a submission file should require an
// ownership or role check; today any caller holding the id can read it.
async fn submission_file(
    State(state): State<HandinState>,
    Path(submission_id): Path<String>,
) -> Result<Response, ApiError> {
    let submission_id = Uuid::parse_str(&submission_id).map_err(|_| ApiError::InvalidIdentifier)?;

    let submission = Submission::find(&state.db_pool, submission_id)
        .await?
        .ok_or(ApiError::NotFound("submission"))?;

    let contents = match fs::read(state.files.resolve(&submission.stored_file)).await {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            // A dangling record is reported, never a crash.
            tracing::warn!(
                submission = %submission.id,
                stored_file = submission.stored_file,
                "submission record points at a missing file"
            );
            return Err(ApiError::NotFound("file"));
        }
        Err(error) => return Err(error.into()),
    };

    let headers = [
        (header::CONTENT_TYPE, PDF_MIME.to_owned()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", submission.original_name),
        ),
    ];

    Ok((headers, contents).into_response())
}
