use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::state::HandinState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

/// The caller identity yielded by the identity collaborator: an opaque
/// bearer token resolved to `{ id, role }`. Token issuance happens outside
/// this service.
#[derive(Debug, sqlx::FromRow)]
pub struct CallerIdentity {
    pub id: Uuid,
    pub role: Role,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "authorization required" })),
    )
        .into_response()
}

impl FromRequestParts<HandinState> for CallerIdentity {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &HandinState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(unauthorized)?;

        sqlx::query_as::<_, Self>("SELECT id, role FROM users WHERE api_token = ?")
            .bind(token)
            .fetch_optional(&state.db_pool)
            .await
            .map_err(|error| {
                tracing::error!(%error, "identity lookup failed");
                unauthorized()
            })?
            .ok_or_else(unauthorized)
    }
}
