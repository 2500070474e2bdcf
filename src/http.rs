//! HTTP API for the membership subsystem.
//!
//! Thin request/response glue: handlers decode input, call into
//! [`GroupService`](crate::services::GroupService), and shape the JSON
//! envelope. All invariant enforcement lives below the service boundary.

use crate::error::AppError;
use crate::repositories::LeaveOutcome;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

/// Build the API router over shared application state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/groups/create", post(create_group))
        .route("/api/groups/join", post(join_group))
        .route("/api/groups/my", get(list_my_groups))
        .route("/api/groups/:group_id", get(get_group_details))
        .route("/api/groups/:group_id/members", get(list_members))
        .route("/api/groups/:group_id/leave", delete(leave_group))
        .with_state(state)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "success": false,
            "code": self.kind(),
            "error": self.public_message(),
        }));

        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct CreateGroupRequest {
    user_id: Uuid,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_max_members")]
    max_members: i32,
}

fn default_max_members() -> i32 {
    10
}

#[derive(Debug, Deserialize)]
struct JoinGroupRequest {
    user_id: Uuid,
    invite_code: String,
}

#[derive(Debug, Deserialize)]
struct UserIdQuery {
    user_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct LeaveGroupRequest {
    user_id: Uuid,
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn create_group(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<Response, AppError> {
    let group = state
        .group_service
        .create_group(req.user_id, &req.name, &req.description, req.max_members)
        .await?;

    let body = Json(json!({
        "success": true,
        "group": {
            "id": group.id,
            "name": group.name,
            "description": group.description,
            "created_by": group.created_by,
            "invite_code": group.invite_code,
            "max_members": group.max_members,
        },
    }));

    Ok((StatusCode::CREATED, body).into_response())
}

async fn join_group(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JoinGroupRequest>,
) -> Result<Response, AppError> {
    let group = state
        .group_service
        .join_group(req.user_id, &req.invite_code)
        .await?;

    Ok(Json(json!({ "success": true, "group": group })).into_response())
}

async fn list_my_groups(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserIdQuery>,
) -> Result<Response, AppError> {
    let groups = state.group_service.list_my_groups(query.user_id).await?;

    Ok(Json(json!({ "success": true, "groups": groups })).into_response())
}

async fn get_group_details(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<Uuid>,
    Query(query): Query<UserIdQuery>,
) -> Result<Response, AppError> {
    let details = state
        .group_service
        .get_group_details(group_id, query.user_id)
        .await?;

    // The invite_code field vanishes from the payload for non-admin viewers
    // (serde skips the redacted None) rather than appearing as null.
    Ok(Json(json!({ "success": true, "group": details })).into_response())
}

async fn list_members(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<Uuid>,
    Query(query): Query<UserIdQuery>,
) -> Result<Response, AppError> {
    let members = state
        .group_service
        .list_members(group_id, query.user_id)
        .await?;

    Ok(Json(json!({ "success": true, "members": members })).into_response())
}

async fn leave_group(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<Uuid>,
    Json(req): Json<LeaveGroupRequest>,
) -> Result<Response, AppError> {
    let outcome = state
        .group_service
        .leave_group(group_id, req.user_id)
        .await?;

    let message = match outcome {
        LeaveOutcome::GroupDeleted => "Group deleted",
        LeaveOutcome::LeftGroup => "Left group successfully",
    };

    Ok(Json(json!({ "success": true, "message": message })).into_response())
}
