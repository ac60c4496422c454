// HTTP request handlers
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::{error, info};

use crate::models::UpdateUsersRequest;
use crate::server::state::AppState;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Users relay server is running")
}

/// Users endpoint - fetch the stored user list from GitHub
pub async fn get_users(State(state): State<AppState>) -> impl IntoResponse {
    let Some(store) = state.store else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": "GitHub PAT not configured on server."
            })),
        );
    };

    match store.read_users().await {
        Ok(document) => {
            info!("Fetched user list at revision {}", document.sha);
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "users": document.users,
                    "sha": document.sha
                })),
            )
        }
        Err(e) => {
            error!("Error reading from GitHub: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Could not read from GitHub."
                })),
            )
        }
    }
}

/// Users endpoint - commit an updated user list to GitHub
pub async fn update_users(
    State(state): State<AppState>,
    Json(payload): Json<UpdateUsersRequest>,
) -> impl IntoResponse {
    let Some(store) = state.store else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": "GitHub PAT not configured on server."
            })),
        );
    };

    // Presence-only validation; an empty string counts as absent.
    // The shape of `users` is not checked.
    let users = payload.users;
    let sha = payload.sha.filter(|sha| !sha.is_empty());
    let commit_message = payload.commit_message.filter(|msg| !msg.is_empty());

    let (Some(users), Some(sha), Some(commit_message)) = (users, sha, commit_message) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Invalid request body."
            })),
        );
    };

    match store.write_users(&users, &sha, &commit_message).await {
        Ok(new_sha) => {
            info!("Committed user list update at revision {}", new_sha);
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "sha": new_sha
                })),
            )
        }
        Err(e) => {
            error!("Error writing to GitHub: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Could not write to GitHub."
                })),
            )
        }
    }
}
