use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use service::academy::domain::CandidateView;

use super::ServerState;
use crate::errors::JsonApiError;

pub async fn list_users(State(state): State<ServerState>) -> Json<Vec<CandidateView>> {
    Json(state.academy.list_users().await)
}

pub async fn get_user(
    State(state): State<ServerState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<CandidateView>, JsonApiError> {
    let Path(id) = path?;
    Ok(Json(state.academy.get_user(&id).await?))
}
