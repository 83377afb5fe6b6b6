use axum::{extract::rejection::JsonRejection, extract::State, Json};
use service::academy::domain::{SessionCompletionInput, TechniqueCompletionInput};

use super::{Ack, ServerState};
use crate::errors::JsonApiError;

pub async fn complete_training(
    State(state): State<ServerState>,
    payload: Result<Json<TechniqueCompletionInput>, JsonRejection>,
) -> Result<Json<Ack>, JsonApiError> {
    let Json(input) = payload?;
    state
        .academy
        .record_technique_completion(&input.user_id, input.technique_data)
        .await?;
    Ok(Ack::ok())
}

/// Session payloads can carry base64 media, hence the large body limit.
pub async fn complete_session(
    State(state): State<ServerState>,
    payload: Result<Json<SessionCompletionInput>, JsonRejection>,
) -> Result<Json<Ack>, JsonApiError> {
    let Json(input) = payload?;
    state
        .academy
        .record_session_completion(&input.user_id, input.session_data)
        .await?;
    Ok(Ack::ok())
}
