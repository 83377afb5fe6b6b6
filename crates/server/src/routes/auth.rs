use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use service::academy::domain::{AuthenticatedUser, LoginInput, RegisterInput, ResetPasswordInput};

use super::{Ack, ServerState};
use crate::errors::JsonApiError;

#[derive(Serialize)]
pub struct LoginOutput {
    pub success: bool,
    pub user: AuthenticatedUser,
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub success: bool,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<LoginOutput>, JsonApiError> {
    let Json(input) = payload?;
    let user = state.academy.authenticate(input).await?;
    Ok(Json(LoginOutput { success: true, user }))
}

pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<Json<RegisterOutput>, JsonApiError> {
    let Json(input) = payload?;
    let reg = state.academy.register(input).await?;
    Ok(Json(RegisterOutput { success: true, user_id: reg.user_id }))
}

pub async fn reset_password(
    State(state): State<ServerState>,
    payload: Result<Json<ResetPasswordInput>, JsonRejection>,
) -> Result<Json<Ack>, JsonApiError> {
    let Json(input) = payload?;
    state.academy.reset_password(input).await?;
    Ok(Ack::ok())
}
