//! 用户处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use super::{model::User, service::UserService};
use crate::core::error::CoreError;

#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, CoreError> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, CoreError> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<User>,
) -> Result<Json<User>, CoreError> {
    let user = state.user_service.create_user(payload).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, CoreError> {
    state.user_service.delete_user(id).await?;
    Ok(StatusCode::OK)
}
