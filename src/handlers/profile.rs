//! 个人资料的 HTTP 处理器

use crate::{
    auth::gate::AuthContext,
    error::AppError,
    middleware::AppState,
    models::user::{ProfileUpdate, UpdateProfileRequest, UserResponse},
};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

/// 查询当前用户的资料
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .users
        .find_by_id(auth_context.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(UserResponse::from(user)))
}

/// 部分更新当前用户的资料
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(mut req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 昵称与注册同规则: 修剪后校验, 全空白拒收
    if let Some(name) = req.display_name.as_mut() {
        *name = name.trim().to_string();
    }
    req.validate()?;

    let update = ProfileUpdate::from(req);
    if update.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let user = state
        .users
        .update_fields(auth_context.user_id, update)
        .await?
        .ok_or(AppError::Unauthorized)?;

    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(Json(UserResponse::from(user)))
}
