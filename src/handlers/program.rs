//! 训练计划的 HTTP 处理器
//! 所有操作都限定在当前用户名下, 他人的计划一律按不存在处理

use crate::{
    auth::gate::AuthContext,
    error::AppError,
    middleware::AppState,
    models::program::{CreateProgramRequest, ProgramResponse},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 列出当前用户的全部计划
pub async fn list_programs(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let programs = state.programs.list_for_user(auth_context.user_id).await?;

    let responses: Vec<ProgramResponse> = programs.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}

/// 创建训练计划
pub async fn create_program(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreateProgramRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let program = state.programs.insert(auth_context.user_id, req).await?;

    tracing::info!(user_id = %auth_context.user_id, program_id = %program.id, "Program created");

    Ok((StatusCode::CREATED, Json(ProgramResponse::from(program))))
}

/// 查询单个计划
pub async fn get_program(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let program = state
        .programs
        .find_for_user(auth_context.user_id, id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(ProgramResponse::from(program)))
}

/// 删除单个计划
pub async fn delete_program(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .programs
        .delete_for_user(auth_context.user_id, id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound);
    }

    tracing::info!(user_id = %auth_context.user_id, program_id = %id, "Program deleted");

    Ok(StatusCode::NO_CONTENT)
}
