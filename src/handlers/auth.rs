//! 认证相关的 HTTP 处理器
//! 令牌只通过 HTTP-only Cookie 下发, 响应体里不出现令牌本身

use crate::{
    auth::{cookie, gate::AuthContext},
    error::AppError,
    middleware::AppState,
    models::auth::{AuthResponse, LoginRequest, LogoutResponse, RegisterRequest},
    models::user::UserResponse,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.auth_service.register(req).await?;

    let cookie = cookie::build(
        &outcome.token,
        state.jwt_service.ttl_secs(),
        state.config.security.cookie_secure,
    );

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            user: UserResponse::from(outcome.user),
        }),
    ))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.auth_service.login(req).await?;

    let cookie = cookie::build(
        &outcome.token,
        state.jwt_service.ttl_secs(),
        state.config.security.cookie_secure,
    );

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            user: UserResponse::from(outcome.user),
        }),
    ))
}

/// 登出
/// 令牌是无状态的, 服务端只负责清掉客户端的 Cookie
pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cookie = cookie::clear(state.config.security.cookie_secure);

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LogoutResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// 当前登录用户
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.current_user(auth_context.user_id).await?;

    Ok(Json(UserResponse::from(user)))
}
