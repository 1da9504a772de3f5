//! 路由注册
//! 创建所有页面与 API 路由并应用中间件

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::{
    auth::gate,
    auth::jwt::JwtService,
    config::AppConfig,
    handlers,
    middleware::AppState,
    repository::{PgProgramStore, PgUserStore, ProgramStore, UserStore},
    services::AuthService,
};

/// 组装运行期依赖
/// 签名密钥缺失或过短在这里直接终止启动
pub fn build_state(config: AppConfig, db: PgPool) -> Arc<AppState> {
    let jwt_service =
        Arc::new(JwtService::from_config(&config).expect("Failed to create JWT service"));

    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(db.clone()));
    let programs: Arc<dyn ProgramStore> = Arc::new(PgProgramStore::new(db.clone()));

    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        jwt_service.clone(),
        config.security.clone(),
    ));

    Arc::new(AppState {
        config,
        db,
        users,
        programs,
        jwt_service,
        auth_service,
    })
}

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 页面路由, 受保护页面的拦截由门禁中间件负责
    let page_routes = Router::new()
        .route("/", get(handlers::pages::home))
        .route("/auth/login", get(handlers::pages::login_page))
        .route("/auth/register", get(handlers::pages::register_page))
        .route("/profile", get(handlers::pages::profile_page))
        .route("/programs", get(handlers::pages::programs_page));

    // 认证接口
    let auth_api = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me));

    // 业务接口
    let protected_api = Router::new()
        .route(
            "/api/profile",
            get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        )
        .route(
            "/api/programs",
            get(handlers::program::list_programs).post(handlers::program::create_program),
        )
        .route(
            "/api/programs/{id}",
            get(handlers::program::get_program).delete(handlers::program::delete_program),
        );

    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 指标端点
    let metrics_routes = Router::new().route("/metrics", get(handlers::metrics::metrics_export));

    // 组合所有路由
    // layer 先挂后跑: 请求按 追踪 -> 体积限制 -> 门禁 -> 业务 的顺序经过
    Router::new()
        .merge(page_routes)
        .merge(auth_api)
        .merge(protected_api)
        .merge(public_routes)
        .merge(metrics_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            gate::session_gate,
        ))
        .layer(RequestBodyLimitLayer::new(state.config.server.max_body_bytes))
        .layer(axum::middleware::from_fn(
            crate::middleware::request_tracking_middleware,
        ))
        .with_state(state)
}
