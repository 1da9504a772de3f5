//! 请求门禁中间件
//! 每个请求先按路径分类, 受保护路径再做会话校验
//! 分类只看路径前缀, 在读取任何令牌之前完成

use crate::{auth::cookie, error::AppError, middleware::AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;

/// 由门禁写入请求头的身份字段
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

const BYPASS_PREFIXES: &[&str] = &["/assets/", "/static/"];
const BYPASS_EXACT: &[&str] = &["/favicon.ico", "/robots.txt"];
const AUTH_PAGES: &[&str] = &["/auth/login", "/auth/register"];
const PROTECTED_PAGE_PREFIXES: &[&str] = &["/profile", "/programs"];
const PROTECTED_API_PREFIXES: &[&str] = &["/api/profile", "/api/programs", "/api/auth/me"];

/// Route classification decided purely from the path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Static and framework paths the gate never inspects
    Bypass,
    /// Login and registration pages
    AuthPage,
    /// No session required
    Public,
    /// Browser-navigation route requiring a session
    ProtectedPage,
    /// API route requiring a session
    ProtectedApi,
}

/// 按固定前缀表对路径分类
pub fn classify(path: &str) -> RouteClass {
    if BYPASS_EXACT.contains(&path) || BYPASS_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return RouteClass::Bypass;
    }

    if AUTH_PAGES.contains(&path) {
        return RouteClass::AuthPage;
    }

    if PROTECTED_API_PREFIXES
        .iter()
        .any(|p| matches_prefix(path, p))
    {
        return RouteClass::ProtectedApi;
    }

    if PROTECTED_PAGE_PREFIXES
        .iter()
        .any(|p| matches_prefix(path, p))
    {
        return RouteClass::ProtectedPage;
    }

    RouteClass::Public
}

/// 前缀匹配必须落在路径段边界上, `/profilex` 不算命中 `/profile`
fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 会话门禁中间件
///
/// 公开路径原样放行, 受保护路径按 API/页面两种形态拒绝:
/// API 返回 401 JSON, 页面重定向到登录页并带上原始路径。
pub async fn session_gate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    match classify(&path) {
        RouteClass::Bypass | RouteClass::Public => next.run(req).await,

        RouteClass::AuthPage => {
            // 已登录用户访问登录/注册页时直接送回个人主页
            let authenticated = cookie::extract(req.headers())
                .and_then(|token| state.jwt_service.verify(&token).ok())
                .is_some();

            if authenticated {
                redirect_to("/profile")
            } else {
                next.run(req).await
            }
        }

        class @ (RouteClass::ProtectedPage | RouteClass::ProtectedApi) => {
            let api_shaped = class == RouteClass::ProtectedApi;

            let Some(token) = cookie::extract(req.headers()) else {
                return reject_missing(api_shaped, &path);
            };

            let claims = match state.jwt_service.verify(&token) {
                Ok(claims) => claims,
                Err(_) => {
                    return reject_invalid(api_shaped, &path, state.config.security.cookie_secure)
                }
            };

            // 合法签名但 sub 异常的令牌同样按失效处理
            let user_id = match claims.subject_id() {
                Ok(id) => id,
                Err(_) => {
                    return reject_invalid(api_shaped, &path, state.config.security.cookie_secure)
                }
            };

            let context = AuthContext {
                user_id,
                email: claims.email,
                display_name: claims.name,
            };

            if api_shaped {
                attach_identity_headers(req.headers_mut(), &context);
            }
            req.extensions_mut().insert(context);

            next.run(req).await
        }
    }
}

/// 无令牌: API 收 401, 页面被送去登录页
fn reject_missing(api_shaped: bool, path: &str) -> Response {
    if api_shaped {
        AppError::Unauthorized.into_response()
    } else {
        redirect_to_login(path)
    }
}

/// 令牌失效: API 收 401, 页面重定向并顺手清掉失效 Cookie
fn reject_invalid(api_shaped: bool, path: &str, secure: bool) -> Response {
    if api_shaped {
        AppError::InvalidToken.into_response()
    } else {
        let mut response = redirect_to_login(path);
        if let Ok(value) = HeaderValue::from_str(&cookie::clear(secure)) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        response
    }
}

fn redirect_to_login(original_path: &str) -> Response {
    redirect_to(&format!("/auth/login?callbackUrl={}", original_path))
}

fn redirect_to(target: &str) -> Response {
    let location =
        HeaderValue::from_str(target).unwrap_or_else(|_| HeaderValue::from_static("/auth/login"));
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// 把身份信息写进请求头转发给下游, 写不进去的值跳过
/// 身份头只认会话声明, 入站同名头一律先清除
fn attach_identity_headers(headers: &mut HeaderMap, context: &AuthContext) {
    headers.remove(USER_ID_HEADER);
    headers.remove(USER_EMAIL_HEADER);
    headers.remove(USER_NAME_HEADER);

    if let Ok(value) = HeaderValue::from_str(&context.user_id.to_string()) {
        headers.insert(USER_ID_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&context.email) {
        headers.insert(USER_EMAIL_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&context.display_name) {
        headers.insert(USER_NAME_HEADER, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bypass_paths_skip_classification() {
        assert_eq!(classify("/assets/app.css"), RouteClass::Bypass);
        assert_eq!(classify("/static/logo.png"), RouteClass::Bypass);
        assert_eq!(classify("/favicon.ico"), RouteClass::Bypass);
        assert_eq!(classify("/robots.txt"), RouteClass::Bypass);
    }

    #[test]
    fn auth_pages_are_exact_matches() {
        assert_eq!(classify("/auth/login"), RouteClass::AuthPage);
        assert_eq!(classify("/auth/register"), RouteClass::AuthPage);
        assert_eq!(classify("/auth/login/extra"), RouteClass::Public);
    }

    #[test]
    fn protected_pages_match_on_segment_boundaries() {
        assert_eq!(classify("/profile"), RouteClass::ProtectedPage);
        assert_eq!(classify("/profile/settings"), RouteClass::ProtectedPage);
        assert_eq!(classify("/programs"), RouteClass::ProtectedPage);
        assert_eq!(classify("/profilex"), RouteClass::Public);
        assert_eq!(classify("/programsabc"), RouteClass::Public);
    }

    #[test]
    fn protected_api_routes_are_recognized() {
        assert_eq!(classify("/api/profile"), RouteClass::ProtectedApi);
        assert_eq!(classify("/api/programs"), RouteClass::ProtectedApi);
        assert_eq!(
            classify("/api/programs/3f6a1c2e-0000-0000-0000-000000000000"),
            RouteClass::ProtectedApi
        );
        assert_eq!(classify("/api/auth/me"), RouteClass::ProtectedApi);
    }

    #[test]
    fn unlisted_paths_default_to_public() {
        assert_eq!(classify("/"), RouteClass::Public);
        assert_eq!(classify("/about"), RouteClass::Public);
        assert_eq!(classify("/api/auth/login"), RouteClass::Public);
        assert_eq!(classify("/api/auth/register"), RouteClass::Public);
        assert_eq!(classify("/api/auth/logout"), RouteClass::Public);
        assert_eq!(classify("/health"), RouteClass::Public);
    }

    #[test]
    fn prefix_matching_requires_separator() {
        assert!(matches_prefix("/profile", "/profile"));
        assert!(matches_prefix("/profile/edit", "/profile"));
        assert!(!matches_prefix("/profileedit", "/profile"));
        assert!(!matches_prefix("/prof", "/profile"));
    }

    #[test]
    fn identity_headers_carry_the_session_subject() {
        let context = AuthContext {
            user_id: Uuid::new_v4(),
            email: "athlete@example.com".to_string(),
            display_name: "Athlete".to_string(),
        };

        let mut headers = HeaderMap::new();
        attach_identity_headers(&mut headers, &context);

        assert_eq!(
            headers.get(USER_ID_HEADER).unwrap().to_str().unwrap(),
            context.user_id.to_string()
        );
        assert_eq!(headers.get(USER_EMAIL_HEADER).unwrap(), "athlete@example.com");
        assert_eq!(headers.get(USER_NAME_HEADER).unwrap(), "Athlete");
    }

    #[test]
    fn unencodable_identity_values_are_skipped() {
        let context = AuthContext {
            user_id: Uuid::new_v4(),
            email: "athlete@example.com".to_string(),
            display_name: "line\nbreak".to_string(),
        };

        let mut headers = HeaderMap::new();
        attach_identity_headers(&mut headers, &context);

        assert!(headers.get(USER_ID_HEADER).is_some());
        assert!(headers.get(USER_NAME_HEADER).is_none());
    }

    #[test]
    fn inbound_identity_headers_never_survive() {
        let context = AuthContext {
            user_id: Uuid::new_v4(),
            email: "athlete@example.com".to_string(),
            display_name: "line\nbreak".to_string(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, "forged-id".parse().unwrap());
        headers.insert(USER_NAME_HEADER, "forged-name".parse().unwrap());
        attach_identity_headers(&mut headers, &context);

        // 正常字段被会话值覆盖
        assert_eq!(
            headers.get(USER_ID_HEADER).unwrap().to_str().unwrap(),
            context.user_id.to_string()
        );
        // 编码失败跳过的字段也不能留下入站值
        assert!(headers.get(USER_NAME_HEADER).is_none());
    }
}
