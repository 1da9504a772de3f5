//! 认证服务：注册、登录、当前用户查询
//!
//! 登录失败一律返回同一个错误, 响应不暴露邮箱是否已注册。

use crate::{
    auth::jwt::JwtService,
    auth::password::PasswordHasher,
    config::SecurityConfig,
    error::AppError,
    models::auth::{LoginRequest, RegisterRequest},
    models::user::{NewUser, User},
    repository::UserStore,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 注册或登录成功的结果, token 由 handler 写进 Cookie
pub struct AuthOutcome {
    pub user: User,
    pub token: String,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_service: Arc<JwtService>,
    hasher: PasswordHasher,
    security: SecurityConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        jwt_service: Arc<JwtService>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            users,
            jwt_service,
            hasher: PasswordHasher::new(),
            security,
        }
    }

    /// 用户注册
    pub async fn register(&self, mut req: RegisterRequest) -> Result<AuthOutcome, AppError> {
        // 昵称先修剪再参与校验, 全空白等同于缺失
        req.display_name = req.display_name.trim().to_string();
        req.validate()?;
        PasswordHasher::validate_password_policy(&req.password, &self.security)?;

        let email = normalize_email(&req.email);

        // 先查重, 并发竞争下的漏网由唯一索引兜底
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = self.hasher.hash(&req.password)?;

        let user = self
            .users
            .insert(NewUser {
                email,
                display_name: req.display_name,
                password_hash,
            })
            .await?;

        let token = self.jwt_service.issue(&user)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthOutcome { user, token })
    }

    /// 用户登录
    pub async fn login(&self, req: LoginRequest) -> Result<AuthOutcome, AppError> {
        req.validate()?;

        let email = normalize_email(&req.email);

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login rejected: unknown email");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(&req.password, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.jwt_service.issue(&user)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthOutcome { user, token })
    }

    /// 按会话主体读取账户, 账户已不存在则视为会话失效
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

/// 邮箱归一化, 比较和存储都用小写形式
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization_lowercases_and_trims() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
        assert_eq!(normalize_email("a@b.com"), "a@b.com");
    }
}
