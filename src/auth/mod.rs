//! 认证模块
//! 口令散列、会话令牌签发与校验、Cookie 读写、请求门禁

pub mod cookie;
pub mod gate;
pub mod jwt;
pub mod password;
