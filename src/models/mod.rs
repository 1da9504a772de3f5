//! 数据模型模块
//! 用户账户、认证请求与训练计划模型

pub mod auth;
pub mod program;
pub mod user;
