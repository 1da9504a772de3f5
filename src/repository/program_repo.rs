//! Program repository (数据库访问层)
//! 所有查询都带 user_id 条件, 他人的计划等同于不存在

use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::program::{CreateProgramRequest, Program};
use crate::repository::ProgramStore;

pub struct PgProgramStore {
    db: PgPool,
}

impl PgProgramStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProgramStore for PgProgramStore {
    /// 创建训练计划
    async fn insert(&self, user_id: Uuid, req: CreateProgramRequest) -> Result<Program, AppError> {
        let program = sqlx::query_as::<_, Program>(
            r#"
            INSERT INTO programs (user_id, name, program_type, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&req.name)
        .bind(&req.program_type)
        .bind(Json(&req.content))
        .fetch_one(&self.db)
        .await?;

        Ok(program)
    }

    /// 列出用户的全部计划, 新的在前
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Program>, AppError> {
        let programs = sqlx::query_as::<_, Program>(
            "SELECT * FROM programs WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(programs)
    }

    /// 查找用户名下的单个计划
    async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Program>, AppError> {
        let program = sqlx::query_as::<_, Program>(
            "SELECT * FROM programs WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(program)
    }

    /// 删除用户名下的单个计划
    async fn delete_for_user(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM programs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
