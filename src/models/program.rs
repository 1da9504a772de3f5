//! Workout program models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// Workout program owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Program {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// strength, cardio, mobility...
    pub program_type: String,
    /// Free-form plan body (days, exercises, sets)
    pub content: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create program request
#[derive(Debug, Deserialize, validator::Validate)]
pub struct CreateProgramRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub program_type: String,
    pub content: serde_json::Value,
}

/// Program response
#[derive(Debug, Serialize, Deserialize)]
pub struct ProgramResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub program_type: String,
    pub content: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Program> for ProgramResponse {
    fn from(program: Program) -> Self {
        Self {
            id: program.id,
            user_id: program.user_id,
            name: program.name,
            program_type: program.program_type,
            content: program.content.0,
            created_at: program.created_at,
            updated_at: program.updated_at,
        }
    }
}
