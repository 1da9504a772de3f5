//! Database repository layer
//!
//! Storage access goes through the `UserStore` and `ProgramStore` traits so
//! services and tests can swap the Postgres implementations out.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::program::{CreateProgramRequest, Program};
use crate::models::user::{NewUser, ProfileUpdate, User};

pub mod program_repo;
pub mod user_repo;

pub use program_repo::PgProgramStore;
pub use user_repo::PgUserStore;

/// Account record store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find an account by email. Matching is case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Find an account by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Insert a new account. A duplicate email fails with `Conflict`.
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Apply a partial profile update, returning the fresh row.
    /// `None` means the account does not exist.
    async fn update_fields(&self, id: Uuid, update: ProfileUpdate)
        -> Result<Option<User>, AppError>;
}

/// Workout program store, every operation is scoped to its owner
#[async_trait]
pub trait ProgramStore: Send + Sync {
    async fn insert(&self, user_id: Uuid, req: CreateProgramRequest) -> Result<Program, AppError>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Program>, AppError>;

    /// Returns `None` when the program does not exist or belongs to someone else
    async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Program>, AppError>;

    /// Returns false when nothing was deleted
    async fn delete_for_user(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}
