use crate::constants::{DEMO_EMAIL, DEMO_USERNAME, DEMO_USER_ID};
use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{CreateUserInput, UpdateUserInput, User};

/// User lookup and lifecycle
#[derive(Clone)]
pub struct UserDirectory {
    db: Db,
}

impl UserDirectory {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Make sure the demo identity exists
    pub async fn seed_demo_user(&self) -> Result<()> {
        self.db
            .ensure_user(DEMO_USER_ID, DEMO_USERNAME, DEMO_EMAIL)
            .await?;
        tracing::info!(user_id = DEMO_USER_ID, "Demo user available");
        Ok(())
    }

    pub async fn create_user(&self, input: CreateUserInput) -> Result<User> {
        input.validate()?;

        let user = self.db.insert_user(&input).await?;
        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.db.get_user(id).await
    }

    pub async fn update_user(&self, input: UpdateUserInput) -> Result<User> {
        input.validate()?;

        self.db
            .update_user(&input)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with id {} not found", input.id)))
    }

    /// Removes the user together with everything they own
    pub async fn delete_user(&self, id: i64) -> Result<bool> {
        let deleted = self.db.delete_user(id).await?;
        if deleted {
            tracing::info!(user_id = id, "User deleted");
        }
        Ok(deleted)
    }
}
