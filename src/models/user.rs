use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{validate, Patch};
use crate::error::Result;

/// Identity owning annotations and one viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl CreateUserInput {
    pub fn validate(&self) -> Result<()> {
        validate::username(&self.username)?;
        validate::email(&self.email)?;
        if let Some(url) = &self.avatar_url {
            validate::avatar_url(url)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateUserInput {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub avatar_url: Patch<String>,
}

impl UpdateUserInput {
    pub fn validate(&self) -> Result<()> {
        if let Some(username) = &self.username {
            validate::username(username)?;
        }
        if let Some(email) = &self.email {
            validate::email(email)?;
        }
        if let Patch::Value(url) = &self.avatar_url {
            validate::avatar_url(url)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        self.avatar_url.clone().apply_to(&mut user.avatar_url);
    }
}
