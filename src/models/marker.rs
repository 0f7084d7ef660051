use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{validate, Patch};
use crate::error::Result;

/// Point annotation owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Marker {
    pub id: i64,
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    pub description: Option<String>,
    /// Hex color, `#FF0000` unless given
    pub color: String,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMarkerInput {
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl CreateMarkerInput {
    pub fn validate(&self) -> Result<()> {
        validate::latitude(self.latitude)?;
        validate::longitude(self.longitude)?;
        validate::title(&self.title)?;
        if let Some(color) = &self.color {
            validate::color(color)?;
        }
        Ok(())
    }
}

/// Partial marker update. Omitted fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateMarkerInput {
    /// Taken from the route path when omitted from the body
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub icon: Patch<String>,
}

impl UpdateMarkerInput {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate::title(title)?;
        }
        if let Some(color) = &self.color {
            validate::color(color)?;
        }
        Ok(())
    }

    /// Apply the present fields onto `marker`. Does not touch `updated_at`.
    pub fn apply_to(&self, marker: &mut Marker) {
        if let Some(title) = &self.title {
            marker.title = title.clone();
        }
        self.description.clone().apply_to(&mut marker.description);
        if let Some(color) = &self.color {
            marker.color = color.clone();
        }
        self.icon.clone().apply_to(&mut marker.icon);
    }
}
