use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Patch;

/// Geometry variant of a shape annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "shape_type", rename_all = "lowercase")]
pub enum ShapeKind {
    Polygon,
    Polyline,
    Circle,
    Rectangle,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Polygon => "polygon",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Circle => "circle",
            ShapeKind::Rectangle => "rectangle",
        }
    }
}

/// Shape annotation.
///
/// `coordinates` and `style` are caller-defined JSON text. They are stored and
/// returned verbatim and never parsed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shape {
    pub id: i64,
    pub user_id: i64,
    pub shape_type: ShapeKind,
    pub coordinates: String,
    pub style: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateShapeInput {
    pub user_id: i64,
    pub shape_type: ShapeKind,
    pub coordinates: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial shape update. Omitted fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateShapeInput {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<String>,
}

impl UpdateShapeInput {
    /// Apply the present fields onto `shape`. Does not touch `updated_at`.
    pub fn apply_to(&self, shape: &mut Shape) {
        if let Some(coordinates) = &self.coordinates {
            shape.coordinates = coordinates.clone();
        }
        if let Some(style) = &self.style {
            shape.style = style.clone();
        }
        self.name.clone().apply_to(&mut shape.name);
        self.description.clone().apply_to(&mut shape.description);
    }
}
