use serde::{Deserialize, Serialize};

use crate::constants::ERR_INCOMPLETE_BOUNDS;
use crate::error::{AppError, Result};

/// Axis-aligned bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    /// Inclusive on every edge. No antimeridian wrap: `west > east` matches nothing.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.south <= latitude
            && latitude <= self.north
            && self.west <= longitude
            && longitude <= self.east
    }
}

/// Optional predicates for listing markers or shapes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

impl AnnotationFilter {
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Option<Bounds>) -> Self {
        self.bounds = bounds;
        self
    }
}

/// Flat query-string form of [`AnnotationFilter`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub north: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub south: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub east: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub west: Option<f64>,
}

impl From<AnnotationFilter> for AnnotationQuery {
    fn from(filter: AnnotationFilter) -> Self {
        Self {
            user_id: filter.user_id,
            north: filter.bounds.map(|b| b.north),
            south: filter.bounds.map(|b| b.south),
            east: filter.bounds.map(|b| b.east),
            west: filter.bounds.map(|b| b.west),
        }
    }
}

impl TryFrom<AnnotationQuery> for AnnotationFilter {
    type Error = AppError;

    /// A box needs all four edges; a partial box is rejected
    fn try_from(query: AnnotationQuery) -> Result<Self> {
        let bounds = match (query.north, query.south, query.east, query.west) {
            (Some(north), Some(south), Some(east), Some(west)) => Some(Bounds {
                north,
                south,
                east,
                west,
            }),
            (None, None, None, None) => None,
            _ => return Err(AppError::validation(ERR_INCOMPLETE_BOUNDS)),
        };

        Ok(AnnotationFilter {
            user_id: query.user_id,
            bounds,
        })
    }
}
