use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validate;
use crate::error::Result;

/// Tile source family a basemap is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasemapProvider {
    Google,
    Arcgis,
    Openstreetmap,
}

/// Fixed set of selectable basemaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "basemap_type", rename_all = "snake_case")]
pub enum Basemap {
    Satellite,
    ArcgisImagery,
    ArcgisImageryHybrid,
    ArcgisStreets,
    ArcgisTopographic,
    ArcgisNavigation,
    ArcgisStreetsNight,
    ArcgisTerrainLabels,
    #[default]
    OsmStandard,
    OsmCyclosm,
    OsmCycleMap,
    OsmTransportMap,
    OsmTracestrackTopo,
    OsmHumanitarian,
    OsmShortbread,
}

impl Basemap {
    pub fn provider(&self) -> BasemapProvider {
        match self {
            Basemap::Satellite => BasemapProvider::Google,
            Basemap::ArcgisImagery
            | Basemap::ArcgisImageryHybrid
            | Basemap::ArcgisStreets
            | Basemap::ArcgisTopographic
            | Basemap::ArcgisNavigation
            | Basemap::ArcgisStreetsNight
            | Basemap::ArcgisTerrainLabels => BasemapProvider::Arcgis,
            Basemap::OsmStandard
            | Basemap::OsmCyclosm
            | Basemap::OsmCycleMap
            | Basemap::OsmTransportMap
            | Basemap::OsmTracestrackTopo
            | Basemap::OsmHumanitarian
            | Basemap::OsmShortbread => BasemapProvider::Openstreetmap,
        }
    }
}

/// Last-seen map position for a user. At most one per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ViewportState {
    pub id: i64,
    pub user_id: i64,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom_level: i32,
    pub active_basemap: Basemap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaveViewportInput {
    pub user_id: i64,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom_level: i32,
    pub active_basemap: Basemap,
}

impl SaveViewportInput {
    pub fn validate(&self) -> Result<()> {
        validate::latitude(self.center_latitude)?;
        validate::longitude(self.center_longitude)?;
        validate::zoom(self.zoom_level)?;
        Ok(())
    }
}
