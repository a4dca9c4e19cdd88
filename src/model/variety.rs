//! Language varieties and their GeoJSON projection

use super::WithGid;
use serde::{Deserialize, Serialize};

/// A language or dialect sampled by a source dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variety {
    /// Identifier within the source dataset
    pub id: String,
    /// Source dataset
    pub source: String,
    /// Display name
    pub name: String,
    /// Glottolog code, if the variety is mapped
    pub glottocode: Option<String>,
    /// Language family
    pub family: String,
    /// Glottolog macroarea
    pub macroarea: String,
    /// Longitude in decimal degrees
    pub longitude: Option<f64>,
    /// Latitude in decimal degrees
    pub latitude: Option<f64>,
}

impl WithGid for Variety {
    fn id(&self) -> &str {
        &self.id
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// GeoJSON point geometry, `[longitude, latitude]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Point")]
pub struct Point {
    /// Longitude, latitude
    pub coordinates: [f64; 2],
}

/// Properties attached to a variety feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarietyProperties {
    /// Variety name
    pub name: String,
    /// Same as `name`; kept for map tooling that keys on it
    pub language: String,
    /// Language family
    pub family: String,
    /// Macroarea
    pub area: String,
    /// Variety kind, always `"std"`
    pub variety: String,
    /// Global identifier of the variety
    pub key: String,
    /// Glottolog code
    pub glottocode: Option<String>,
    /// Source dataset
    pub source: String,
    /// Longitude
    pub lon: Option<f64>,
    /// Latitude
    pub lat: Option<f64>,
}

/// GeoJSON feature; `geometry` is `null` for unlocated varieties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    /// Point location, if known
    pub geometry: Option<Point>,
    /// Descriptive properties
    pub properties: VarietyProperties,
}

impl Variety {
    /// Point geometry; requires both coordinates
    #[must_use]
    pub fn point(&self) -> Option<Point> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Some(Point {
                coordinates: [lon, lat],
            }),
            _ => None,
        }
    }

    /// Project to a GeoJSON feature
    #[must_use]
    pub fn as_geojson(&self) -> Feature {
        Feature {
            geometry: self.point(),
            properties: VarietyProperties {
                name: self.name.clone(),
                language: self.name.clone(),
                family: self.family.clone(),
                area: self.macroarea.clone(),
                variety: "std".to_string(),
                key: self.gid(),
                glottocode: self.glottocode.clone(),
                source: self.source.clone(),
                lon: self.longitude,
                lat: self.latitude,
            },
        }
    }
}
