//! Output feature collection (GeoJSON shape).
//!
//! Positions are written latitude-first (`[lat, lon]`) for compatibility with
//! existing consumers of this tool's output, unlike the usual GeoJSON order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::AcquisitionTime;

/// `"type": "FeatureCollection"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionType {
    #[default]
    FeatureCollection,
}

/// `"type": "Feature"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

/// Collection of ranked fire features
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: FeatureCollectionType,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// One feature per cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub geometry: Geometry,
    pub properties: FireProperties,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: FireProperties) -> Self {
        Self {
            kind: FeatureType::Feature,
            geometry,
            properties,
        }
    }
}

/// Geometry, tagged by GeoJSON `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Positions are `[latitude, longitude]`
    MultiPoint { coordinates: Vec<[f64; 2]> },
}

impl Geometry {
    /// Single-position multipoint
    pub fn point(latitude: f64, longitude: f64) -> Self {
        Self::MultiPoint {
            coordinates: vec![[latitude, longitude]],
        }
    }
}

/// Feature properties, taken from the cluster's earliest member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct FireProperties {
    pub latitude: f64,
    pub longitude: f64,
    /// `YYYY-MM-DD`
    pub acq_date: NaiveDate,
    /// `HHMM`
    pub acq_time: AcquisitionTime,
}
