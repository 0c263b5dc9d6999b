use super::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::warn;

/// A position as `(lon, lat)`, or `(x, y)` for projected data.
pub type Coordinate = (f64, f64);
pub type Ring = Vec<Coordinate>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString { coordinates: Ring },
    MultiLineString { coordinates: Vec<Ring> },
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
}

impl Geometry {
    /// Values of `type` that map onto a variant.
    pub const TYPES: [&'static str; 4] =
        ["LineString", "MultiLineString", "Polygon", "MultiPolygon"];

    /// All rings and lines of the geometry in document order.
    pub fn rings(&self) -> Vec<&Ring> {
        match self {
            Geometry::LineString { coordinates } => vec![coordinates],
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter().collect()
            }
            Geometry::MultiPolygon { coordinates } => coordinates.iter().flatten().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::LineString { coordinates } => coordinates.is_empty(),
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.is_empty()
            }
            Geometry::MultiPolygon { coordinates } => coordinates.is_empty(),
        }
    }

    /// Whether the rings describe areas rather than open lines.
    pub fn is_areal(&self) -> bool {
        matches!(
            self,
            Geometry::Polygon { .. } | Geometry::MultiPolygon { .. }
        )
    }
}

/// A feature's geometry as found in the document.
///
/// Geometries whose declared type is not one of [`Geometry`]'s variants, or
/// whose coordinates don't have the shape their type demands, are carried
/// as raw JSON and written back untouched.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum FeatureGeometry {
    Known(Geometry),
    Other(Value),
}

impl From<Geometry> for FeatureGeometry {
    fn from(geometry: Geometry) -> Self {
        FeatureGeometry::Known(geometry)
    }
}

impl FeatureGeometry {
    pub fn known(&self) -> Option<&Geometry> {
        match self {
            FeatureGeometry::Known(geometry) => Some(geometry),
            FeatureGeometry::Other(_) => None,
        }
    }

    /// The declared `type` of a raw geometry if it names one of
    /// [`Geometry::TYPES`], i.e. the coordinates didn't fit.
    pub fn unreadable_type(&self) -> Option<&str> {
        match self {
            FeatureGeometry::Other(value) => {
                let kind = value.get("type")?.as_str()?;
                Geometry::TYPES.contains(&kind).then(|| kind)
            }
            FeatureGeometry::Known(_) => None,
        }
    }
}

fn feature_kind() -> String {
    "Feature".into()
}

fn collection_kind() -> String {
    "FeatureCollection".into()
}

// properties that aren't an object are read as absent
fn object_or_none<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(Some(map)),
        _ => Ok(None),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_kind")]
    pub kind: String,
    #[serde(default, deserialize_with = "object_or_none")]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Option<FeatureGeometry>,
    /// Members like `id` or `bbox`, kept verbatim.
    #[serde(flatten)]
    pub foreign: Map<String, Value>,
}

impl Feature {
    pub fn new(properties: Option<Map<String, Value>>, geometry: Option<FeatureGeometry>) -> Self {
        Feature {
            kind: feature_kind(),
            properties,
            geometry,
            foreign: Map::new(),
        }
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(key)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_kind")]
    pub kind: String,
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub foreign: Map<String, Value>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureCollection {
            kind: collection_kind(),
            features,
            foreign: Map::new(),
        }
    }

    /// Build a collection from a parsed JSON document.
    ///
    /// A document without a `features` array is rejected as a whole.
    /// Elements of the array that don't read as a feature are dropped one
    /// by one, the rest of the document is kept.
    pub fn from_value(mut value: Value) -> Result<Self> {
        let items = match value.get_mut("features") {
            Some(Value::Array(items)) => std::mem::take(items),
            Some(_) => return Err(Error::InvalidInput("features is not an array".into())),
            None => return Err(Error::InvalidInput("missing features".into())),
        };
        let mut collection: FeatureCollection =
            serde_json::from_value(value).map_err(|err| Error::InvalidInput(err.to_string()))?;
        collection.features = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(feature) => Some(feature),
                Err(err) => {
                    warn!(index, error = %err, "dropping malformed feature");
                    None
                }
            })
            .collect();
        Ok(collection)
    }
}

impl FromStr for FeatureCollection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_value(value)
    }
}

pub trait VertexCount {
    fn vertex_count(&self) -> usize;
}

impl VertexCount for Geometry {
    fn vertex_count(&self) -> usize {
        self.rings().iter().map(|ring| ring.len()).sum()
    }
}

impl VertexCount for Feature {
    fn vertex_count(&self) -> usize {
        match &self.geometry {
            Some(FeatureGeometry::Known(geometry)) => geometry.vertex_count(),
            _ => 0,
        }
    }
}

impl VertexCount for FeatureCollection {
    fn vertex_count(&self) -> usize {
        self.features.iter().map(Feature::vertex_count).sum()
    }
}
