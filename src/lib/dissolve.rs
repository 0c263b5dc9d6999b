use super::geojson::{Feature, FeatureCollection, FeatureGeometry, Geometry, Ring};
use itertools::Itertools;
use serde_json::{Map, Value};
use smartstring::alias::String;
use tracing::warn;

pub type GroupKey = String;

/// Property fields holding the region name, in order of preference.
pub const DEFAULT_KEY_FIELDS: [&str; 2] = ["N03_001", "name"];

/// Property under which a dissolved feature stores its region name.
pub const DEFAULT_OUTPUT_KEY: &str = "name";

/// Build a key accessor that reads the first usable of `fields`.
///
/// Non-empty strings are used as they are, numbers in their JSON
/// representation. Other values are skipped.
pub fn region_key<S: AsRef<str>>(fields: &[S]) -> impl Fn(&Feature) -> Option<GroupKey> + '_ {
    move |feature: &Feature| {
        let properties = feature.properties.as_ref()?;
        fields
            .iter()
            .find_map(|field| match properties.get(field.as_ref())? {
                Value::String(name) if !name.is_empty() => Some(name.as_str().into()),
                Value::Number(number) => Some(number.to_string().as_str().into()),
                _ => None,
            })
    }
}

fn polygons(feature: &Feature) -> Vec<Vec<Ring>> {
    match feature.geometry.as_ref().and_then(FeatureGeometry::known) {
        Some(Geometry::MultiPolygon { coordinates }) => coordinates.clone(),
        Some(Geometry::Polygon { coordinates }) => vec![coordinates.clone()],
        _ => vec![],
    }
}

fn merge(key: &GroupKey, members: &[&Feature], output_key: &str) -> Feature {
    let coordinates = members.iter().flat_map(|feature| polygons(feature)).collect();
    let mut properties = Map::new();
    properties.insert(output_key.into(), Value::String(key.to_string()));
    let geometry = Geometry::MultiPolygon { coordinates };
    Feature::new(Some(properties), Some(geometry.into()))
}

/// Merge features sharing a key into one `MultiPolygon` feature per key.
///
/// Groups appear in the order their first member appears in the input,
/// polygons within a group keep the order of their features. Features without
/// a key are dropped. The merged feature only carries the key, stored under
/// `output_key`. Boundaries are concatenated, not welded.
pub fn dissolve_with_key<F>(
    collection: &FeatureCollection,
    key_of: F,
    output_key: &str,
) -> FeatureCollection
where
    F: Fn(&Feature) -> Option<GroupKey>,
{
    let keyed: Vec<(GroupKey, &Feature)> = collection
        .features
        .iter()
        .filter_map(|feature| Some((key_of(feature)?, feature)))
        .collect();

    let dropped = collection.features.len() - keyed.len();
    if dropped > 0 {
        warn!(dropped, "dropping features without a region key");
    }

    let order: Vec<GroupKey> = keyed.iter().map(|(key, _)| key.clone()).unique().collect();
    let mut groups = keyed.into_iter().into_group_map();

    let features = order
        .iter()
        .filter_map(|key| {
            let members = groups.remove(key)?;
            Some(merge(key, &members, output_key))
        })
        .collect();

    let mut dissolved = FeatureCollection::new(features);
    dissolved.foreign = collection.foreign.clone();
    dissolved
}

/// [`dissolve_with_key`] storing the key under [`DEFAULT_OUTPUT_KEY`].
pub fn dissolve<F>(collection: &FeatureCollection, key_of: F) -> FeatureCollection
where
    F: Fn(&Feature) -> Option<GroupKey>,
{
    dissolve_with_key(collection, key_of, DEFAULT_OUTPUT_KEY)
}
