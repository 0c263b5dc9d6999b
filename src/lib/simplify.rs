//! Douglas-Peucker vertex reduction for rings, geometries and collections.
//!
//! Distances are planar Euclidean on the raw coordinate values, so the
//! tolerance has to be given in the unit of the data (degrees for WGS84
//! input, meters for projected input).

use super::geojson::{Coordinate, Feature, FeatureCollection, FeatureGeometry, Geometry, Ring};
use super::{Error, Result};
use rayon::prelude::*;
use serde_json::Value;
use tracing::debug;

fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Distance from `point` to the segment `start`-`end`.
///
/// The projection is clamped to the segment, a zero-length segment
/// degrades to the distance between two points.
fn segment_distance(point: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return distance(point, start);
    }

    let dot = (point.0 - start.0) * dx + (point.1 - start.1) * dy;
    let t = (dot / length_sq).max(0.0).min(1.0);
    distance(point, (start.0 + t * dx, start.1 + t * dy))
}

/// Index and distance of the interior point farthest from the chord
/// `points[start]`-`points[end]`. Ties go to the first point.
fn farthest_point(points: &[Coordinate], start: usize, end: usize) -> (usize, f64) {
    let first = points[start];
    let last = points[end];
    let mut farthest = (start, 0.0);
    for (idx, point) in points.iter().enumerate().take(end).skip(start + 1) {
        let distance = segment_distance(*point, first, last);
        if distance > farthest.1 {
            farthest = (idx, distance);
        }
    }
    farthest
}

/// Reduce a ring or line with the Douglas-Peucker algorithm.
///
/// Interior points are dropped as long as they lie within `tolerance` of the
/// chord that replaces them. Both endpoints are always kept and inputs of two
/// points or less come back unchanged. A negative or NaN tolerance is treated
/// as zero, which drops nothing but exactly collinear points.
///
/// Pending ranges live on an explicit stack, so the depth of the subdivision
/// is not bounded by the call stack.
///
/// # Example
///
/// ```
/// use boundary_simplify::simplify::simplify_ring;
///
/// let ring = vec![(0., 0.), (1., 0.01), (2., 0.), (3., 5.), (4., 0.)];
/// let simplified = simplify_ring(&ring, 0.1);
/// assert_eq!(simplified, vec![(0., 0.), (2., 0.), (3., 5.), (4., 0.)]);
/// ```
pub fn simplify_ring(points: &[Coordinate], tolerance: f64) -> Ring {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let tolerance = tolerance.max(0.0);
    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut ranges = vec![(0, last)];
    while let Some((start, end)) = ranges.pop() {
        if end - start < 2 {
            continue;
        }
        let (idx, distance) = farthest_point(points, start, end);
        if distance > tolerance {
            keep[idx] = true;
            ranges.push((idx, end));
            ranges.push((start, idx));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(point, kept)| if kept { Some(*point) } else { None })
        .collect()
}

fn simplify_rings(rings: &[Ring], tolerance: f64) -> Vec<Ring> {
    rings
        .iter()
        .map(|ring| simplify_ring(ring, tolerance))
        .collect()
}

pub trait Simplify: Sized {
    fn simplify(&self, tolerance: f64) -> Result<Self>;
}

impl Simplify for Geometry {
    /// Every ring is reduced on its own, polygon holes included.
    fn simplify(&self, tolerance: f64) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::EmptyGeometry);
        }
        let geometry = match self {
            Geometry::LineString { coordinates } => Geometry::LineString {
                coordinates: simplify_ring(coordinates, tolerance),
            },
            Geometry::MultiLineString { coordinates } => Geometry::MultiLineString {
                coordinates: simplify_rings(coordinates, tolerance),
            },
            Geometry::Polygon { coordinates } => Geometry::Polygon {
                coordinates: simplify_rings(coordinates, tolerance),
            },
            Geometry::MultiPolygon { coordinates } => Geometry::MultiPolygon {
                coordinates: coordinates
                    .iter()
                    .map(|polygon| simplify_rings(polygon, tolerance))
                    .collect(),
            },
        };
        Ok(geometry)
    }
}

impl Simplify for FeatureGeometry {
    /// Raw geometries pass through, unless they declare a supported type
    /// whose coordinates are missing or could not be read.
    fn simplify(&self, tolerance: f64) -> Result<Self> {
        match self {
            FeatureGeometry::Known(geometry) => Ok(geometry.simplify(tolerance)?.into()),
            FeatureGeometry::Other(value) => match self.unreadable_type() {
                Some(kind) => match value.get("coordinates") {
                    None | Some(Value::Null) => Err(Error::EmptyGeometry),
                    Some(_) => Err(Error::UnreadableCoordinates(kind.into())),
                },
                None => Ok(self.clone()),
            },
        }
    }
}

pub fn simplify_geometry(geometry: &Geometry, tolerance: f64) -> Result<Geometry> {
    geometry.simplify(tolerance)
}

pub struct Simplified {
    pub collection: FeatureCollection,
    /// Features left as they were because their geometry had no usable
    /// coordinates.
    pub skipped: usize,
}

fn simplify_feature(feature: &Feature, tolerance: f64) -> (Feature, bool) {
    let geometry = match &feature.geometry {
        Some(geometry) => geometry,
        None => return (feature.clone(), false),
    };
    match geometry.simplify(tolerance) {
        Ok(geometry) => {
            let simplified = Feature {
                geometry: Some(geometry),
                ..feature.clone()
            };
            (simplified, false)
        }
        Err(err) => {
            debug!(error = %err, "leaving feature unchanged");
            (feature.clone(), true)
        }
    }
}

/// Simplify every feature of a collection, on the rayon pool if `parallel`
/// is set. Order and all non-geometry members are preserved.
pub fn simplify_collection_with(
    collection: &FeatureCollection,
    tolerance: f64,
    parallel: bool,
) -> Simplified {
    let results: Vec<(Feature, bool)> = if parallel {
        collection
            .features
            .par_iter()
            .map(|feature| simplify_feature(feature, tolerance))
            .collect()
    } else {
        collection
            .features
            .iter()
            .map(|feature| simplify_feature(feature, tolerance))
            .collect()
    };

    let skipped = results.iter().filter(|(_, skipped)| *skipped).count();
    let features = results.into_iter().map(|(feature, _)| feature).collect();
    Simplified {
        collection: FeatureCollection {
            kind: collection.kind.clone(),
            features,
            foreign: collection.foreign.clone(),
        },
        skipped,
    }
}

pub fn simplify_collection(collection: &FeatureCollection, tolerance: f64) -> FeatureCollection {
    simplify_collection_with(collection, tolerance, false).collection
}
