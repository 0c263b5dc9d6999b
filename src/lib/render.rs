//! Mapping of geographic coordinates into a fixed display box.
//!
//! This is a plain affine fit of a lon/lat rectangle onto a pixel viewport
//! (y pointing down), enough to draw boundaries as SVG paths.

use super::geojson::{Coordinate, Feature, FeatureCollection, FeatureGeometry, Geometry};
use super::{Error, Result};
use geo::prelude::*;
use geo_types::LineString;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub e: f64,
    pub n: f64,
    pub s: f64,
    pub w: f64,
}

/// Longitude 123°E to 146°E, latitude 24°N to 46°N.
pub const JAPAN: Bounds = Bounds {
    e: 146.0,
    n: 46.0,
    s: 24.0,
    w: 123.0,
};

fn ring_bounds(ring: &[Coordinate]) -> Option<Bounds> {
    let line_string: LineString<f64> = ring.to_vec().into();
    let rect = line_string.bounding_rect()?;
    Some(Bounds {
        e: rect.max().x,
        n: rect.max().y,
        s: rect.min().y,
        w: rect.min().x,
    })
}

impl Bounds {
    /// Bounding box of all rings in the collection.
    pub fn of(collection: &FeatureCollection) -> Option<Bounds> {
        collection
            .features
            .iter()
            .filter_map(|feature| feature.geometry.as_ref()?.known())
            .flat_map(Geometry::rings)
            .filter_map(|ring| ring_bounds(ring))
            .fold1(|a, b| a.union(&b))
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            e: self.e.max(other.e),
            n: self.n.max(other.n),
            s: self.s.min(other.s),
            w: self.w.min(other.w),
        }
    }

    pub fn width(&self) -> f64 {
        self.e - self.w
    }

    pub fn height(&self) -> f64 {
        self.n - self.s
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 450.0,
            height: 500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    bounds: Bounds,
    viewport: Viewport,
}

impl Projection {
    pub fn new(bounds: Bounds, viewport: Viewport) -> Result<Self> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !usable(bounds.width()) || !usable(bounds.height()) {
            return Err(Error::InvalidInput(format!("degenerate bounds {:?}", bounds)));
        }
        if !usable(viewport.width) || !usable(viewport.height) {
            return Err(Error::InvalidInput(format!("empty viewport {:?}", viewport)));
        }
        Ok(Projection { bounds, viewport })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn project(&self, (lon, lat): Coordinate) -> (f64, f64) {
        let x = (lon - self.bounds.w) / self.bounds.width() * self.viewport.width;
        let y = self.viewport.height
            - (lat - self.bounds.s) / self.bounds.height() * self.viewport.height;
        (x, y)
    }

    /// Path commands for one ring, `Z`-terminated when `close` is set.
    pub fn ring_to_path(&self, ring: &[Coordinate], close: bool) -> String {
        if ring.is_empty() {
            return String::new();
        }
        let mut path = ring
            .iter()
            .enumerate()
            .map(|(idx, coordinate)| {
                let (x, y) = self.project(*coordinate);
                let command = if idx == 0 { 'M' } else { 'L' };
                format!("{}{:.2},{:.2}", command, x, y)
            })
            .join(" ");
        if close {
            path.push_str(" Z");
        }
        path
    }

    /// Path commands for every ring of a geometry, one subpath each.
    pub fn geometry_to_path(&self, geometry: &Geometry) -> String {
        let close = geometry.is_areal();
        geometry
            .rings()
            .into_iter()
            .filter(|ring| !ring.is_empty())
            .map(|ring| self.ring_to_path(ring, close))
            .join(" ")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn label(feature: &Feature, label_key: &str) -> Option<String> {
    match feature.property(label_key)? {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Write an SVG document with one `<path>` per drawable feature.
pub fn write_svg(
    collection: &FeatureCollection,
    projection: &Projection,
    label_key: &str,
    writer: &mut dyn Write,
) -> Result<()> {
    let Viewport { width, height } = projection.viewport();
    writeln!(
        writer,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    )?;
    for feature in collection.features.iter() {
        let geometry = match feature.geometry.as_ref().and_then(FeatureGeometry::known) {
            Some(geometry) => geometry,
            None => continue,
        };
        let path = projection.geometry_to_path(geometry);
        if path.is_empty() {
            continue;
        }
        let fill = if geometry.is_areal() { "#ddd" } else { "none" };
        match label(feature, label_key) {
            Some(text) => writeln!(
                writer,
                r##"  <path d="{}" data-name="{}" fill="{}" stroke="#333" fill-rule="evenodd"/>"##,
                path,
                escape(&text),
                fill
            )?,
            None => writeln!(
                writer,
                r##"  <path d="{}" fill="{}" stroke="#333" fill-rule="evenodd"/>"##,
                path, fill
            )?,
        }
    }
    writeln!(writer, "</svg>")?;
    Ok(())
}
