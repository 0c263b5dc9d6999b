//! Dissolve and simplify administrative boundary GeoJSON.
//!
//! A document flows through two stages: the [dissolve] stage merges all
//! features of a region into one `MultiPolygon` feature, and the [simplify]
//! stage reduces the vertices of every ring with Douglas-Peucker under a
//! planar distance tolerance. Both stages build new values and leave their
//! input untouched.

use std::io::{Read, Write};
use tracing::info;

pub mod config;
pub mod dissolve;
pub mod geojson;
pub mod output;
pub mod render;
pub mod report;
pub mod simplify;

pub use config::Config;
pub use geojson::{Coordinate, Feature, FeatureCollection, FeatureGeometry, Geometry, Ring};
pub use output::{Format, Output};
pub use report::Report;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("geometry has no coordinates")]
    EmptyGeometry,

    #[error("{0} coordinates are not 2D positions")]
    UnreadableCoordinates(String),

    #[error("invalid tolerance: {0}")]
    InvalidTolerance(f64),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub struct Processed {
    pub collection: FeatureCollection,
    pub report: Report,
}

/// Run the configured pipeline on a parsed collection.
///
/// With `config.dissolve` set, features are grouped by region first and the
/// merged features are simplified; otherwise every feature is simplified on
/// its own.
pub fn process(collection: &FeatureCollection, config: &Config) -> Result<Processed> {
    config.validate()?;
    info!(features = collection.features.len(), "processing collection");

    let dissolved;
    let source = if config.dissolve {
        let key_of = dissolve::region_key(&config.key_fields);
        dissolved = dissolve::dissolve_with_key(collection, key_of, &config.output_key);
        info!(features = dissolved.features.len(), "dissolved by region");
        &dissolved
    } else {
        collection
    };

    let simplified =
        simplify::simplify_collection_with(source, config.tolerance, config.parallel);
    let report = Report::new(collection, &simplified.collection, simplified.skipped);
    Ok(Processed {
        collection: simplified.collection,
        report,
    })
}

/// Read a whole document, process it and write the result in `format`.
///
/// The returned report carries the byte sizes of the input and of what was
/// written.
pub fn process_reader(
    mut reader: impl Read,
    writer: &mut dyn Write,
    config: &Config,
    format: Format,
) -> Result<Processed> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let collection: FeatureCollection = text.parse()?;

    let Processed {
        collection,
        mut report,
    } = process(&collection, config)?;

    let mut buffer = Vec::new();
    collection.write_format(&mut buffer, format)?;
    writer.write_all(&buffer)?;

    report.bytes_in = text.len();
    report.bytes_out = buffer.len();
    report.log();
    Ok(Processed { collection, report })
}
