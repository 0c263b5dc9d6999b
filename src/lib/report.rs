use super::geojson::{FeatureCollection, VertexCount};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Size metrics of one pipeline run.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Report {
    pub features_in: usize,
    pub features_out: usize,
    pub vertices_in: usize,
    pub vertices_out: usize,
    /// Features passed through because their geometry had no usable
    /// coordinates.
    pub skipped: usize,
    pub bytes_in: usize,
    pub bytes_out: usize,
}

fn reduction(before: usize, after: usize) -> f64 {
    if before == 0 {
        return 0.0;
    }
    1.0 - after as f64 / before as f64
}

impl Report {
    pub fn new(input: &FeatureCollection, output: &FeatureCollection, skipped: usize) -> Self {
        Report {
            features_in: input.features.len(),
            features_out: output.features.len(),
            vertices_in: input.vertex_count(),
            vertices_out: output.vertex_count(),
            skipped,
            ..Report::default()
        }
    }

    /// Share of vertices removed, `0.0` to `1.0`.
    pub fn vertex_reduction(&self) -> f64 {
        reduction(self.vertices_in, self.vertices_out)
    }

    /// Share of bytes saved, negative if the output grew.
    pub fn size_reduction(&self) -> f64 {
        reduction(self.bytes_in, self.bytes_out)
    }

    pub fn log(&self) {
        info!(
            features_in = self.features_in,
            features_out = self.features_out,
            skipped = self.skipped,
            "features"
        );
        info!(
            vertices_in = self.vertices_in,
            vertices_out = self.vertices_out,
            "removed {:.2}% of vertices",
            self.vertex_reduction() * 100.0
        );
        info!(
            bytes_in = self.bytes_in,
            bytes_out = self.bytes_out,
            "size reduced by {:.2}%",
            self.size_reduction() * 100.0
        );
    }
}
