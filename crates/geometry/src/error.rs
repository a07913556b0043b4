//! Error types for the geometry engine.

/// Failures raised while sampling triangles.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// The shared bounding box has no area (all pins on one horizontal or
    /// vertical line, or a coordinate is not finite), so no sampling grid
    /// can be laid over it.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
}
