//! Domain errors raised while loading and validating input data

use thiserror::Error;

/// Failures that stop the analysis run.
///
/// Library functions return [`crate::Result`], so these travel inside an
/// `anyhow::Error` and can be recovered with `downcast_ref::<AnalysisError>()`.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: &'static str },

    #[error("negative price {price} in sales row {row}")]
    NegativePrice { row: usize, price: f64 },

    #[error("feature {index} has no string 'name' property")]
    MissingRegionName { index: usize },

    #[error("region '{name}' has unsupported geometry type {kind}")]
    UnsupportedGeometry { name: String, kind: String },

    #[error("region '{name}' has no geometry")]
    MissingGeometry { name: String },

    #[error("boundary file is a bare {kind} geometry, expected named features")]
    BareGeometry { kind: String },

    #[error("boundary file contains no features")]
    EmptyFeatureCollection,

    #[error("delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(String),
}
