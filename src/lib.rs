//! Salescope: exploratory analysis of weekly sales, customer reviews and
//! state-level sales on a map
//!
//! This library loads delimited sales and review tables, aggregates sales by
//! item, day and state, labels review sentiment with a lexicon model, and joins
//! state totals onto GeoJSON regions for a choropleth.

pub mod cli;
pub mod data;
pub mod error;
pub mod geomap;
pub mod sales;
pub mod sentiment;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{normalize_columns, LoadOptions, ReviewTable, SalesRecord, SalesTable};
pub use error::AnalysisError;
pub use geomap::{load_regions, merge_sales, GeoRegion, MergedRegion};
pub use sales::{summarize, SalesSummary};
pub use sentiment::{classify, label_reviews, Sentiment};
pub use viz::generate_report;

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
