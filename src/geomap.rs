//! Region boundaries from GeoJSON and the state-level sales join

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::Context;
use geo::{coord, BoundingRect, Centroid, MultiPolygon, Point, Polygon, Rect};
use geojson::{Feature, GeoJson};
use log::{debug, warn};

use crate::error::AnalysisError;

/// Shape of a region as it appeared in the boundary file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Polygon,
    MultiPolygon,
}

/// A named region; single polygons are stored as a one-member multi-polygon
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRegion {
    pub name: String,
    pub boundary: MultiPolygon<f64>,
    pub kind: ShapeKind,
}

impl GeoRegion {
    pub fn from_polygon(name: impl Into<String>, polygon: Polygon<f64>) -> Self {
        Self {
            name: name.into(),
            boundary: MultiPolygon::new(vec![polygon]),
            kind: ShapeKind::Polygon,
        }
    }

    pub fn from_multi_polygon(name: impl Into<String>, boundary: MultiPolygon<f64>) -> Self {
        Self {
            name: name.into(),
            boundary,
            kind: ShapeKind::MultiPolygon,
        }
    }

    /// Area-weighted centroid of the boundary; `None` for an empty shape
    pub fn centroid(&self) -> Option<Point<f64>> {
        self.boundary.centroid()
    }
}

/// A region after the left join with per-state sales totals
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRegion {
    pub name: String,
    pub boundary: MultiPolygon<f64>,
    /// Total sales for the matching state, `None` when no state matched
    pub price: Option<f64>,
    /// Label anchor
    pub centroid: Option<Point<f64>>,
}

impl MergedRegion {
    /// Whether the region belongs to the color-mapped layer
    pub fn is_colored(&self) -> bool {
        self.price.is_some()
    }
}

/// Read every feature of a GeoJSON boundary file
///
/// Each feature needs a string `name` property and a Polygon or
/// MultiPolygon geometry.
pub fn load_regions(path: impl AsRef<Path>) -> crate::Result<Vec<GeoRegion>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read boundary file: {}", path.display()))?;
    let regions = parse_regions(&text)
        .with_context(|| format!("Invalid boundary data in {}", path.display()))?;

    debug!("Loaded {} regions from {}", regions.len(), path.display());
    Ok(regions)
}

/// Parse regions from GeoJSON text
pub fn parse_regions(text: &str) -> crate::Result<Vec<GeoRegion>> {
    let features = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => {
            let kind = value_kind(&geometry.value).to_string();
            return Err(AnalysisError::BareGeometry { kind }.into());
        }
    };

    if features.is_empty() {
        return Err(AnalysisError::EmptyFeatureCollection.into());
    }

    features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| region_from_feature(index, feature))
        .collect()
}

fn region_from_feature(index: usize, feature: Feature) -> crate::Result<GeoRegion> {
    let name = feature
        .property("name")
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .ok_or(AnalysisError::MissingRegionName { index })?;

    let geometry = match feature.geometry {
        Some(geometry) => geometry,
        None => return Err(AnalysisError::MissingGeometry { name }.into()),
    };

    match geometry.value {
        value @ geojson::Value::Polygon(_) => {
            Ok(GeoRegion::from_polygon(name, Polygon::try_from(value)?))
        }
        value @ geojson::Value::MultiPolygon(_) => Ok(GeoRegion::from_multi_polygon(
            name,
            MultiPolygon::try_from(value)?,
        )),
        other => Err(AnalysisError::UnsupportedGeometry {
            name,
            kind: value_kind(&other).to_string(),
        }
        .into()),
    }
}

fn value_kind(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Left join of regions with state totals on `region.name == state`
///
/// Matching is exact and case-sensitive. Regions without a matching state
/// keep `price: None`; states without a region are dropped with a warning.
pub fn merge_sales(regions: &[GeoRegion], sales_by_state: &[(String, f64)]) -> Vec<MergedRegion> {
    let totals: HashMap<&str, f64> = sales_by_state
        .iter()
        .map(|(state, total)| (state.as_str(), *total))
        .collect();

    let merged: Vec<MergedRegion> = regions
        .iter()
        .map(|region| MergedRegion {
            name: region.name.clone(),
            boundary: region.boundary.clone(),
            price: totals.get(region.name.as_str()).copied(),
            centroid: region.centroid(),
        })
        .collect();

    let region_names: HashSet<&str> = regions.iter().map(|r| r.name.as_str()).collect();
    for (state, _) in sales_by_state {
        if !region_names.contains(state.as_str()) {
            warn!("State '{}' has sales but no matching region", state);
        }
    }

    merged
}

/// Smallest rectangle containing every boundary
pub fn bounds<'a>(shapes: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Option<Rect<f64>> {
    shapes
        .into_iter()
        .filter_map(|shape| shape.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            )
        })
}

/// Print a short inspection of the loaded regions
pub fn print_regions(regions: &[GeoRegion]) {
    let polygons = regions
        .iter()
        .filter(|r| r.kind == ShapeKind::Polygon)
        .count();

    println!("\n=== Regions ===");
    println!(
        "{} regions ({} Polygon, {} MultiPolygon)",
        regions.len(),
        polygons,
        regions.len() - polygons
    );
    if let Some(rect) = bounds(regions.iter().map(|r| &r.boundary)) {
        println!(
            "Bounds: x {:.3}..{:.3}, y {:.3}..{:.3}",
            rect.min().x,
            rect.max().x,
            rect.min().y,
            rect.max().y
        );
    }
}
