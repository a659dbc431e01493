use super::FeasibilityResult;
use crate::{zone::ZoneFeature, Error, Result};
use geo::orient::Direction;
use geo::{Area, GeodesicArea, LineString, Orient, Polygon};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug_span, warn};

pub const DEFAULT_COEFFICIENT: f64 = 1.0;

// Planar area of the outer ring in squared degrees, anything below that is a
// line or a point
const DEGENERATE_AREA_DEG2: f64 = 1e-14;

/// Computes buildable area for a selected zone.
///
/// The land area is geodesic (WGS84 ellipsoid): outer ring minus holes, in
/// square meters. Fails with [`Error::InvalidGeometry`] when the outer ring
/// has fewer than 3 distinct vertices, is collinear or encloses no area.
pub fn evaluate(feature: &ZoneFeature) -> Result<FeasibilityResult> {
    let _span = debug_span!("evaluate", feature_id = %feature.id).entered();
    let polygon = feature.polygon();
    let exterior = ring_polygon(polygon.exterior());
    let distinct_vertices = distinct_vertices(polygon.exterior());
    if distinct_vertices < 3 {
        return Err(Error::InvalidGeometry(format!(
            "Zone {} has {distinct_vertices} distinct vertices",
            feature.id
        )));
    }
    if exterior.unsigned_area() < DEGENERATE_AREA_DEG2 {
        return Err(Error::InvalidGeometry(format!(
            "Zone {} is collinear",
            feature.id
        )));
    }
    let holes_area: f64 = polygon
        .interiors()
        .iter()
        .map(|it| ring_polygon(it).geodesic_area_unsigned())
        .sum();
    let area_sq_meters = exterior.geodesic_area_unsigned() - holes_area;
    if !area_sq_meters.is_finite() || area_sq_meters <= 0.0 {
        return Err(Error::InvalidGeometry(format!(
            "Zone {} has non-positive area {area_sq_meters}",
            feature.id
        )));
    }
    let coefficient = resolve_coefficient(&feature.coefficient);
    Ok(FeasibilityResult {
        feature_id: feature.id.clone(),
        zone_code: feature.zone_code.clone(),
        land_use: feature.land_use.clone(),
        area_sq_meters,
        coefficient,
        built_area_sq_meters: area_sq_meters * coefficient,
        perimeter_meters: exterior.geodesic_perimeter(),
    })
}

/// Finite positive numbers, either as JSON numbers or numeric strings, are
/// taken as is. Anything else falls back to [`DEFAULT_COEFFICIENT`].
pub fn resolve_coefficient(value: &Value) -> f64 {
    parse_coefficient(value).unwrap_or_else(|| {
        warn!(coefficient = %value, "Invalid coefficient, using default");
        DEFAULT_COEFFICIENT
    })
}

fn parse_coefficient(value: &Value) -> Option<f64> {
    let coefficient = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if coefficient.is_finite() && coefficient > 0.0 {
        Some(coefficient)
    } else {
        None
    }
}

fn ring_polygon(ring: &LineString<f64>) -> Polygon<f64> {
    Polygon::new(ring.clone(), vec![]).orient(Direction::Default)
}

fn distinct_vertices(ring: &LineString<f64>) -> usize {
    ring.coords()
        .map(|it| (it.x.to_bits(), it.y.to_bits()))
        .collect::<HashSet<_>>()
        .len()
}
