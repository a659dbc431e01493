use geo::{Coord, LineString, Polygon};
use geojson::{Bbox, JsonObject, PolygonType};
use serde_json::{Map, Value};

pub const ID_PROPERTY: &str = "id";
pub const ZONE_PROPERTY: &str = "zone";
pub const COEFFICIENT_PROPERTY: &str = "coeficiente";
pub const LAND_USE_PROPERTY: &str = "uso";

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneFeature {
    pub id: String,
    pub zone_code: String,
    /// Coefficient as declared in the source document, it can be a number, a
    /// numeric string or anything else. See `feasibility::resolve_coefficient`
    pub coefficient: Value,
    pub land_use: String,
    /// Outer ring first, holes after that. Positions are `[lon, lat, ..]`
    pub rings: PolygonType,
    /// All properties exactly as they were loaded, exports write these back
    pub properties: Map<String, Value>,
    pub feature_id: Option<geojson::feature::Id>,
    pub bbox: Option<Bbox>,
    /// Members of the source feature besides the GeoJSON ones, like `style`
    pub foreign_members: Option<JsonObject>,
    pub geometry_bbox: Option<Bbox>,
    pub geometry_foreign_members: Option<JsonObject>,
}

impl ZoneFeature {
    pub fn outer_ring(&self) -> &[Vec<f64>] {
        self.rings.first().map(|it| it.as_slice()).unwrap_or_default()
    }

    pub fn holes(&self) -> &[Vec<Vec<f64>>] {
        self.rings.get(1..).unwrap_or_default()
    }

    pub fn polygon(&self) -> Polygon<f64> {
        Polygon::new(
            line_string(self.outer_ring()),
            self.holes().iter().map(|it| line_string(it)).collect(),
        )
    }

    pub fn to_geojson(&self) -> geojson::Feature {
        geojson::Feature {
            bbox: self.bbox.clone(),
            geometry: Some(geojson::Geometry {
                bbox: self.geometry_bbox.clone(),
                value: geojson::Value::Polygon(self.rings.clone()),
                foreign_members: self.geometry_foreign_members.clone(),
            }),
            id: self.feature_id.clone(),
            properties: Some(self.properties.clone()),
            foreign_members: self.foreign_members.clone(),
        }
    }

    #[cfg(test)]
    pub fn mock(id: &str, coefficient: Value, rings: PolygonType) -> ZoneFeature {
        let mut properties = Map::new();
        properties.insert(ID_PROPERTY.into(), Value::String(id.into()));
        properties.insert(ZONE_PROPERTY.into(), Value::String("ZE5".into()));
        properties.insert(COEFFICIENT_PROPERTY.into(), coefficient.clone());
        properties.insert(LAND_USE_PROPERTY.into(), Value::String("Residencial".into()));
        ZoneFeature {
            id: id.into(),
            zone_code: "ZE5".into(),
            coefficient,
            land_use: "Residencial".into(),
            rings,
            properties,
            feature_id: None,
            bbox: None,
            foreign_members: None,
            geometry_bbox: None,
            geometry_foreign_members: None,
        }
    }
}

fn line_string(ring: &[Vec<f64>]) -> LineString<f64> {
    ring.iter()
        .filter_map(|position| match position.as_slice() {
            [x, y, ..] => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect::<Vec<_>>()
        .into()
}
