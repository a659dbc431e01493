use super::model::{
    ZoneFeature, COEFFICIENT_PROPERTY, ID_PROPERTY, LAND_USE_PROPERTY, ZONE_PROPERTY,
};
use crate::{Error, Result};
use geo::{Contains, Coord};
use geojson::{Bbox, FeatureCollection, GeoJson, JsonObject, PolygonType};
use serde_json::{Map, Value};
use std::{collections::HashMap, fs, path::Path};
use tracing::{info, warn};

/// Zone features in render order. Nothing is added, removed or changed after
/// load.
#[derive(Debug, Default)]
pub struct ZoneDataset {
    features: Vec<ZoneFeature>,
    positions: HashMap<String, usize>,
    bbox: Option<Bbox>,
    /// Collection members besides `type`, `features` and `bbox`, like `name`
    foreign_members: Option<JsonObject>,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: Vec<Rejection>,
}

#[derive(Debug, PartialEq)]
pub struct Rejection {
    /// Position of the feature in the source document
    pub index: usize,
    pub reason: String,
}

impl LoadReport {
    pub fn error(&self) -> Option<Error> {
        if self.rejected.is_empty() {
            return None;
        }
        let reasons: Vec<String> = self
            .rejected
            .iter()
            .map(|it| format!("#{}: {}", it.index, it.reason))
            .collect();
        Some(Error::DatasetLoad {
            rejected: self.rejected.len(),
            message: format!("Malformed zone features: {}", reasons.join("; ")),
        })
    }
}

impl ZoneDataset {
    pub fn load_file(path: impl AsRef<Path>) -> Result<(ZoneDataset, LoadReport)> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading zone dataset");
        ZoneDataset::load_str(&fs::read_to_string(path)?)
    }

    pub fn load_str(document: &str) -> Result<(ZoneDataset, LoadReport)> {
        let geo_json: GeoJson = document.parse().map_err(|e| Error::DatasetLoad {
            rejected: 0,
            message: format!("Failed to parse zone dataset: {e}"),
        })?;
        ZoneDataset::load_geojson(geo_json)
    }

    pub fn load_geojson(geo_json: GeoJson) -> Result<(ZoneDataset, LoadReport)> {
        let GeoJson::FeatureCollection(collection) = geo_json else {
            return Err(Error::DatasetLoad {
                rejected: 0,
                message: "Zone dataset must be a FeatureCollection".into(),
            });
        };
        let mut dataset = ZoneDataset {
            bbox: collection.bbox,
            foreign_members: collection.foreign_members,
            ..ZoneDataset::default()
        };
        let mut report = LoadReport::default();
        for (index, feature) in collection.features.into_iter().enumerate() {
            let res = parse_feature(feature).and_then(|it| {
                if dataset.positions.contains_key(&it.id) {
                    Err(format!("Duplicate id {}", it.id).into())
                } else {
                    Ok(it)
                }
            });
            match res {
                Ok(feature) => {
                    dataset
                        .positions
                        .insert(feature.id.clone(), dataset.features.len());
                    dataset.features.push(feature);
                }
                Err(e) => {
                    warn!(index, error = %e, "Rejected zone feature");
                    report.rejected.push(Rejection {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }
        report.loaded = dataset.features.len();
        info!(
            loaded = report.loaded,
            rejected = report.rejected.len(),
            "Loaded zone dataset"
        );
        Ok((dataset, report))
    }

    pub fn features(&self) -> &[ZoneFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ZoneFeature> {
        self.position(id).map(|it| &self.features[it])
    }

    /// Render position, later features are drawn on top of earlier ones
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Topmost feature containing the given point
    pub fn find_at(&self, coord: Coord) -> Option<&ZoneFeature> {
        self.features
            .iter()
            .rev()
            .find(|it| it.polygon().contains(&coord))
    }

    pub fn features_at(&self, coord: Coord) -> Vec<&ZoneFeature> {
        self.features
            .iter()
            .filter(|it| it.polygon().contains(&coord))
            .collect()
    }

    /// Distinct zone codes in order of first appearance
    pub fn zone_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = vec![];
        for feature in &self.features {
            if !codes.contains(&feature.zone_code.as_str()) {
                codes.push(&feature.zone_code);
            }
        }
        codes
    }

    pub fn export(&self) -> GeoJson {
        GeoJson::FeatureCollection(FeatureCollection {
            bbox: self.bbox.clone(),
            features: self.features.iter().map(ZoneFeature::to_geojson).collect(),
            foreign_members: self.foreign_members.clone(),
        })
    }

    pub fn export_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.export())?)
    }
}

fn parse_feature(feature: geojson::Feature) -> Result<ZoneFeature> {
    let properties = feature.properties.ok_or("Missing properties")?;
    let geometry = feature.geometry.ok_or("Missing geometry")?;
    let rings = match geometry.value {
        geojson::Value::Polygon(rings) => rings,
        _ => Err("Expected Polygon geometry")?,
    };
    validate_rings(&rings)?;
    Ok(ZoneFeature {
        id: id(&properties)?,
        zone_code: text(&properties, ZONE_PROPERTY)?,
        coefficient: properties
            .get(COEFFICIENT_PROPERTY)
            .cloned()
            .unwrap_or(Value::Null),
        land_use: text(&properties, LAND_USE_PROPERTY)?,
        rings,
        properties,
        feature_id: feature.id,
        bbox: feature.bbox,
        foreign_members: feature.foreign_members,
        geometry_bbox: geometry.bbox,
        geometry_foreign_members: geometry.foreign_members,
    })
}

fn id(properties: &Map<String, Value>) -> Result<String> {
    match properties.get(ID_PROPERTY) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(format!("Missing or empty {ID_PROPERTY}").into()),
    }
}

fn text(properties: &Map<String, Value>, name: &str) -> Result<String> {
    match properties.get(name) {
        Some(Value::String(value)) => Ok(value.clone()),
        _ => Err(format!("Missing or non-text {name}").into()),
    }
}

// Area related checks belong to the evaluator, here we only make sure the
// rings can be turned into geometry at all
fn validate_rings(rings: &PolygonType) -> Result<()> {
    if rings.is_empty() {
        return Err(Error::InvalidInput("Polygon has no rings".into()));
    }
    for (i, ring) in rings.iter().enumerate() {
        let valid_positions = ring
            .iter()
            .all(|it| it.len() >= 2 && it[0].is_finite() && it[1].is_finite());
        if !valid_positions {
            return Err(Error::InvalidInput(format!("Ring {i} has invalid positions")));
        }
        if ring.first() != ring.last() || ring.is_empty() {
            return Err(Error::InvalidInput(format!("Ring {i} is not closed")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::ZoneDataset;
    use crate::test::{mock_document, mock_malformed_document, square, z_001_ring};
    use crate::{Error, Result};
    use geo::coord;
    use serde_json::json;

    #[test]
    fn load_str() -> Result<()> {
        let (dataset, report) = ZoneDataset::load_str(&mock_document().to_string())?;
        assert_eq!(2, dataset.len());
        assert_eq!(2, report.loaded);
        assert!(report.rejected.is_empty());
        assert!(report.error().is_none());
        let feature = dataset.get("Z-001").ok_or("Z-001 not loaded")?;
        assert_eq!("ZE5", feature.zone_code);
        assert_eq!("Residencial", feature.land_use);
        assert_eq!(json!(3.0), feature.coefficient);
        assert_eq!(vec![z_001_ring()], feature.rings);
        Ok(())
    }

    #[test]
    fn load_str_keeps_order() -> Result<()> {
        let (dataset, _) = ZoneDataset::load_str(&mock_document().to_string())?;
        let ids: Vec<&str> = dataset.features().iter().map(|it| it.id.as_str()).collect();
        assert_eq!(vec!["Z-001", "Z-002"], ids);
        assert_eq!(Some(1), dataset.position("Z-002"));
        assert!(dataset.get("Z-003").is_none());
        Ok(())
    }

    #[test]
    fn load_str_not_json() {
        let res = ZoneDataset::load_str("zones");
        assert!(matches!(res, Err(Error::DatasetLoad { rejected: 0, .. })));
    }

    #[test]
    fn load_str_not_a_feature_collection() {
        let document = json!({
            "type": "Feature",
            "geometry": null,
            "properties": {},
        });
        let res = ZoneDataset::load_str(&document.to_string());
        assert!(matches!(res, Err(Error::DatasetLoad { .. })));
    }

    #[test]
    fn load_str_drops_malformed_features() -> Result<()> {
        let document = mock_malformed_document()?;
        let (dataset, report) = ZoneDataset::load_str(&document.to_string())?;
        assert_eq!(2, dataset.len());
        assert_eq!(2, report.loaded);
        let indexes: Vec<usize> = report.rejected.iter().map(|it| it.index).collect();
        assert_eq!(vec![2, 3, 4, 5], indexes);
        assert!(matches!(
            report.error(),
            Some(Error::DatasetLoad { rejected: 4, .. })
        ));
        Ok(())
    }

    #[test]
    fn load_str_accepts_numeric_id_and_missing_coefficient() -> Result<()> {
        let document = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": [square(-38.5, -3.7, 0.001)] },
                "properties": { "id": 7, "zone": "ZEIS", "uso": "Misto" },
            }],
        });
        let (dataset, report) = ZoneDataset::load_str(&document.to_string())?;
        assert_eq!(1, report.loaded);
        let feature = dataset.get("7").ok_or("7 not loaded")?;
        assert!(feature.coefficient.is_null());
        Ok(())
    }

    #[test]
    fn load_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("zones.geojson");
        std::fs::write(&path, mock_document().to_string())?;
        let (dataset, _) = ZoneDataset::load_file(&path)?;
        assert_eq!(2, dataset.len());
        assert!(matches!(
            ZoneDataset::load_file(dir.path().join("missing.geojson")),
            Err(Error::IO(_))
        ));
        Ok(())
    }

    #[test]
    fn find_at_picks_last_rendered() -> Result<()> {
        let (dataset, _) = ZoneDataset::load_str(&mock_document().to_string())?;
        // both fixtures cover this point, Z-002 is drawn on top
        let point = coord! { x: -38.5180, y: -3.7280 };
        assert_eq!(2, dataset.features_at(point).len());
        assert_eq!("Z-002", dataset.find_at(point).ok_or("no zone")?.id);
        // only Z-001
        let point = coord! { x: -38.5188, y: -3.7272 };
        assert_eq!("Z-001", dataset.find_at(point).ok_or("no zone")?.id);
        assert!(dataset.find_at(coord! { x: 0.0, y: 0.0 }).is_none());
        Ok(())
    }

    #[test]
    fn zone_codes() -> Result<()> {
        let (dataset, _) = ZoneDataset::load_str(&mock_document().to_string())?;
        assert_eq!(vec!["ZE5", "ZPA"], dataset.zone_codes());
        Ok(())
    }

    #[test]
    fn export_unmodified_dataset() -> Result<()> {
        let document = mock_document();
        let (dataset, _) = ZoneDataset::load_str(&document.to_string())?;
        let exported: serde_json::Value = serde_json::from_str(&dataset.export_string()?)?;
        assert_eq!("FeatureCollection", exported["type"]);
        assert_eq!(2, exported["features"].as_array().ok_or("no features")?.len());
        for i in 0..2 {
            assert_eq!(
                document["features"][i]["properties"],
                exported["features"][i]["properties"]
            );
            assert_eq!(
                document["features"][i]["geometry"],
                exported["features"][i]["geometry"]
            );
        }
        Ok(())
    }

    #[test]
    fn export_keeps_extra_members() -> Result<()> {
        let document = json!({
            "type": "FeatureCollection",
            "name": "zoneamento",
            "bbox": [-38.5190, -3.7285, -38.5175, -3.7270],
            "features": [{
                "type": "Feature",
                "id": "f1",
                "bbox": [-38.5190, -3.7285, -38.5175, -3.7270],
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [z_001_ring()],
                    "bbox": [-38.5190, -3.7285, -38.5175, -3.7270],
                },
                "properties": { "id": "Z-001", "zone": "ZE5", "coeficiente": 3.0, "uso": "Residencial" },
                "style": { "fill": "#3498db", "opacity": 0.5 },
            }],
        });
        let (dataset, _) = ZoneDataset::load_str(&document.to_string())?;
        let exported: serde_json::Value = serde_json::from_str(&dataset.export_string()?)?;
        assert_eq!(document, exported);
        Ok(())
    }

    #[test]
    fn export_then_reload() -> Result<()> {
        let (dataset, _) = ZoneDataset::load_str(&mock_document().to_string())?;
        let (reloaded, report) = ZoneDataset::load_str(&dataset.export_string()?)?;
        assert!(report.rejected.is_empty());
        assert_eq!(dataset.features(), reloaded.features());
        Ok(())
    }
}
