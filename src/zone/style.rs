use super::{model::ZONE_PROPERTY, ZoneDataset};
use serde_json::{json, Value};

const PALETTE: [&str; 8] = [
    "#3498db", "#e67e22", "#2ecc71", "#9b59b6", "#f1c40f", "#e74c3c", "#1abc9c", "#34495e",
];

pub const FALLBACK_FILL_COLOR: &str = "#95a5a6";
pub const OUTLINE_COLOR: &str = "#2c3e50";

/// Categorical fill color lookup on the zone code, in the map style
/// expression format: `["match", ["get", "zone"], code, color, ..., fallback]`
pub fn fill_color_expression(dataset: &ZoneDataset) -> Value {
    let codes = dataset.zone_codes();
    if codes.is_empty() {
        return json!(FALLBACK_FILL_COLOR);
    }
    let mut expression = vec![json!("match"), json!(["get", ZONE_PROPERTY])];
    for (i, code) in codes.into_iter().enumerate() {
        expression.push(json!(code));
        expression.push(json!(PALETTE[i % PALETTE.len()]));
    }
    expression.push(json!(FALLBACK_FILL_COLOR));
    Value::Array(expression)
}
