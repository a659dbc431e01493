mod dataset;
mod model;
pub mod style;

pub use dataset::{LoadReport, Rejection, ZoneDataset};
pub use model::{
    ZoneFeature, COEFFICIENT_PROPERTY, ID_PROPERTY, LAND_USE_PROPERTY, ZONE_PROPERTY,
};
