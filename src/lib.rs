pub use error::Error;
pub use feasibility::FeasibilityResult;
pub use zone::{ZoneDataset, ZoneFeature};
pub mod conf;
mod error;
pub mod feasibility;
pub mod log;
pub mod selection;
pub mod service;
pub mod zone;


pub type Result<T, E = Error> = std::result::Result<T, E>;
