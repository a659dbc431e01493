mod model;
mod service;

pub use model::FeasibilityResult;
pub use service::{evaluate, resolve_coefficient, DEFAULT_COEFFICIENT};
