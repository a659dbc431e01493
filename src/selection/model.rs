use crate::{FeasibilityResult, Result};
use geo::Coord;
use geojson::GeoJson;
use serde_json::Value;
use strum::Display;

/// Map widget owned by the controller. Hit-testing, styling and rendering
/// all happen on the other side of this trait.
pub trait MapSurface {
    fn has_source(&self, source_id: &str) -> bool;

    fn add_source(&mut self, source_id: &str, document: &GeoJson) -> Result<()>;

    /// Fill and outline layers for a registered source. `fill_color` is a
    /// style expression, see `zone::style::fill_color_expression`
    fn add_zone_layers(&mut self, source_id: &str, fill_color: &Value, outline_color: &str)
        -> Result<()>;

    fn show_popup(&mut self, coord: Coord, html: &str);

    fn release(&mut self);
}

/// Side panel or any other place results and notices end up in
pub trait Presenter {
    fn present(&mut self, result: &FeasibilityResult);

    fn notify(&mut self, notice: Notice);
}

pub trait FileSaver {
    fn save(&mut self, file_name: &str, contents: &[u8]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Notice {
        Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Notice {
        Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Notice {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
