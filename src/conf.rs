use std::{env, path::PathBuf};

pub const DEFAULT_SOURCE_ID: &str = "zones";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "zones_export.geojson";

#[derive(Debug, Clone, PartialEq)]
pub struct Conf {
    /// GeoJSON source id the zone layers are registered under
    pub source_id: String,
    pub export_file_name: String,
    /// Where exports land, `None` means `$HOME/.local/share/zonemap`
    pub data_dir: Option<PathBuf>,
}

impl Default for Conf {
    fn default() -> Self {
        Conf {
            source_id: DEFAULT_SOURCE_ID.into(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.into(),
            data_dir: None,
        }
    }
}

impl Conf {
    pub fn from_env() -> Conf {
        Conf::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Conf {
        let default = Conf::default();
        Conf {
            source_id: non_empty(var("ZONEMAP_SOURCE_ID")).unwrap_or(default.source_id),
            export_file_name: non_empty(var("ZONEMAP_EXPORT_FILE"))
                .unwrap_or(default.export_file_name),
            data_dir: non_empty(var("ZONEMAP_DATA_DIR")).map(PathBuf::from),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|it| it.trim().to_string()).filter(|it| !it.is_empty())
}
