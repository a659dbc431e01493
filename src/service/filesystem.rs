use crate::{conf::Conf, selection::FileSaver, Error, Result};
use std::{fs, fs::create_dir_all, path::PathBuf};
use tracing::info;

pub fn data_dir_path(conf: &Conf) -> Result<PathBuf> {
    if let Some(data_dir) = &conf.data_dir {
        return Ok(data_dir.clone());
    }
    #[allow(deprecated)]
    let data_dir = std::env::home_dir()
        .ok_or("Home directory does not exist")?
        .join(".local/share/zonemap");
    Ok(data_dir)
}

/// Writes exported documents into the data dir
pub struct DataDirSaver {
    dir: PathBuf,
}

impl DataDirSaver {
    pub fn new(conf: &Conf) -> Result<DataDirSaver> {
        Ok(DataDirSaver {
            dir: data_dir_path(conf)?,
        })
    }

    pub fn file_path(&self, file_name: &str) -> Result<PathBuf> {
        let path = PathBuf::from(file_name);
        // exports must land in the data dir itself
        if file_name.is_empty() || path.file_name() != Some(path.as_os_str()) {
            return Err(Error::InvalidInput(format!(
                "Invalid export file name: {file_name:?}"
            )));
        }
        Ok(self.dir.join(path))
    }
}

impl FileSaver for DataDirSaver {
    fn save(&mut self, file_name: &str, contents: &[u8]) -> Result<()> {
        let path = self.file_path(file_name)?;
        if !self.dir.exists() {
            create_dir_all(&self.dir)?;
        }
        fs::write(&path, contents)?;
        info!(path = %path.display(), bytes = contents.len(), "Saved file");
        Ok(())
    }
}
