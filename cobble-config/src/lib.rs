use log::warn;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use std::{fs, path::Path};

pub mod storage;

pub use storage::{DatabaseBackend, StorageConfig};

const CONFIG_ROOT_FOLDER: &str = "config/";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Couldn't parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Couldn't serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Settings of a single world. There is no global instance: load it once and
/// pass the parts you need to whoever needs them.
#[derive(Deserialize, Serialize, Default, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WorldConfiguration {
    pub storage: StorageConfig,
}

pub trait LoadConfiguration {
    /// Reads the config from `<exec_dir>/config/`, writing out the defaults
    /// first if the file doesn't exist yet.
    fn load(exec_dir: &Path) -> Result<Self, ConfigError>
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        let config_dir = exec_dir.join(CONFIG_ROOT_FOLDER);
        if !config_dir.exists() {
            log::debug!("creating new config root folder");
            fs::create_dir(&config_dir)?;
        }
        let path = config_dir.join(Self::get_path());

        let config = if path.exists() {
            let file_content = fs::read_to_string(&path)?;
            toml::from_str(&file_content)?
        } else {
            let content = Self::default();

            if let Err(err) = fs::write(&path, toml::to_string(&content)?) {
                warn!(
                    "Couldn't write default config to {:?}. Reason: {}",
                    &path, err
                );
            }

            content
        };

        Ok(config)
    }

    fn get_path() -> &'static Path;
}

impl LoadConfiguration for WorldConfiguration {
    fn get_path() -> &'static Path {
        Path::new("world.toml")
    }
}
