use crate::application::services::ProfileStore;
use crate::domain::entities::ProfileSet;
use crate::domain::errors::StoreError;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

const APP_DIR: &str = "restcall";
const FALLBACK_DIR: &str = ".restcall";
const CONFIG_FILE: &str = "config.json";

/// Profile store backed by a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileProfileStore {
    /// `None` until first use means the per-user default location.
    path: Option<PathBuf>,
}

impl JsonFileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Store at the per-user location: `<config dir>/restcall/config.json`,
    /// or `~/.restcall/config.json` when the platform has no config dir.
    /// The location is looked up on first load or save.
    pub fn at_default_location() -> Self {
        Self { path: None }
    }

    pub fn resolve_path(&self) -> Result<PathBuf, StoreError> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => default_path(dirs::config_dir(), dirs::home_dir()),
        }
    }
}

fn default_path(
    config_dir: Option<PathBuf>,
    home_dir: Option<PathBuf>,
) -> Result<PathBuf, StoreError> {
    if let Some(dir) = config_dir {
        return Ok(dir.join(APP_DIR).join(CONFIG_FILE));
    }
    home_dir
        .map(|home| home.join(FALLBACK_DIR).join(CONFIG_FILE))
        .ok_or(StoreError::NoConfigDir)
}

impl ProfileStore for JsonFileProfileStore {
    fn load(&self) -> Result<ProfileSet, StoreError> {
        let path = self.resolve_path()?;
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using empty profile set");
                return Ok(ProfileSet::default());
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        serde_json::from_slice(&data).map_err(|source| StoreError::Parse { path, source })
    }

    fn save(&self, profiles: &ProfileSet) -> Result<(), StoreError> {
        let path = self.resolve_path()?;
        let write_err = |source| StoreError::Write {
            path: path.clone(),
            source,
        };

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }
        let data = serde_json::to_vec_pretty(profiles).map_err(StoreError::Encode)?;
        std::fs::write(&path, data).map_err(write_err)?;

        debug!(path = %path.display(), count = profiles.profiles.len(), "saved profiles");
        Ok(())
    }
}
