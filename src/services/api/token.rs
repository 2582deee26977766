use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed bearer token. Read on every request so a login elsewhere or a
/// session expiry is picked up without restarting.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/token`, or `./token` if the platform dirs are unavailable.
    pub fn default_path() -> PathBuf {
        if let Some(dirs) = ProjectDirs::from("com", "Flowstate", "FlowstateCalendar") {
            dirs.data_dir().join("token")
        } else {
            log::warn!("Unable to resolve project directory; using current dir for token");
            PathBuf::from("token")
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current token, if one is stored.
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                log::warn!("Failed to read token from {}: {}", self.path.display(), err);
                None
            }
        }
    }

    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create token directory {}", parent.display())
            })?;
        }
        fs::write(&self.path, token.trim())
            .with_context(|| format!("Failed to write token to {}", self.path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove token at {}", self.path.display())),
        }
    }
}
