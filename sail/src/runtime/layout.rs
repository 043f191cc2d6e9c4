//! Host filesystem layout under the metadata root.
//!
//! ```text
//! <home_dir>/
//!   containers/<name>/globalStorage/
//!   cache/code-server
//!   logs/
//! ```

use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

use crate::errors::{SailError, SailResult};
use crate::runtime::constants::{CONTAINER_DIR_MODE, meta_dirs};

#[derive(Debug, Clone)]
pub struct SailLayout {
    home_dir: PathBuf,
}

impl SailLayout {
    pub fn new(home_dir: PathBuf) -> Self {
        Self { home_dir }
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn containers_dir(&self) -> PathBuf {
        self.home_dir.join(meta_dirs::CONTAINERS)
    }

    pub fn container_dir(&self, name: &str) -> PathBuf {
        self.containers_dir().join(name)
    }

    pub fn global_storage_dir(&self, name: &str) -> PathBuf {
        self.container_dir(name).join(meta_dirs::GLOBAL_STORAGE)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.home_dir.join(meta_dirs::CACHE)
    }

    pub fn code_server_path(&self) -> PathBuf {
        self.cache_dir().join(meta_dirs::CODE_SERVER)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.home_dir.join(meta_dirs::LOGS)
    }

    /// Create the top-level directories.
    pub fn prepare(&self) -> SailResult<()> {
        for dir in [self.containers_dir(), self.cache_dir(), self.logs_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                SailError::Storage(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// Create the container's global-storage directory if absent.
    ///
    /// Existing directories are fine, so repeated calls for one name are safe.
    pub fn prepare_global_storage(&self, name: &str) -> SailResult<PathBuf> {
        let dir = self.global_storage_dir(name);
        std::fs::DirBuilder::new()
            .recursive(true)
            .mode(CONTAINER_DIR_MODE)
            .create(&dir)
            .map_err(|e| {
                SailError::Storage(format!(
                    "Failed to create global storage directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        Ok(dir)
    }
}
