//! Editor-server binary source.
//!
//! Fetching and caching the binary is handled elsewhere; the mount assembler
//! only needs a local path it can bind into the guest.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::errors::{SailError, SailResult};

#[async_trait]
pub trait CodeServerSource: Send + Sync {
    /// Local path of an executable editor-server binary.
    async fn binary_path(&self) -> SailResult<PathBuf>;
}

/// A binary already present at a fixed host path.
#[derive(Debug, Clone)]
pub struct CachedCodeServer {
    path: PathBuf,
}

impl CachedCodeServer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CodeServerSource for CachedCodeServer {
    async fn binary_path(&self) -> SailResult<PathBuf> {
        if !self.path.is_file() {
            return Err(SailError::Storage(format!(
                "code-server binary not found at {}",
                self.path.display()
            )));
        }
        Ok(self.path.clone())
    }
}
