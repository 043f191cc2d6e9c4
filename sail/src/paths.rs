//! Home-directory placeholder resolution.
//!
//! Mount sources are resolved against the host user's home directory and
//! made absolute. Mount targets are resolved against the fixed guest home,
//! never the host one.

use std::path::{Component, Path, PathBuf};

use crate::errors::{SailError, SailResult};
use crate::runtime::constants::guest_paths;

/// Home-directory placeholder token.
pub const HOME_PLACEHOLDER: &str = "~";

/// Substitute a leading `~` (alone or followed by `/`) with `home`.
///
/// Other paths, including `~user/...`, are returned cleaned but otherwise
/// untouched.
pub fn resolve_path(home: &str, path: &str) -> String {
    let expanded = if path == HOME_PLACEHOLDER {
        home.to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{}", home.trim_end_matches('/'), rest)
    } else {
        path.to_string()
    };
    clean(Path::new(&expanded)).to_string_lossy().into_owned()
}

/// Lexically normalize a path: drop `.`, fold `..`, collapse separators.
pub(crate) fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root; a relative path keeps it.
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Resolves placeholder paths in host and guest context.
#[derive(Debug, Clone)]
pub struct PathResolver {
    host_home: PathBuf,
}

impl PathResolver {
    pub fn new(host_home: impl Into<PathBuf>) -> Self {
        Self {
            host_home: host_home.into(),
        }
    }

    /// Resolver for the invoking user.
    ///
    /// Fails if the home directory cannot be determined; there is no safe
    /// default to fall back on.
    pub fn from_env() -> SailResult<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            SailError::Environment("failed to determine the host home directory".into())
        })?;
        Ok(Self::new(home))
    }

    pub fn host_home(&self) -> &Path {
        &self.host_home
    }

    /// Resolve a host path to an absolute path under the host home.
    pub fn host(&self, path: &str) -> SailResult<String> {
        let home = self.host_home.to_string_lossy();
        let resolved = resolve_path(&home, path);
        let absolute = std::path::absolute(&resolved).map_err(|e| {
            SailError::Environment(format!("failed to resolve {}: {}", resolved, e))
        })?;
        Ok(clean(&absolute).to_string_lossy().into_owned())
    }

    /// Resolve a guest path against the fixed guest home.
    ///
    /// Relative results are anchored at the guest home, since that is the
    /// guest user's working directory.
    pub fn guest(&self, path: &str) -> String {
        let resolved = resolve_path(guest_paths::HOME, path);
        if Path::new(&resolved).is_absolute() {
            resolved
        } else {
            clean(&Path::new(guest_paths::HOME).join(resolved))
                .to_string_lossy()
                .into_owned()
        }
    }
}
