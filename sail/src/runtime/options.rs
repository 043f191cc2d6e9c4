//! Runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{SailError, SailResult};
use crate::runtime::constants::{self, envs};

/// Options for a [`SailRuntime`](crate::SailRuntime).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SailOptions {
    /// Metadata root. Per-container state, the binary cache and logs live here.
    pub home_dir: PathBuf,
    /// Network used when the caller does not name one.
    pub default_network: String,
    /// Subnet given to the default network when it does not exist yet.
    pub default_subnet: String,
    /// Deadline for the whole create path, from assembly through start.
    #[serde(with = "duration_secs")]
    pub create_timeout: Duration,
    /// Editor-server binary to mount instead of the cached one.
    pub code_server_path: Option<PathBuf>,
}

impl Default for SailOptions {
    fn default() -> Self {
        // Empty when there is no home directory; `sanitize` reports it.
        let home_dir = default_home_dir(dirs::home_dir()).unwrap_or_default();

        Self {
            home_dir,
            default_network: constants::DEFAULT_NETWORK.to_string(),
            default_subnet: constants::DEFAULT_SUBNET.to_string(),
            create_timeout: constants::DEFAULT_CREATE_TIMEOUT,
            code_server_path: None,
        }
    }
}

impl SailOptions {
    /// Defaults with environment overrides applied.
    ///
    /// Fails when `SAIL_HOME` is unset and the invoking user has no home
    /// directory.
    pub fn from_env() -> SailResult<Self> {
        let home_dir = match std::env::var_os(envs::SAIL_HOME).filter(|v| !v.is_empty()) {
            Some(home) => PathBuf::from(home),
            None => default_home_dir(dirs::home_dir()).ok_or_else(missing_home)?,
        };
        Ok(Self {
            home_dir,
            ..Self::default()
        })
    }

    /// Reject options that cannot produce a working runtime.
    pub fn sanitize(&self) -> SailResult<()> {
        if self.home_dir.as_os_str().is_empty() {
            return Err(missing_home());
        }
        if !self.home_dir.is_absolute() {
            return Err(SailError::Config(format!(
                "home_dir must be absolute path, got: {}",
                self.home_dir.display()
            )));
        }
        if self.create_timeout.is_zero() {
            return Err(SailError::Config("create_timeout must be non-zero".into()));
        }
        if self.default_network.is_empty() {
            return Err(SailError::Config("default_network must not be empty".into()));
        }
        if self.default_subnet.is_empty() {
            return Err(SailError::Config("default_subnet must not be empty".into()));
        }
        Ok(())
    }
}

fn default_home_dir(user_home: Option<PathBuf>) -> Option<PathBuf> {
    user_home.map(|home| home.join(".config").join("sail"))
}

fn missing_home() -> SailError {
    SailError::Environment(format!(
        "failed to determine the user's home directory; set {}",
        envs::SAIL_HOME
    ))
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let options = SailOptions::default();
        assert_eq!(options.default_network, "sail");
        assert_eq!(options.default_subnet, "172.20.0.0/16");
        assert_eq!(options.create_timeout, Duration::from_secs(30));
        assert!(options.code_server_path.is_none());
    }

    #[test]
    fn test_sanitize_rejects_relative_home() {
        let options = SailOptions {
            home_dir: PathBuf::from("relative/sail"),
            ..Default::default()
        };
        assert!(matches!(options.sanitize(), Err(SailError::Config(_))));
    }

    #[test]
    fn test_default_home_is_under_user_config() {
        assert_eq!(
            default_home_dir(Some(PathBuf::from("/home/alice"))),
            Some(PathBuf::from("/home/alice/.config/sail"))
        );
        assert_eq!(default_home_dir(None), None);
    }

    #[test]
    fn test_sanitize_reports_missing_home_as_environment_error() {
        let options = SailOptions {
            home_dir: PathBuf::new(),
            ..Default::default()
        };
        match options.sanitize() {
            Err(SailError::Environment(msg)) => assert!(msg.contains("SAIL_HOME"), "{msg}"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_sanitize_rejects_empty_subnet() {
        let options = SailOptions {
            home_dir: PathBuf::from("/tmp/sail"),
            default_subnet: String::new(),
            ..Default::default()
        };
        assert!(matches!(options.sanitize(), Err(SailError::Config(_))));
    }

    #[test]
    fn test_sanitize_rejects_zero_timeout() {
        let options = SailOptions {
            home_dir: PathBuf::from("/tmp/sail"),
            create_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(options.sanitize().is_err());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let options: SailOptions =
            serde_json::from_str(r#"{"home_dir": "/srv/sail", "create_timeout": 5}"#).unwrap();
        assert_eq!(options.home_dir, PathBuf::from("/srv/sail"));
        assert_eq!(options.create_timeout, Duration::from_secs(5));
        assert_eq!(options.default_network, "sail");
    }
}
