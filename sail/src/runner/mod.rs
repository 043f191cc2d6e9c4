//! Runner - the descriptor of one sail container.
//!
//! A Runner is never persisted. It is either built fresh from user input
//! right before a create, or recovered from an existing container's labels.
//!
//! - `create`: assembles the container and issues create + start
//! - `recover`: rebuilds a Runner by inspecting a container

mod create;
mod recover;

use serde::Serialize;

use crate::runtime::constants::{guest_paths, guest_user};

/// How the container's root process behaves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RunMode {
    /// The editor server is the root process; the container lives as long as it does.
    #[default]
    Interactive,
    /// Run `command` once and exit non-zero so the container does not linger.
    OneShot { command: String },
}

/// Everything needed to assemble, or describe, one sail container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Runner {
    pub container_name: String,
    pub project_name: String,
    pub hostname: String,
    /// Project directory on the host.
    pub project_local_dir: String,
    /// Host uid mapped to the guest user. A recovered value already
    /// carries the `:group` suffix.
    pub host_user: String,
    pub network: String,
    pub ip: String,
    pub mode: RunMode,
}

impl Runner {
    /// New interactive Runner for the invoking user.
    pub fn new(
        container_name: impl Into<String>,
        project_name: impl Into<String>,
        project_local_dir: impl Into<String>,
        network: impl Into<String>,
        ip: impl Into<String>,
    ) -> Self {
        let container_name = container_name.into();
        Self {
            hostname: container_name.clone(),
            container_name,
            project_name: project_name.into(),
            project_local_dir: project_local_dir.into(),
            host_user: nix::unistd::getuid().to_string(),
            network: network.into(),
            ip: ip.into(),
            mode: RunMode::Interactive,
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_host_user(mut self, host_user: impl Into<String>) -> Self {
        self.host_user = host_user.into();
        self
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// `uid:group` the container runs as.
    ///
    /// Files created in bind-mounted host directories keep host-compatible
    /// ownership.
    pub fn container_user(&self) -> String {
        if self.host_user.contains(':') {
            self.host_user.clone()
        } else {
            format!("{}:{}", self.host_user, guest_user::GROUP)
        }
    }

    /// `bash -c` script for the container's root process.
    pub fn entry_command(&self, project_dir: &str) -> String {
        match &self.mode {
            // Logs go to a file for in-container access and to stdout for `docker logs`.
            RunMode::Interactive => format!(
                "cd {}; code-server --data-dir ~/.config/Code --extensions-dir ~/.vscode/extensions --allow-http --no-auth 2>&1 | tee {}",
                project_dir,
                guest_paths::LOG_FILE
            ),
            RunMode::OneShot { command } => format!("{}; exit 1", command),
        }
    }
}
