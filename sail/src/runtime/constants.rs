//! Constants shared between the host side and the guest image.
//!
//! Guest paths are a contract with the guest image: it is expected to honor
//! every one of them.

use std::time::Duration;

/// Reserved label namespace.
///
/// A label whose key is exactly [`labels::SAIL`] or starts with `sail.` is
/// control metadata owned by sail.
pub mod labels {
    /// Presence marker, set with an empty value on every sail container.
    pub const SAIL: &str = "sail";

    pub const BASE_IMAGE: &str = "sail.base_image";
    pub const HAT: &str = "sail.hat";
    pub const PROJECT_LOCAL_DIR: &str = "sail.project_local_dir";
    pub const PROJECT_DIR: &str = "sail.project_dir";
    pub const PROJECT_NAME: &str = "sail.project_name";

    /// Prefix of image labels that declare an additional bind mount.
    pub const SHARE_PREFIX: &str = "share.";

    /// Image label naming the parent directory of the guest project directory.
    pub const PROJECT_ROOT: &str = "project_root";
}

/// Fixed paths inside the guest.
pub mod guest_paths {
    /// Home directory of the guest user.
    pub const HOME: &str = "/home/user";

    /// Editor configuration directory.
    pub const EDITOR_CONFIG: &str = "~/.config/Code";

    /// User-level extension directory.
    pub const EXTENSIONS: &str = "~/.vscode/extensions";

    /// Editor-server UI state.
    pub const GLOBAL_STORAGE: &str = "~/.local/share/code-server/globalStorage/";

    /// Editor-server log, tee'd from the root process.
    pub const LOG_FILE: &str = "/tmp/code-server.log";

    /// Where the editor-server binary is bind-mounted.
    pub const CODE_SERVER_BIN: &str = "/usr/bin/code-server";
}

/// Host-side paths that mirror guest mounts.
pub mod host_paths {
    pub const EDITOR_CONFIG: &str = "~/.config/Code";
    pub const EXTENSIONS: &str = "~/.vscode/extensions";
}

/// Guest user identity.
pub mod guest_user {
    /// Group every container process runs under.
    pub const GROUP: &str = "user";
}

/// Metadata root layout (relative to `SailOptions::home_dir`).
pub mod meta_dirs {
    pub const CONTAINERS: &str = "containers";
    pub const GLOBAL_STORAGE: &str = "globalStorage";
    pub const CACHE: &str = "cache";
    pub const LOGS: &str = "logs";
    pub const CODE_SERVER: &str = "code-server";
}

/// Environment variables read by sail.
pub mod envs {
    /// Overrides the metadata root.
    pub const SAIL_HOME: &str = "SAIL_HOME";

    /// Log filter directives.
    pub const SAIL_LOG: &str = "SAIL_LOG";
}

/// Default Docker network containers are attached to.
pub const DEFAULT_NETWORK: &str = "sail";

/// Subnet of the default network when sail has to create it.
pub const DEFAULT_SUBNET: &str = "172.20.0.0/16";

/// Deadline for assembling, creating and starting a container.
pub const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Mode bits for per-container directories on the host.
pub const CONTAINER_DIR_MODE: u32 = 0o750;
