//! Sail - development containers assembled from layered images.
//!
//! Sail keeps no database. A container's labels and mount list are the only
//! record of how it was built, and a [`Runner`] can be recovered from them at
//! any time.
//!
//! ```text
//! create:  image ─→ ImageMetadata ─┬─→ MountAssembler ─┐
//!                                  └─→ labels::propagate ┴─→ Runner::run_container ─→ engine
//! recover: engine ─→ Runner::from_container ─→ Runner
//! ```

pub mod codeserver;
pub mod engine;
pub mod errors;
pub mod images;
pub mod labels;
pub mod paths;
pub mod runner;
pub mod runtime;
pub mod volumes;

use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub use errors::{EngineError, SailError, SailResult};
pub use runner::{RunMode, Runner};
pub use runtime::{SailLayout, SailOptions, SailRuntime};

use runtime::constants::envs;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber: stderr plus a daily log file under
/// `<home_dir>/logs/`.
///
/// Filter comes from `SAIL_LOG`, else `debug` when `verbose`, else `info`.
/// Calling it again is a no-op.
pub fn init_logging_for(layout: &SailLayout, verbose: bool) -> SailResult<()> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }

    let logs_dir = layout.logs_dir();
    std::fs::create_dir_all(&logs_dir).map_err(|e| {
        SailError::Storage(format!(
            "Failed to create log directory {}: {}",
            logs_dir.display(),
            e
        ))
    })?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(envs::SAIL_LOG)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let appender = tracing_appender::rolling::daily(&logs_dir, "sail.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let registered = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init();

    if registered.is_ok() {
        let _ = LOG_GUARD.set(guard);
    }
    Ok(())
}
