//! Bind mounts for sail containers.
//!
//! - `Mount` - a (kind, source, target) triple handed to the engine
//! - `MountAssembler` - builds the ordered, deduplicated, resolved mount list

mod assembler;

pub use assembler::{MountAssembler, MountInput, strip_duplicate_mounts};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MountKind {
    Bind,
}

/// A mount as handed to the engine.
///
/// Source and target may hold a `~` placeholder until resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mount {
    pub kind: MountKind,
    /// Path on the host.
    pub source: String,
    /// Path inside the container.
    pub target: String,
}

impl Mount {
    pub fn bind(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: MountKind::Bind,
            source: source.into(),
            target: target.into(),
        }
    }
}
