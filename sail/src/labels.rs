//! Reserved-namespace labels.
//!
//! Labels under the `sail` namespace are the only persisted record of how a
//! container was built. Images carry them down a chain of derived images;
//! the engine flattens that chain, so propagation is a plain key filter.

use std::collections::HashMap;

use serde::Serialize;

use crate::runtime::constants::labels;

/// Label set attached to images and containers.
pub type LabelSet = HashMap<String, String>;

/// True if `key` belongs to the reserved namespace.
pub fn is_reserved(key: &str) -> bool {
    key.strip_prefix(labels::SAIL)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// Copy every reserved-namespace entry of `source`, verbatim.
pub fn propagate(source: &LabelSet) -> LabelSet {
    source
        .iter()
        .filter(|(key, _)| is_reserved(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Read view over the well-known reserved labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SailLabels {
    pub present: bool,
    pub base_image: Option<String>,
    pub hat: Option<String>,
    pub project_dir: Option<String>,
    pub project_local_dir: Option<String>,
    pub project_name: Option<String>,
}

impl SailLabels {
    pub fn from_labels(set: &LabelSet) -> Self {
        let get = |key: &str| set.get(key).cloned();
        Self {
            present: set.contains_key(labels::SAIL),
            base_image: get(labels::BASE_IMAGE),
            hat: get(labels::HAT),
            project_dir: get(labels::PROJECT_DIR),
            project_local_dir: get(labels::PROJECT_LOCAL_DIR),
            project_name: get(labels::PROJECT_NAME),
        }
    }
}
