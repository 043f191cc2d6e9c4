//! Image introspection.
//!
//! Projects the three things sail needs out of an image's resolved
//! configuration: reserved-namespace labels, share declarations and the
//! declared project root. Images with none of these are the normal case for
//! a plain base image.

mod share;

pub use share::ShareDecl;

use std::path::Path;

use crate::engine::Engine;
use crate::errors::{SailError, SailResult};
use crate::labels::{self, LabelSet};
use crate::paths;
use crate::runtime::constants::{guest_paths, labels as label_keys};

/// What an image declares to sail.
#[derive(Debug, Clone, Default)]
pub struct ImageMetadata {
    /// Reserved-namespace labels, ready to propagate.
    pub sail_labels: LabelSet,
    /// Share declarations, ordered by label key.
    pub shares: Vec<ShareDecl>,
    /// Parent directory for the guest project directory.
    pub project_root: Option<String>,
}

impl ImageMetadata {
    /// Build the projection from an image's label set.
    ///
    /// Fails on the first malformed share label.
    pub fn from_labels(image_labels: &LabelSet) -> SailResult<Self> {
        let mut share_keys: Vec<&String> = image_labels
            .keys()
            .filter(|k| k.starts_with(label_keys::SHARE_PREFIX))
            .collect();
        share_keys.sort();

        let shares = share_keys
            .into_iter()
            .map(|key| image_labels[key].parse::<ShareDecl>())
            .collect::<SailResult<Vec<_>>>()?;

        Ok(Self {
            sail_labels: labels::propagate(image_labels),
            shares,
            project_root: image_labels.get(label_keys::PROJECT_ROOT).cloned(),
        })
    }

    /// Inspect `image` and project its metadata.
    pub async fn inspect(engine: &dyn Engine, image: &str) -> SailResult<Self> {
        let details = engine
            .inspect_image(image)
            .await
            .map_err(|e| SailError::engine("inspect image", image, e))?;

        let metadata = Self::from_labels(&details.labels)?;
        tracing::debug!(
            image = %image,
            sail_labels = metadata.sail_labels.len(),
            shares = metadata.shares.len(),
            project_root = ?metadata.project_root,
            "Inspected image"
        );
        Ok(metadata)
    }

    /// Guest project directory: `<project_root or guest home>/<project_name>`.
    ///
    /// The name is always appended below the parent, even when it is
    /// absolute, and the result is normalized.
    pub fn project_dir(&self, project_name: &str) -> String {
        let parent = self.project_root.as_deref().unwrap_or(guest_paths::HOME);
        let joined = format!(
            "{}/{}",
            parent.trim_end_matches('/'),
            project_name.trim_start_matches('/')
        );
        paths::clean(Path::new(&joined))
            .to_string_lossy()
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;

    fn set(pairs: &[(&str, &str)]) -> LabelSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_plain_image_has_no_declarations() {
        let meta = ImageMetadata::from_labels(&set(&[("maintainer", "x")])).unwrap();
        assert!(meta.sail_labels.is_empty());
        assert!(meta.shares.is_empty());
        assert!(meta.project_root.is_none());
    }

    #[test]
    fn test_shares_are_parsed_in_key_order() {
        let meta = ImageMetadata::from_labels(&set(&[
            ("share.b", "/host/b:/guest/b"),
            ("share.a", "/host/a:/guest/a"),
        ]))
        .unwrap();
        let targets: Vec<&str> = meta.shares.iter().map(|s| s.target.as_str()).collect();
        assert_eq!(targets, vec!["/guest/a", "/guest/b"]);
    }

    #[test]
    fn test_malformed_share_names_value() {
        let err = ImageMetadata::from_labels(&set(&[("share.bad", "a:b:c")])).unwrap_err();
        match err {
            SailError::MalformedShare { value } => assert_eq!(value, "a:b:c"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_project_dir_uses_project_root() {
        let meta = ImageMetadata::from_labels(&set(&[("project_root", "/data")])).unwrap();
        assert_eq!(meta.project_dir("sail"), "/data/sail");
    }

    #[test]
    fn test_project_dir_defaults_to_guest_home() {
        let meta = ImageMetadata::default();
        assert_eq!(meta.project_dir("sail"), "/home/user/sail");
    }

    #[test]
    fn test_project_dir_keeps_absolute_name_under_parent() {
        let meta = ImageMetadata::default();
        let dir = meta.project_dir("/etc");
        assert!(dir.starts_with("/home/user/"), "{dir}");
        assert_eq!(dir, "/home/user/etc");
    }

    #[test]
    fn test_project_dir_is_normalized() {
        let meta = ImageMetadata::from_labels(&set(&[("project_root", "/data/../srv/")])).unwrap();
        assert_eq!(meta.project_dir("sail"), "/srv/sail");
    }

    #[tokio::test]
    async fn test_inspect_missing_image_is_attributed() {
        let engine = MockEngine::new();
        let err = ImageMetadata::inspect(&engine, "nope:latest")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("nope:latest"));
    }
}
