//! Mount list assembly.
//!
//! Order is fixed:
//! 1. Built-in mounts (editor config, extensions, global storage)
//! 2. Project directory
//! 3. Editor-server binary
//! 4. Image-declared shares
//!
//! then deduplicated by guest target (first wins) and resolved. Built-in
//! mounts therefore always shadow a colliding share.

use std::collections::HashSet;

use super::Mount;
use crate::codeserver::CodeServerSource;
use crate::errors::SailResult;
use crate::images::ImageMetadata;
use crate::paths::PathResolver;
use crate::runtime::constants::{guest_paths, host_paths};
use crate::runtime::layout::SailLayout;

/// Per-container inputs to mount assembly.
#[derive(Debug, Clone)]
pub struct MountInput<'a> {
    pub container_name: &'a str,
    /// Project directory on the host.
    pub project_local_dir: &'a str,
    /// Project directory in the guest.
    pub project_dir: &'a str,
}

pub struct MountAssembler<'a> {
    layout: &'a SailLayout,
    resolver: &'a PathResolver,
    code_server: &'a dyn CodeServerSource,
}

impl<'a> MountAssembler<'a> {
    pub fn new(
        layout: &'a SailLayout,
        resolver: &'a PathResolver,
        code_server: &'a dyn CodeServerSource,
    ) -> Self {
        Self {
            layout,
            resolver,
            code_server,
        }
    }

    /// Build the final mount list for a container.
    pub async fn assemble(
        &self,
        input: &MountInput<'_>,
        image: &ImageMetadata,
    ) -> SailResult<Vec<Mount>> {
        let mut mounts = Vec::new();

        mounts.push(Mount::bind(
            host_paths::EDITOR_CONFIG,
            guest_paths::EDITOR_CONFIG,
        ));
        mounts.push(Mount::bind(host_paths::EXTENSIONS, guest_paths::EXTENSIONS));

        // UI state and other editor-server specific state.
        let global_storage = self.layout.prepare_global_storage(input.container_name)?;
        mounts.push(Mount::bind(
            global_storage.to_string_lossy(),
            guest_paths::GLOBAL_STORAGE,
        ));

        mounts.push(Mount::bind(input.project_local_dir, input.project_dir));

        let code_server = self.code_server.binary_path().await?;
        mounts.push(Mount::bind(
            code_server.to_string_lossy(),
            guest_paths::CODE_SERVER_BIN,
        ));

        for share in &image.shares {
            mounts.push(Mount::bind(share.source.as_str(), share.target.as_str()));
        }

        // Targets are resolved before dedup so `~/x` and `/home/user/x` collide.
        for mount in &mut mounts {
            mount.target = self.resolver.guest(&mount.target);
        }
        let mut mounts = strip_duplicate_mounts(mounts);

        for mount in &mut mounts {
            mount.source = self.resolver.host(&mount.source)?;
        }

        tracing::debug!(
            container = %input.container_name,
            count = mounts.len(),
            "Assembled mounts"
        );
        Ok(mounts)
    }
}

/// Keep only the first mount for each target, preserving order.
pub fn strip_duplicate_mounts(mounts: Vec<Mount>) -> Vec<Mount> {
    let mut seen = HashSet::with_capacity(mounts.len());
    mounts
        .into_iter()
        .filter(|mount| {
            let first = seen.insert(mount.target.clone());
            if !first {
                tracing::debug!(
                    source = %mount.source,
                    target = %mount.target,
                    "Dropping mount shadowed by an earlier one"
                );
            }
            first
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codeserver::CachedCodeServer;
    use crate::errors::SailError;
    use crate::labels::LabelSet;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        layout: SailLayout,
        resolver: PathResolver,
        code_server: CachedCodeServer,
        bin: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let layout = SailLayout::new(temp.path().join("meta"));
        let bin = temp.path().join("code-server");
        std::fs::write(&bin, b"").unwrap();
        Fixture {
            resolver: PathResolver::new("/home/alice"),
            code_server: CachedCodeServer::new(&bin),
            layout,
            bin,
            _temp: temp,
        }
    }

    fn image(pairs: &[(&str, &str)]) -> ImageMetadata {
        let labels: LabelSet = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ImageMetadata::from_labels(&labels).unwrap()
    }

    fn input() -> MountInput<'static> {
        MountInput {
            container_name: "alice-sail",
            project_local_dir: "/home/alice/src/sail",
            project_dir: "/home/user/sail",
        }
    }

    #[test]
    fn test_strip_duplicates_keeps_first() {
        let mounts = vec![
            Mount::bind("/a", "/t1"),
            Mount::bind("/b", "/t2"),
            Mount::bind("/c", "/t1"),
            Mount::bind("/d", "/t2"),
            Mount::bind("/e", "/t3"),
        ];
        let out = strip_duplicate_mounts(mounts);
        let sources: Vec<&str> = out.iter().map(|m| m.source.as_str()).collect();
        assert_eq!(sources, vec!["/a", "/b", "/e"]);

        let targets: HashSet<&str> = out.iter().map(|m| m.target.as_str()).collect();
        assert_eq!(targets.len(), out.len());
    }

    #[tokio::test]
    async fn test_builtin_mounts_in_order() {
        let fx = fixture();
        let assembler = MountAssembler::new(&fx.layout, &fx.resolver, &fx.code_server);

        let mounts = assembler
            .assemble(&input(), &ImageMetadata::default())
            .await
            .unwrap();

        let targets: Vec<&str> = mounts.iter().map(|m| m.target.as_str()).collect();
        assert_eq!(
            targets,
            vec![
                "/home/user/.config/Code",
                "/home/user/.vscode/extensions",
                "/home/user/.local/share/code-server/globalStorage",
                "/home/user/sail",
                "/usr/bin/code-server",
            ]
        );
        assert_eq!(mounts[0].source, "/home/alice/.config/Code");
        assert_eq!(mounts[4].source, fx.bin.to_string_lossy());
        assert!(fx.layout.global_storage_dir("alice-sail").is_dir());
    }

    #[tokio::test]
    async fn test_every_mount_is_absolute() {
        let fx = fixture();
        let assembler = MountAssembler::new(&fx.layout, &fx.resolver, &fx.code_server);
        let image = image(&[("share.go", "~/go:~/go"), ("share.rel", "cache:cache")]);

        let mounts = assembler.assemble(&input(), &image).await.unwrap();

        for mount in &mounts {
            assert!(Path::new(&mount.source).is_absolute(), "{:?}", mount);
            assert!(Path::new(&mount.target).is_absolute(), "{:?}", mount);
        }
        let go = mounts.iter().find(|m| m.target == "/home/user/go").unwrap();
        assert_eq!(go.source, "/home/alice/go");
    }

    #[tokio::test]
    async fn test_builtin_mounts_win_over_shares() {
        let fx = fixture();
        let assembler = MountAssembler::new(&fx.layout, &fx.resolver, &fx.code_server);
        let image = image(&[
            ("share.a_config", "/elsewhere/config:/home/user/.config/Code"),
            ("share.b_project", "/elsewhere/proj:~/sail"),
            ("share.c_bin", "/elsewhere/bin:/usr/bin/code-server"),
            ("share.d_extra", "/elsewhere/extra:/extra"),
        ]);

        let mounts = assembler.assemble(&input(), &image).await.unwrap();

        assert_eq!(mounts.len(), 6);
        assert!(mounts.iter().all(|m| !m.source.starts_with("/elsewhere/")
            || m.target == "/extra"));
        let project = mounts
            .iter()
            .find(|m| m.target == "/home/user/sail")
            .unwrap();
        assert_eq!(project.source, "/home/alice/src/sail");
    }

    #[tokio::test]
    async fn test_missing_code_server_aborts() {
        let fx = fixture();
        let missing = CachedCodeServer::new(fx.bin.with_file_name("absent"));
        let assembler = MountAssembler::new(&fx.layout, &fx.resolver, &missing);

        let err = assembler
            .assemble(&input(), &ImageMetadata::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SailError::Storage(_)));
    }

    #[tokio::test]
    async fn test_global_storage_failure_aborts() {
        let fx = fixture();
        std::fs::create_dir_all(fx.layout.home_dir()).unwrap();
        std::fs::write(fx.layout.containers_dir(), b"").unwrap();
        let assembler = MountAssembler::new(&fx.layout, &fx.resolver, &fx.code_server);

        let err = assembler
            .assemble(&input(), &ImageMetadata::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SailError::Storage(_)));
    }
}
