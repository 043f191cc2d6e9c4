//! Create path: assemble a container from an image and start it.

use std::collections::HashMap;

use super::Runner;
use crate::engine::ContainerSpec;
use crate::errors::{SailError, SailResult};
use crate::images::ImageMetadata;
use crate::runtime::SailRuntime;
use crate::runtime::constants::labels;
use crate::volumes::{MountAssembler, MountInput};

impl Runner {
    /// Create and start the container from `image`.
    ///
    /// The whole sequence, assembly included, runs under the runtime's create
    /// deadline. If start fails the just-created container is removed; a
    /// timeout leaves whatever the engine already created.
    pub async fn run_container(&self, runtime: &SailRuntime, image: &str) -> SailResult<()> {
        let deadline = runtime.options().create_timeout;
        tracing::info!(
            container = %self.container_name,
            image = %image,
            deadline = ?deadline,
            "Creating container"
        );

        match tokio::time::timeout(deadline, self.create_and_start(runtime, image)).await {
            Ok(result) => result,
            Err(_) => Err(SailError::Timeout {
                operation: "create and start",
                target: self.container_name.clone(),
                after: deadline,
            }),
        }
    }

    /// Build the creation request without touching the container namespace.
    ///
    /// Still inspects the image and prepares host directories.
    pub async fn container_spec(
        &self,
        runtime: &SailRuntime,
        image: &str,
    ) -> SailResult<ContainerSpec> {
        let engine = runtime.engine();
        let metadata = ImageMetadata::inspect(engine, image).await?;
        let project_dir = metadata.project_dir(&self.project_name);

        let assembler =
            MountAssembler::new(runtime.layout(), runtime.resolver(), runtime.code_server());
        let mounts = assembler
            .assemble(
                &MountInput {
                    container_name: &self.container_name,
                    project_local_dir: &self.project_local_dir,
                    project_dir: &project_dir,
                },
                &metadata,
            )
            .await?;

        Ok(ContainerSpec {
            name: self.container_name.clone(),
            image: image.to_string(),
            hostname: self.hostname.clone(),
            user: self.container_user(),
            cmd: vec![
                "bash".to_string(),
                "-c".to_string(),
                self.entry_command(&project_dir),
            ],
            labels: self.container_labels(&metadata, &project_dir),
            mounts,
            // The guest runs its own process-management surface.
            privileged: true,
            network: self.network.clone(),
            ip: self.ip.clone(),
        })
    }

    /// Image-declared reserved labels, overlaid with this container's own.
    fn container_labels(
        &self,
        metadata: &ImageMetadata,
        project_dir: &str,
    ) -> HashMap<String, String> {
        let mut out = metadata.sail_labels.clone();
        out.insert(labels::SAIL.to_string(), String::new());
        out.insert(labels::PROJECT_DIR.to_string(), project_dir.to_string());
        out.insert(
            labels::PROJECT_LOCAL_DIR.to_string(),
            self.project_local_dir.clone(),
        );
        out.insert(labels::PROJECT_NAME.to_string(), self.project_name.clone());
        out
    }

    async fn create_and_start(&self, runtime: &SailRuntime, image: &str) -> SailResult<()> {
        let spec = self.container_spec(runtime, image).await?;
        let engine = runtime.engine();

        let id = engine
            .create_container(&spec)
            .await
            .map_err(|e| SailError::engine("create container", &self.container_name, e))?;
        tracing::debug!(container = %self.container_name, id = %id, "Container created");

        if let Err(e) = engine.start_container(&self.container_name).await {
            let err = SailError::engine("start container", &self.container_name, e);
            tracing::warn!(
                container = %self.container_name,
                "Start failed, removing container: {}",
                err
            );
            if let Err(remove_err) = engine.remove_container(&self.container_name).await {
                tracing::warn!(
                    container = %self.container_name,
                    "Failed to remove container after start failure: {}",
                    remove_err
                );
            }
            return Err(err);
        }

        tracing::info!(container = %self.container_name, "Container started");
        Ok(())
    }
}
