//! Container engine interface.
//!
//! Everything sail persists lives in the engine's own object metadata, so
//! this trait is the only I/O boundary of the create and recover paths.
//!
//! - [`DockerEngine`] talks to a Docker daemon through bollard.
//! - [`mock::MockEngine`] keeps objects in memory for tests.

mod docker;
pub mod mock;

pub use docker::DockerEngine;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::EngineResult;
use crate::labels::LabelSet;
use crate::volumes::Mount;

/// What sail reads from an image.
#[derive(Debug, Clone, Default)]
pub struct ImageDetails {
    /// Labels of the resolved image configuration, flattened across layers.
    pub labels: LabelSet,
}

/// What sail reads from an existing container.
#[derive(Debug, Clone, Default)]
pub struct ContainerDetails {
    pub hostname: String,
    pub user: String,
    pub labels: LabelSet,
}

/// A fully assembled container creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub hostname: String,
    /// `uid:group`
    pub user: String,
    pub cmd: Vec<String>,
    pub labels: LabelSet,
    pub mounts: Vec<Mount>,
    pub privileged: bool,
    /// The single network the container is attached to.
    pub network: String,
    /// Static address on `network`.
    pub ip: String,
}

#[async_trait]
pub trait Engine: Send + Sync {
    async fn inspect_image(&self, image: &str) -> EngineResult<ImageDetails>;

    async fn inspect_container(&self, name: &str) -> EngineResult<ContainerDetails>;

    /// Create (but do not start) a container. Returns the engine's ID.
    async fn create_container(&self, spec: &ContainerSpec) -> EngineResult<String>;

    async fn start_container(&self, name: &str) -> EngineResult<()>;

    /// Force-remove a container.
    async fn remove_container(&self, name: &str) -> EngineResult<()>;

    /// Address of container `name` on `network`.
    async fn container_ip(&self, name: &str, network: &str) -> EngineResult<String>;

    /// Create network `name` with `subnet` unless it already exists.
    ///
    /// An existing network is left as is, whatever its subnet.
    async fn ensure_network(&self, name: &str, subnet: &str) -> EngineResult<()>;
}
