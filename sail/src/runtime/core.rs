//! SailRuntime - entry point for creating and recovering containers.

use std::sync::Arc;

use crate::codeserver::{CachedCodeServer, CodeServerSource};
use crate::engine::{DockerEngine, Engine};
use crate::errors::{SailError, SailResult};
use crate::paths::PathResolver;
use crate::runner::Runner;
use crate::runtime::layout::SailLayout;
use crate::runtime::options::SailOptions;

/// Owns the engine handle and host-side collaborators shared by every
/// create and recover call.
///
/// Holds no container state: everything durable lives in the engine's
/// labels and mount specs, and a [`Runner`] can be rebuilt from them at any
/// time. Cheap to clone.
#[derive(Clone)]
pub struct SailRuntime {
    options: SailOptions,
    engine: Arc<dyn Engine>,
    layout: SailLayout,
    resolver: PathResolver,
    code_server: Arc<dyn CodeServerSource>,
}

impl std::fmt::Debug for SailRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SailRuntime")
            .field("options", &self.options)
            .field("layout", &self.layout)
            .finish()
    }
}

impl SailRuntime {
    /// Runtime over the local Docker daemon.
    pub fn connect(options: SailOptions) -> SailResult<Self> {
        let engine = DockerEngine::connect()
            .map_err(|e| SailError::engine("connect to", "docker daemon", e))?;
        Self::new(options, Arc::new(engine))
    }

    /// Runtime over `engine`, using the invoking user's home directory and
    /// the cached editor-server binary.
    pub fn new(options: SailOptions, engine: Arc<dyn Engine>) -> SailResult<Self> {
        let resolver = PathResolver::from_env()?;
        let layout = SailLayout::new(options.home_dir.clone());
        let binary = options
            .code_server_path
            .clone()
            .unwrap_or_else(|| layout.code_server_path());
        Self::with_parts(
            options,
            engine,
            resolver,
            Arc::new(CachedCodeServer::new(binary)),
        )
    }

    /// Runtime with every collaborator supplied by the caller.
    pub fn with_parts(
        options: SailOptions,
        engine: Arc<dyn Engine>,
        resolver: PathResolver,
        code_server: Arc<dyn CodeServerSource>,
    ) -> SailResult<Self> {
        options.sanitize()?;

        let layout = SailLayout::new(options.home_dir.clone());
        layout.prepare()?;

        tracing::debug!(home_dir = %layout.home_dir().display(), "initialized runtime");

        Ok(Self {
            options,
            engine,
            layout,
            resolver,
            code_server,
        })
    }

    pub fn options(&self) -> &SailOptions {
        &self.options
    }

    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    pub fn layout(&self) -> &SailLayout {
        &self.layout
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn code_server(&self) -> &dyn CodeServerSource {
        self.code_server.as_ref()
    }

    /// Create and start the container described by `runner`.
    ///
    /// The default network is created first if the runner attaches to it.
    /// Any other network must already exist.
    pub async fn run_container(&self, runner: &Runner, image: &str) -> SailResult<()> {
        if runner.network == self.options.default_network {
            self.ensure_default_network().await?;
        }
        runner.run_container(self, image).await
    }

    /// Create the default network with the configured subnet if absent.
    pub async fn ensure_default_network(&self) -> SailResult<()> {
        let name = &self.options.default_network;
        self.engine
            .ensure_network(name, &self.options.default_subnet)
            .await
            .map_err(|e| SailError::engine("create network", name, e))
    }

    /// Rebuild the Runner of an existing container.
    ///
    /// Uses the default network when `network` is `None`.
    pub async fn recover(&self, name: &str, network: Option<&str>) -> SailResult<Runner> {
        let network = network.unwrap_or(&self.options.default_network);
        Runner::from_container(self, name, network).await
    }
}
