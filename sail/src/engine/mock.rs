//! In-memory engine for tests.
//!
//! Created containers are recorded and become inspectable, so a create can be
//! followed by a recover against the same engine.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ContainerDetails, ContainerSpec, Engine, ImageDetails};
use crate::errors::{EngineError, EngineResult};
use crate::labels::LabelSet;

#[derive(Debug, Clone)]
struct MockContainer {
    details: ContainerDetails,
    /// network name -> address
    addresses: HashMap<String, String>,
    started: bool,
}

#[derive(Debug, Default)]
struct MockState {
    images: HashMap<String, ImageDetails>,
    containers: HashMap<String, MockContainer>,
    /// network name -> subnet
    networks: HashMap<String, String>,
    created: Vec<ContainerSpec>,
    removed: Vec<String>,
}

/// Behaviour knobs for [`MockEngine`].
#[derive(Debug, Clone, Default)]
pub struct MockEngineConfig {
    /// Fail every `start_container` call.
    pub fail_start: bool,
    /// Fail every `remove_container` call.
    pub fail_remove: bool,
    /// Sleep this long inside `create_container`.
    pub create_delay: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct MockEngine {
    config: MockEngineConfig,
    state: Mutex<MockState>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MockEngineConfig) -> Self {
        Self {
            config,
            state: Mutex::default(),
        }
    }

    /// Register an image with the given labels.
    pub fn add_image(&self, reference: &str, labels: LabelSet) {
        self.state
            .lock()
            .images
            .insert(reference.to_string(), ImageDetails { labels });
    }

    /// Register a pre-existing container.
    pub fn add_container(&self, name: &str, details: ContainerDetails, network: &str, ip: &str) {
        self.state.lock().containers.insert(
            name.to_string(),
            MockContainer {
                details,
                addresses: HashMap::from([(network.to_string(), ip.to_string())]),
                started: true,
            },
        );
    }

    /// Register a pre-existing network.
    pub fn add_network(&self, name: &str, subnet: &str) {
        self.state
            .lock()
            .networks
            .insert(name.to_string(), subnet.to_string());
    }

    /// Subnet of network `name`, if it exists.
    pub fn network_subnet(&self, name: &str) -> Option<String> {
        self.state.lock().networks.get(name).cloned()
    }

    pub fn network_count(&self) -> usize {
        self.state.lock().networks.len()
    }

    /// Every creation request received, in order.
    pub fn created(&self) -> Vec<ContainerSpec> {
        self.state.lock().created.clone()
    }

    /// Names of containers removed, in order.
    pub fn removed(&self) -> Vec<String> {
        self.state.lock().removed.clone()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.state.lock().containers.contains_key(name)
    }

    pub fn is_started(&self, name: &str) -> bool {
        self.state
            .lock()
            .containers
            .get(name)
            .is_some_and(|c| c.started)
    }
}

#[async_trait]
impl Engine for MockEngine {
    async fn inspect_image(&self, image: &str) -> EngineResult<ImageDetails> {
        self.state
            .lock()
            .images
            .get(image)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(image.to_string()))
    }

    async fn inspect_container(&self, name: &str) -> EngineResult<ContainerDetails> {
        self.state
            .lock()
            .containers
            .get(name)
            .map(|c| c.details.clone())
            .ok_or_else(|| EngineError::NotFound(name.to_string()))
    }

    async fn create_container(&self, spec: &ContainerSpec) -> EngineResult<String> {
        if let Some(delay) = self.config.create_delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock();
        if state.containers.contains_key(&spec.name) {
            return Err(EngineError::Other(format!(
                "Conflict. The container name \"/{}\" is already in use",
                spec.name
            )));
        }
        if !state.images.contains_key(&spec.image) {
            return Err(EngineError::NotFound(spec.image.clone()));
        }
        if !state.networks.contains_key(&spec.network) {
            return Err(EngineError::NotFound(format!("network {}", spec.network)));
        }

        state.containers.insert(
            spec.name.clone(),
            MockContainer {
                details: ContainerDetails {
                    hostname: spec.hostname.clone(),
                    user: spec.user.clone(),
                    labels: spec.labels.clone(),
                },
                addresses: HashMap::from([(spec.network.clone(), spec.ip.clone())]),
                started: false,
            },
        );
        state.created.push(spec.clone());
        Ok(format!("mock-{}", spec.name))
    }

    async fn start_container(&self, name: &str) -> EngineResult<()> {
        if self.config.fail_start {
            return Err(EngineError::Other("mock start failure".into()));
        }
        let mut state = self.state.lock();
        let container = state
            .containers
            .get_mut(name)
            .ok_or_else(|| EngineError::NotFound(name.to_string()))?;
        container.started = true;
        Ok(())
    }

    async fn remove_container(&self, name: &str) -> EngineResult<()> {
        if self.config.fail_remove {
            return Err(EngineError::Other("mock remove failure".into()));
        }
        let mut state = self.state.lock();
        state
            .containers
            .remove(name)
            .ok_or_else(|| EngineError::NotFound(name.to_string()))?;
        state.removed.push(name.to_string());
        Ok(())
    }

    async fn container_ip(&self, name: &str, network: &str) -> EngineResult<String> {
        let state = self.state.lock();
        let container = state
            .containers
            .get(name)
            .ok_or_else(|| EngineError::NotFound(name.to_string()))?;
        container
            .addresses
            .get(network)
            .cloned()
            .ok_or_else(|| {
                EngineError::NotFound(format!("container {} is not on network {}", name, network))
            })
    }

    async fn ensure_network(&self, name: &str, subnet: &str) -> EngineResult<()> {
        self.state
            .lock()
            .networks
            .entry(name.to_string())
            .or_insert_with(|| subnet.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_network_is_idempotent() {
        let engine = MockEngine::new();

        engine.ensure_network("sail", "172.20.0.0/16").await.unwrap();
        engine.ensure_network("sail", "10.0.0.0/8").await.unwrap();

        assert_eq!(engine.network_count(), 1);
        assert_eq!(engine.network_subnet("sail").as_deref(), Some("172.20.0.0/16"));
    }
}
