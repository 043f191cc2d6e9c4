//! Docker engine backed by bollard.

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, NetworkingConfig,
    RemoveContainerOptions, StartContainerOptions,
};
use bollard::models::{
    EndpointIpamConfig, EndpointSettings, HostConfig, Ipam, IpamConfig, Mount as DockerMount,
    MountTypeEnum,
};
use bollard::network::{CreateNetworkOptions, InspectNetworkOptions};

use super::{ContainerDetails, ContainerSpec, Engine, ImageDetails};
use crate::errors::{EngineError, EngineResult};
use crate::volumes::{Mount, MountKind};

/// [`Engine`] over a local Docker daemon.
#[derive(Debug, Clone)]
pub struct DockerEngine {
    client: Docker,
}

impl DockerEngine {
    /// Connect using `DOCKER_HOST` or the platform default socket.
    pub fn connect() -> EngineResult<Self> {
        let client = Docker::connect_with_local_defaults()?;
        Ok(Self { client })
    }

    pub fn from_client(client: Docker) -> Self {
        Self { client }
    }
}

fn map_err(object: &str, err: bollard::errors::Error) -> EngineError {
    match err {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        } => EngineError::NotFound(object.to_string()),
        other => EngineError::Docker(other),
    }
}

fn is_conflict(err: &bollard::errors::Error) -> bool {
    matches!(
        err,
        bollard::errors::Error::DockerResponseServerError {
            status_code: 409,
            ..
        }
    )
}

fn network_options(name: &str, subnet: &str) -> CreateNetworkOptions<String> {
    CreateNetworkOptions {
        name: name.to_string(),
        driver: "bridge".to_string(),
        ipam: Ipam {
            driver: Some("default".to_string()),
            config: Some(vec![IpamConfig {
                subnet: Some(subnet.to_string()),
                ..Default::default()
            }]),
            options: None,
        },
        ..Default::default()
    }
}

fn to_docker_mount(mount: &Mount) -> DockerMount {
    let typ = match mount.kind {
        MountKind::Bind => MountTypeEnum::BIND,
    };
    DockerMount {
        typ: Some(typ),
        source: Some(mount.source.clone()),
        target: Some(mount.target.clone()),
        ..Default::default()
    }
}

#[async_trait]
impl Engine for DockerEngine {
    async fn inspect_image(&self, image: &str) -> EngineResult<ImageDetails> {
        let inspect = self
            .client
            .inspect_image(image)
            .await
            .map_err(|e| map_err(image, e))?;

        let config = inspect.config.unwrap_or_default();
        Ok(ImageDetails {
            labels: config.labels.unwrap_or_default(),
        })
    }

    async fn inspect_container(&self, name: &str) -> EngineResult<ContainerDetails> {
        let inspect = self
            .client
            .inspect_container(name, None::<InspectContainerOptions>)
            .await
            .map_err(|e| map_err(name, e))?;

        let config = inspect
            .config
            .ok_or_else(|| EngineError::Other(format!("container {} has no config", name)))?;
        Ok(ContainerDetails {
            hostname: config.hostname.unwrap_or_default(),
            user: config.user.unwrap_or_default(),
            labels: config.labels.unwrap_or_default(),
        })
    }

    async fn create_container(&self, spec: &ContainerSpec) -> EngineResult<String> {
        let endpoint = EndpointSettings {
            network_id: Some(spec.network.clone()),
            ip_address: Some(spec.ip.clone()),
            ipam_config: Some(EndpointIpamConfig {
                ipv4_address: Some(spec.ip.clone()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let config = Config {
            hostname: Some(spec.hostname.clone()),
            user: Some(spec.user.clone()),
            cmd: Some(spec.cmd.clone()),
            image: Some(spec.image.clone()),
            labels: Some(spec.labels.clone()),
            host_config: Some(HostConfig {
                mounts: Some(spec.mounts.iter().map(to_docker_mount).collect()),
                privileged: Some(spec.privileged),
                ..Default::default()
            }),
            networking_config: Some(NetworkingConfig {
                endpoints_config: HashMap::from([(spec.network.clone(), endpoint)]),
            }),
            ..Default::default()
        };

        let options = CreateContainerOptions {
            name: spec.name.clone(),
            platform: None,
        };

        let response = self
            .client
            .create_container(Some(options), config)
            .await
            .map_err(|e| map_err(&spec.image, e))?;

        for warning in &response.warnings {
            tracing::warn!(container = %spec.name, "engine warning: {}", warning);
        }
        Ok(response.id)
    }

    async fn start_container(&self, name: &str) -> EngineResult<()> {
        self.client
            .start_container(name, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| map_err(name, e))
    }

    async fn remove_container(&self, name: &str) -> EngineResult<()> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        self.client
            .remove_container(name, Some(options))
            .await
            .map_err(|e| map_err(name, e))
    }

    async fn container_ip(&self, name: &str, network: &str) -> EngineResult<String> {
        let inspect = self
            .client
            .inspect_container(name, None::<InspectContainerOptions>)
            .await
            .map_err(|e| map_err(name, e))?;

        let networks = inspect
            .network_settings
            .and_then(|settings| settings.networks)
            .unwrap_or_default();

        let endpoint = networks.get(network).ok_or_else(|| {
            EngineError::NotFound(format!("container {} is not on network {}", name, network))
        })?;

        endpoint
            .ip_address
            .clone()
            .filter(|ip| !ip.is_empty())
            .ok_or_else(|| {
                EngineError::Other(format!(
                    "container {} has no address on network {}",
                    name, network
                ))
            })
    }

    async fn ensure_network(&self, name: &str, subnet: &str) -> EngineResult<()> {
        match self
            .client
            .inspect_network(name, None::<InspectNetworkOptions<String>>)
            .await
        {
            Ok(_) => return Ok(()),
            Err(e) => match map_err(name, e) {
                EngineError::NotFound(_) => {}
                other => return Err(other),
            },
        }

        match self.client.create_network(network_options(name, subnet)).await {
            Ok(response) => {
                tracing::info!(
                    network = %name,
                    subnet = %subnet,
                    id = ?response.id,
                    "Created network"
                );
                Ok(())
            }
            // Created concurrently by someone else.
            Err(e) if is_conflict(&e) => Ok(()),
            Err(e) => Err(map_err(name, e)),
        }
    }
}
