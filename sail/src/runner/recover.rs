//! Recover path: rebuild a Runner from an existing container.

use super::{RunMode, Runner};
use crate::errors::{SailError, SailResult};
use crate::labels::SailLabels;
use crate::runtime::SailRuntime;
use crate::runtime::constants::labels;

impl Runner {
    /// Rebuild the Runner of container `name` from its stored configuration
    /// plus its live address on `network`.
    ///
    /// All or nothing: any failed lookup or missing control label is an error.
    pub async fn from_container(
        runtime: &SailRuntime,
        name: &str,
        network: &str,
    ) -> SailResult<Runner> {
        let engine = runtime.engine();

        let details = engine
            .inspect_container(name)
            .await
            .map_err(|e| SailError::engine("inspect container", name, e))?;

        let view = SailLabels::from_labels(&details.labels);
        if !view.present {
            return Err(SailError::InvalidState(format!(
                "container {} is not a sail container (missing {:?} label)",
                name,
                labels::SAIL
            )));
        }
        let missing = |key: &str| {
            SailError::InvalidState(format!("container {} is missing label {:?}", name, key))
        };
        let project_local_dir = view
            .project_local_dir
            .ok_or_else(|| missing(labels::PROJECT_LOCAL_DIR))?;
        let project_name = view
            .project_name
            .ok_or_else(|| missing(labels::PROJECT_NAME))?;

        let ip = engine
            .container_ip(name, network)
            .await
            .map_err(|e| SailError::engine("look up address of", name, e))?;

        tracing::debug!(container = %name, network = %network, ip = %ip, "Recovered runner");

        Ok(Runner {
            container_name: name.to_string(),
            project_name,
            hostname: details.hostname,
            project_local_dir,
            host_user: details.user,
            network: network.to_string(),
            ip,
            mode: RunMode::Interactive,
        })
    }
}
