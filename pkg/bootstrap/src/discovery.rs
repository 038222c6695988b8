//! Publishing of the public `cluster-info` discovery record.
//!
//! The record lives in `kube-public` so joining nodes can read it before they
//! hold any credentials. This module owns exactly one data key, `kubeconfig`;
//! every other key on the record belongs to someone else and is carried
//! through updates untouched.
//!
//! Publishing is get-then-create-or-update with no retry. Two publishers
//! racing between the get and the write resolve as last writer wins on
//! `kubeconfig`. A publisher that loses a create race fails with
//! `AlreadyExists`; running it again takes the update path.

use anyhow::{Context, Result};
use pkg_constants::discovery::{CLUSTER_INFO_NAME, KUBECONFIG_KEY, PUBLIC_NAMESPACE};
use pkg_state::{ObjectClient, StoreError};
use pkg_types::configmap::ConfigMap;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Publish the client configuration at `kubeconfig_path` as the discovery
/// record's `kubeconfig` value, creating the record if it does not exist.
pub async fn publish_cluster_info<C>(client: &C, kubeconfig_path: &Path) -> Result<()>
where
    C: ObjectClient<ConfigMap> + ?Sized,
{
    let content = tokio::fs::read_to_string(kubeconfig_path)
        .await
        .with_context(|| format!("failed to read {}", kubeconfig_path.display()))?;
    publish_cluster_info_bytes(client, &content).await
}

/// Same as [`publish_cluster_info`] for content already in memory.
pub async fn publish_cluster_info_bytes<C>(client: &C, kubeconfig: &str) -> Result<()>
where
    C: ObjectClient<ConfigMap> + ?Sized,
{
    match client.get(PUBLIC_NAMESPACE, CLUSTER_INFO_NAME).await {
        Ok(mut existing) => {
            let foreign = existing.data.as_ref().map_or(0, |d| {
                d.len() - usize::from(d.contains_key(KUBECONFIG_KEY))
            });
            existing
                .data
                .get_or_insert_with(HashMap::new)
                .insert(KUBECONFIG_KEY.to_string(), kubeconfig.to_string());
            client.update(&existing).await?;
            info!(
                "Updated {}/{} (kept {} other keys)",
                PUBLIC_NAMESPACE, CLUSTER_INFO_NAME, foreign
            );
        }
        Err(e) if e.is_not_found() => {
            debug!("{}/{} not found, creating it", PUBLIC_NAMESPACE, CLUSTER_INFO_NAME);
            let mut record = ConfigMap::new(PUBLIC_NAMESPACE, CLUSTER_INFO_NAME);
            record.data = Some(HashMap::from([(
                KUBECONFIG_KEY.to_string(),
                kubeconfig.to_string(),
            )]));
            client.create(&record).await?;
            info!("Created {}/{}", PUBLIC_NAMESPACE, CLUSTER_INFO_NAME);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Current `kubeconfig` value of the discovery record.
pub async fn read_cluster_info<C>(client: &C) -> Result<String>
where
    C: ObjectClient<ConfigMap> + ?Sized,
{
    let record = client.get(PUBLIC_NAMESPACE, CLUSTER_INFO_NAME).await?;
    record
        .get(KUBECONFIG_KEY)
        .map(str::to_string)
        .ok_or_else(|| {
            StoreError::not_found(
                "configmaps",
                PUBLIC_NAMESPACE,
                &format!("{}[{}]", CLUSTER_INFO_NAME, KUBECONFIG_KEY),
            )
            .into()
        })
}
