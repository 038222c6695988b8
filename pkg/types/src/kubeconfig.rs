//! Minimal client configuration (kubeconfig) model.
//!
//! Only the parts needed to derive a credential-free discovery config are
//! modeled; user entries are kept opaque.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KubeConfig {
    #[serde(default, rename = "apiVersion", skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub clusters: Vec<NamedCluster>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<NamedContext>,
    #[serde(default, rename = "current-context", skip_serializing_if = "String::is_empty")]
    pub current_context: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<NamedUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedCluster {
    #[serde(default)]
    pub name: String,
    pub cluster: Cluster,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Cluster {
    pub server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_authority_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_authority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure_skip_tls_verify: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedContext {
    pub name: String,
    pub context: Context,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub cluster: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedUser {
    pub name: String,
    #[serde(default)]
    pub user: serde_yaml::Value,
}

impl KubeConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| anyhow!("invalid kubeconfig: {}", e))
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The cluster referenced by the current context.
    pub fn current_cluster(&self) -> Result<&Cluster> {
        let context = self
            .contexts
            .iter()
            .find(|c| c.name == self.current_context)
            .ok_or_else(|| anyhow!("current context '{}' not found", self.current_context))?;
        self.clusters
            .iter()
            .find(|c| c.name == context.context.cluster)
            .map(|c| &c.cluster)
            .ok_or_else(|| {
                anyhow!(
                    "cluster '{}' of context '{}' not found",
                    context.context.cluster,
                    context.name
                )
            })
    }

    /// Config carrying only the current cluster's server and CA, under an
    /// unnamed entry. No contexts, users or credentials.
    pub fn discovery_config(&self) -> Result<KubeConfig> {
        let cluster = self.current_cluster()?.clone();
        Ok(KubeConfig {
            api_version: Some("v1".to_string()),
            kind: Some("Config".to_string()),
            clusters: vec![NamedCluster {
                name: String::new(),
                cluster,
            }],
            ..Default::default()
        })
    }
}

/// Strip everything but the current cluster from a client configuration.
pub fn sanitize_kubeconfig(content: &str) -> Result<String> {
    KubeConfig::from_yaml(content)?.discovery_config()?.to_yaml()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN_CONFIG: &str = r#"apiVersion: v1
clusters:
- cluster:
    server: https://10.128.0.6:6443
    certificate-authority-data: Q0EgREFUQQ==
  name: kubernetes
- cluster:
    server: https://10.0.0.9:6443
  name: other
contexts:
- context:
    cluster: kubernetes
    user: kubernetes-admin
  name: kubernetes-admin@kubernetes
current-context: kubernetes-admin@kubernetes
kind: Config
preferences: {}
users:
- name: kubernetes-admin
  user:
    client-key-data: U0VDUkVU
"#;

    #[test]
    fn resolves_current_cluster() {
        let cfg = KubeConfig::from_yaml(ADMIN_CONFIG).unwrap();
        let cluster = cfg.current_cluster().unwrap();
        assert_eq!(cluster.server, "https://10.128.0.6:6443");
        assert_eq!(cluster.certificate_authority_data.as_deref(), Some("Q0EgREFUQQ=="));
    }

    #[test]
    fn sanitized_config_has_no_credentials() {
        let out = sanitize_kubeconfig(ADMIN_CONFIG).unwrap();
        assert!(!out.contains("client-key-data"));
        assert!(!out.contains("kubernetes-admin"));
        assert!(!out.contains("10.0.0.9"));

        let parsed = KubeConfig::from_yaml(&out).unwrap();
        assert_eq!(parsed.clusters.len(), 1);
        assert_eq!(parsed.clusters[0].cluster.server, "https://10.128.0.6:6443");
        assert!(parsed.users.is_empty());
        assert!(parsed.contexts.is_empty());
    }

    #[test]
    fn missing_context_is_an_error() {
        let cfg = KubeConfig::from_yaml("clusters: []\ncurrent-context: nope\n").unwrap();
        assert!(cfg.discovery_config().is_err());
        assert!(sanitize_kubeconfig("clusters: [unclosed").is_err());
    }
}
