//! Cluster discovery record constants.

/// Well-known name of the discovery ConfigMap.
pub const CLUSTER_INFO_NAME: &str = "cluster-info";

/// Namespace readable without credentials, where the discovery record lives.
pub const PUBLIC_NAMESPACE: &str = "kube-public";

/// Data key of the discovery record owned exclusively by the publisher.
pub const KUBECONFIG_KEY: &str = "kubeconfig";
