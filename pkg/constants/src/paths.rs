//! Filesystem path constants.

/// Default config file path for the kubeboot CLI.
pub const DEFAULT_CONFIG: &str = "/etc/kubeboot/config.yaml";

/// Default data directory for the state store.
pub const DEFAULT_DATA_DIR: &str = "/tmp/kubeboot-data";

/// Default admin client configuration published as cluster discovery info.
pub const DEFAULT_ADMIN_KUBECONFIG: &str = "/etc/kubernetes/admin.conf";
