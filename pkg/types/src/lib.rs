pub mod config;
pub mod configmap;
pub mod kubeconfig;
pub mod secret;
pub mod token;
pub mod validate;
