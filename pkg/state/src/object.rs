//! Typed get/create/update access to namespaced objects.

use async_trait::async_trait;
use pkg_types::configmap::ConfigMap;
use pkg_types::secret::Secret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::client::StateStore;

/// Failure of a single store call. `NotFound` is the only kind callers are
/// expected to recover from; everything else is terminal for the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} \"{namespace}/{name}\" not found")]
    NotFound {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("{kind} \"{namespace}/{name}\" already exists")]
    AlreadyExists {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("store backend error: {0}")]
    Backend(String),

    #[error("failed to encode or decode object: {0}")]
    Codec(String),
}

impl StoreError {
    pub fn not_found(kind: &str, namespace: &str, name: &str) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn already_exists(kind: &str, namespace: &str, name: &str) -> Self {
        Self::AlreadyExists {
            kind: kind.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True if `err` is, or wraps, a `NotFound` store error.
    pub fn is_not_found_err(err: &anyhow::Error) -> bool {
        err.downcast_ref::<StoreError>()
            .is_some_and(StoreError::is_not_found)
    }
}

/// A namespaced object addressable by `(namespace, name)`.
pub trait Object: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Plural resource name, also the registry key segment.
    const KIND: &'static str;

    fn namespace(&self) -> &str;
    fn name(&self) -> &str;
}

impl Object for ConfigMap {
    const KIND: &'static str = "configmaps";

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Object for Secret {
    const KIND: &'static str = "secrets";

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The three verbs the bootstrap phases need from an object store.
///
/// Each call is individually atomic; nothing spans calls.
#[async_trait]
pub trait ObjectClient<T: Object>: Send + Sync {
    async fn get(&self, namespace: &str, name: &str) -> Result<T, StoreError>;

    /// Fails with `AlreadyExists` if an object with the same name exists.
    async fn create(&self, obj: &T) -> Result<T, StoreError>;

    /// Fails with `NotFound` if there is nothing to replace.
    async fn update(&self, obj: &T) -> Result<T, StoreError>;
}

/// `ObjectClient` over the SlateDB state store, one JSON value per object
/// under `/registry/<kind>/<namespace>/<name>`.
#[derive(Clone)]
pub struct RegistryClient {
    store: StateStore,
}

impl RegistryClient {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    fn key(kind: &str, namespace: &str, name: &str) -> String {
        format!("/registry/{}/{}/{}", kind, namespace, name)
    }

    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.store
            .get(key)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn write<T: Object>(&self, key: &str, obj: &T) -> Result<(), StoreError> {
        let data = serde_json::to_vec(obj).map_err(|e| StoreError::Codec(e.to_string()))?;
        self.store
            .put(key, &data)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl<T: Object> ObjectClient<T> for RegistryClient {
    async fn get(&self, namespace: &str, name: &str) -> Result<T, StoreError> {
        let key = Self::key(T::KIND, namespace, name);
        match self.read(&key).await? {
            Some(data) => {
                serde_json::from_slice(&data).map_err(|e| StoreError::Codec(e.to_string()))
            }
            None => Err(StoreError::not_found(T::KIND, namespace, name)),
        }
    }

    async fn create(&self, obj: &T) -> Result<T, StoreError> {
        let key = Self::key(T::KIND, obj.namespace(), obj.name());
        let _guard = self.store.write_lock().await;
        if self.read(&key).await?.is_some() {
            return Err(StoreError::already_exists(T::KIND, obj.namespace(), obj.name()));
        }
        self.write(&key, obj).await?;
        debug!("Created {} {}/{}", T::KIND, obj.namespace(), obj.name());
        Ok(obj.clone())
    }

    async fn update(&self, obj: &T) -> Result<T, StoreError> {
        let key = Self::key(T::KIND, obj.namespace(), obj.name());
        let _guard = self.store.write_lock().await;
        if self.read(&key).await?.is_none() {
            return Err(StoreError::not_found(T::KIND, obj.namespace(), obj.name()));
        }
        self.write(&key, obj).await?;
        debug!("Updated {} {}/{}", T::KIND, obj.namespace(), obj.name());
        Ok(obj.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    async fn client() -> RegistryClient {
        RegistryClient::new(StateStore::in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let client = client().await;
        let err = ObjectClient::<ConfigMap>::get(&client, "kube-public", "cluster-info")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "configmaps \"kube-public/cluster-info\" not found");
    }

    #[tokio::test]
    async fn create_then_get() {
        let client = client().await;
        let mut cm = ConfigMap::new("kube-public", "cluster-info");
        cm.data = Some(HashMap::from([("a".to_string(), "1".to_string())]));
        client.create(&cm).await.unwrap();

        let got: ConfigMap = client.get("kube-public", "cluster-info").await.unwrap();
        assert_eq!(got, cm);
    }

    #[tokio::test]
    async fn create_twice_fails() {
        let client = client().await;
        let cm = ConfigMap::new("kube-public", "cluster-info");
        client.create(&cm).await.unwrap();
        let err = client.create(&cm).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn update_requires_existing() {
        let client = client().await;
        let secret = Secret::new("kube-system", "bootstrap-token-abcdef", "opaque");
        let err = client.update(&secret).await.unwrap_err();
        assert!(err.is_not_found());

        client.create(&secret).await.unwrap();
        let mut changed = secret.clone();
        changed.data.insert("token-id".to_string(), "YWJjZGVm".to_string());
        client.update(&changed).await.unwrap();
        let got: Secret = client.get("kube-system", "bootstrap-token-abcdef").await.unwrap();
        assert_eq!(got.data["token-id"], "YWJjZGVm");
    }

    #[tokio::test]
    async fn kinds_do_not_collide() {
        let client = client().await;
        let cm = ConfigMap::new("ns", "same");
        client.create(&cm).await.unwrap();
        let res: Result<Secret, _> = client.get("ns", "same").await;
        assert!(res.unwrap_err().is_not_found());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_have_one_winner() {
        for round in 0..50 {
            let store = StateStore::in_memory().await.unwrap();
            let cm = ConfigMap::new("kube-public", &format!("cluster-info-{}", round));

            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let client = RegistryClient::new(store.clone());
                    let cm = cm.clone();
                    tokio::spawn(async move { client.create(&cm).await })
                })
                .collect();

            let mut created = 0;
            for handle in handles {
                match handle.await.unwrap() {
                    Ok(_) => created += 1,
                    Err(e) => assert!(matches!(e, StoreError::AlreadyExists { .. })),
                }
            }
            assert_eq!(created, 1, "round {} had {} successful creates", round, created);
        }
    }

    #[test]
    fn not_found_survives_anyhow() {
        let err: anyhow::Error = StoreError::not_found("configmaps", "ns", "x").into();
        assert!(StoreError::is_not_found_err(&err));
        let err: anyhow::Error = StoreError::Unauthorized("go away!".into()).into();
        assert!(!StoreError::is_not_found_err(&err));
    }
}
