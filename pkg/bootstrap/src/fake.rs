//! Recording `ObjectClient` with injectable per-verb results.

use async_trait::async_trait;
use pkg_state::{Object, ObjectClient, StoreError};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Action<T> {
    Get { namespace: String, name: String },
    Create(T),
    Update(T),
}

impl<T> Action<T> {
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Get { .. } => "get",
            Action::Create(_) => "create",
            Action::Update(_) => "update",
        }
    }
}

/// Every verb answers from its reactor; calls are recorded in order.
pub struct FakeClient<T> {
    pub get_result: Result<T, StoreError>,
    pub create_err: Option<StoreError>,
    pub update_err: Option<StoreError>,
    actions: Mutex<Vec<Action<T>>>,
}

impl<T: Object> FakeClient<T> {
    pub fn new(get_result: Result<T, StoreError>) -> Self {
        Self {
            get_result,
            create_err: None,
            update_err: None,
            actions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_create_err(mut self, err: StoreError) -> Self {
        self.create_err = Some(err);
        self
    }

    pub fn with_update_err(mut self, err: StoreError) -> Self {
        self.update_err = Some(err);
        self
    }

    pub fn actions(&self) -> Vec<Action<T>> {
        self.actions.lock().unwrap().clone()
    }

    pub fn verbs(&self) -> Vec<&'static str> {
        self.actions().iter().map(Action::verb).collect()
    }
}

#[async_trait]
impl<T: Object> ObjectClient<T> for FakeClient<T> {
    async fn get(&self, namespace: &str, name: &str) -> Result<T, StoreError> {
        self.actions.lock().unwrap().push(Action::Get {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        self.get_result.clone()
    }

    async fn create(&self, obj: &T) -> Result<T, StoreError> {
        self.actions.lock().unwrap().push(Action::Create(obj.clone()));
        match &self.create_err {
            Some(err) => Err(err.clone()),
            None => Ok(obj.clone()),
        }
    }

    async fn update(&self, obj: &T) -> Result<T, StoreError> {
        self.actions.lock().unwrap().push(Action::Update(obj.clone()));
        match &self.update_err {
            Some(err) => Err(err.clone()),
            None => Ok(obj.clone()),
        }
    }
}

pub fn unauthorized() -> StoreError {
    StoreError::Unauthorized("go away!".to_string())
}
