pub mod client;
pub mod object;

pub use client::StateStore;
pub use object::{Object, ObjectClient, RegistryClient, StoreError};
