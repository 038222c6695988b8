use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,
    pub namespace: String,
    #[serde(default, rename = "type")]
    pub secret_type: String,
    /// Secret data stored as base64-encoded values.
    #[serde(default)]
    pub data: HashMap<String, String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Secret {
    pub fn new(namespace: &str, name: &str, secret_type: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            secret_type: secret_type.to_string(),
            data: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Replace all data with the given raw values, base64-encoding each one.
    pub fn set_raw_data(&mut self, raw: HashMap<String, Vec<u8>>) {
        self.data = raw
            .into_iter()
            .map(|(k, v)| (k, STANDARD.encode(v)))
            .collect();
    }

    /// Decode every data value back into raw bytes.
    pub fn raw_data(&self) -> anyhow::Result<HashMap<String, Vec<u8>>> {
        self.data
            .iter()
            .map(|(k, v)| {
                STANDARD
                    .decode(v)
                    .map(|bytes| (k.clone(), bytes))
                    .map_err(|e| anyhow::anyhow!("secret key '{}' is not valid base64: {}", k, e))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_data_survives_encoding() {
        let mut secret = Secret::new("kube-system", "bootstrap-token-abcdef", "opaque");
        let mut raw = HashMap::new();
        raw.insert("token-id".to_string(), b"abcdef".to_vec());
        raw.insert("binary".to_string(), vec![0u8, 255, 10, 13]);
        secret.set_raw_data(raw.clone());

        assert_eq!(secret.data["token-id"], "YWJjZGVm");
        assert_eq!(secret.raw_data().unwrap(), raw);
    }

    #[test]
    fn invalid_base64_is_reported() {
        let mut secret = Secret::new("kube-system", "broken", "opaque");
        secret.data.insert("token-id".to_string(), "not base64!".to_string());
        let err = secret.raw_data().unwrap_err();
        assert!(err.to_string().contains("token-id"));
    }
}
