use anyhow::{Result, bail};
use chrono::{DateTime, TimeDelta, Utc};
use pkg_constants::token::{
    DESCRIPTION_KEY, EXPIRATION_KEY, TOKEN_ID_KEY, TOKEN_NAMESPACE, TOKEN_SECRET_KEY,
    TOKEN_SECRET_TYPE, USAGE_ENABLED, USAGE_KEY_PREFIX,
};
use pkg_state::ObjectClient;
use pkg_types::secret::Secret;
use pkg_types::token::BootstrapToken;
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

/// Encode a bootstrap token into secret data.
///
/// `token-id` and `token-secret` are the raw input bytes. Each usage becomes
/// `usage-<name>: "true"`. `description` is only written when non-empty and
/// `expiration` (RFC3339, now + ttl) only when `ttl` is non-zero; a ttl past
/// the last representable instant is clamped to it. Inputs are not validated
/// here.
pub fn encode_token_secret_data(
    id: &str,
    secret: &str,
    ttl: Duration,
    usages: &[String],
    description: &str,
) -> HashMap<String, Vec<u8>> {
    let mut data = HashMap::new();
    data.insert(TOKEN_ID_KEY.to_string(), id.as_bytes().to_vec());
    data.insert(TOKEN_SECRET_KEY.to_string(), secret.as_bytes().to_vec());

    if !ttl.is_zero() {
        let expiration = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        data.insert(
            EXPIRATION_KEY.to_string(),
            expiration.to_rfc3339().into_bytes(),
        );
    }
    for usage in usages {
        data.insert(
            format!("{}{}", USAGE_KEY_PREFIX, usage),
            USAGE_ENABLED.as_bytes().to_vec(),
        );
    }
    if !description.is_empty() {
        data.insert(DESCRIPTION_KEY.to_string(), description.as_bytes().to_vec());
    }
    data
}

/// Store `token` as a `bootstrap-token-<id>` secret in `kube-system`.
///
/// An existing secret for the same id has its data replaced wholesale, unless
/// `fail_if_exists` is set. Store errors other than not-found are returned
/// as-is and nothing is retried.
pub async fn update_or_create_token<C>(
    client: &C,
    token: &BootstrapToken,
    fail_if_exists: bool,
) -> Result<()>
where
    C: ObjectClient<Secret> + ?Sized,
{
    let name = token.secret_name();
    let data = encode_token_secret_data(
        &token.id,
        &token.secret,
        token.ttl,
        &token.usages,
        &token.description,
    );

    match client.get(TOKEN_NAMESPACE, &name).await {
        Ok(mut existing) => {
            if fail_if_exists {
                bail!("a token with id {:?} already exists", token.id);
            }
            existing.set_raw_data(data);
            client.update(&existing).await?;
            info!("Updated bootstrap token {}", token.id);
        }
        Err(e) if e.is_not_found() => {
            let mut secret = Secret::new(TOKEN_NAMESPACE, &name, TOKEN_SECRET_TYPE);
            secret.set_raw_data(data);
            client.create(&secret).await?;
            info!("Created bootstrap token {}", token.id);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
