//! Bootstrap token constants.

/// Namespace where bootstrap token secrets are stored.
pub const TOKEN_NAMESPACE: &str = "kube-system";

/// Secret name prefix. Full name = `TOKEN_SECRET_PREFIX + token_id`.
pub const TOKEN_SECRET_PREFIX: &str = "bootstrap-token-";

/// Secret type for bootstrap tokens.
pub const TOKEN_SECRET_TYPE: &str = "bootstrap.kubernetes.io/token";

// ─── Secret data keys ─────────────────────────────────────────────────────

pub const TOKEN_ID_KEY: &str = "token-id";

pub const TOKEN_SECRET_KEY: &str = "token-secret";

/// RFC3339 absolute expiry; only present when the token has a TTL.
pub const EXPIRATION_KEY: &str = "expiration";

pub const DESCRIPTION_KEY: &str = "description";

/// Usage key prefix. Full key = `USAGE_KEY_PREFIX + usage`.
pub const USAGE_KEY_PREFIX: &str = "usage-";

/// Marker value written for every granted usage.
pub const USAGE_ENABLED: &str = "true";

// ─── Format ───────────────────────────────────────────────────────────────

/// Length of the public token id.
pub const TOKEN_ID_LEN: usize = 6;

/// Length of the private token secret.
pub const TOKEN_SECRET_LEN: usize = 16;

/// Alphabet used for ids and secrets.
pub const TOKEN_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Usages a bootstrap token may be granted.
pub const KNOWN_USAGES: &[&str] = &["signing", "authentication"];

/// Default token lifetime when neither CLI nor config file sets one.
pub const DEFAULT_TOKEN_TTL: &str = "24h";
