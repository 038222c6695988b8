use anyhow::{Result, bail};
use pkg_constants::token::{KNOWN_USAGES, TOKEN_ID_LEN, TOKEN_SECRET_LEN};

fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Validate a bootstrap token id: exactly 6 chars of `[a-z0-9]`.
pub fn validate_token_id(id: &str) -> Result<()> {
    if id.len() != TOKEN_ID_LEN {
        bail!(
            "token id '{}' must be {} characters (got {})",
            id,
            TOKEN_ID_LEN,
            id.len()
        );
    }
    if !id.chars().all(is_token_char) {
        bail!("token id '{}' must contain only [a-z0-9]", id);
    }
    Ok(())
}

/// Validate a bootstrap token secret: exactly 16 chars of `[a-z0-9]`.
/// The secret itself is never echoed back in errors.
pub fn validate_token_secret(secret: &str) -> Result<()> {
    if secret.len() != TOKEN_SECRET_LEN {
        bail!(
            "token secret must be {} characters (got {})",
            TOKEN_SECRET_LEN,
            secret.len()
        );
    }
    if !secret.chars().all(is_token_char) {
        bail!("token secret must contain only [a-z0-9]");
    }
    Ok(())
}

/// Every usage must be one the bootstrap authenticator understands.
pub fn validate_usages(usages: &[String]) -> Result<()> {
    for usage in usages {
        if !KNOWN_USAGES.contains(&usage.as_str()) {
            bail!(
                "unknown token usage '{}' (expected one of: {})",
                usage,
                KNOWN_USAGES.join(", ")
            );
        }
    }
    Ok(())
}
