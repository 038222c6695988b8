use anyhow::{Result, bail};
use pkg_constants::token::{
    TOKEN_CHARSET, TOKEN_ID_LEN, TOKEN_SECRET_LEN, TOKEN_SECRET_PREFIX,
};
use rand::Rng;
use std::fmt;
use std::time::Duration;

use crate::validate::{validate_token_id, validate_token_secret};

/// A bootstrap token as handed to a joining node: `<id>.<secret>`.
///
/// Only the encoded secret form is ever persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapToken {
    pub id: String,
    pub secret: String,
    /// Zero means the token never expires.
    pub ttl: Duration,
    pub usages: Vec<String>,
    pub description: String,
}

impl BootstrapToken {
    pub fn new(id: &str, secret: &str) -> Self {
        Self {
            id: id.to_string(),
            secret: secret.to_string(),
            ttl: Duration::ZERO,
            usages: Vec::new(),
            description: String::new(),
        }
    }

    /// Generate a random, well-formed token.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let id = random_string(&mut rng, TOKEN_ID_LEN);
        let secret = random_string(&mut rng, TOKEN_SECRET_LEN);
        Self::new(&id, &secret)
    }

    /// Parse and validate a token string of the form `<id>.<secret>`.
    pub fn parse(token: &str) -> Result<Self> {
        let Some((id, secret)) = token.split_once('.') else {
            bail!("token must be of the form '<id>.<secret>'");
        };
        validate_token_id(id)?;
        validate_token_secret(secret)?;
        Ok(Self::new(id, secret))
    }

    /// Name of the secret object this token is persisted under.
    pub fn secret_name(&self) -> String {
        format!("{}{}", TOKEN_SECRET_PREFIX, self.id)
    }

    /// Token string safe for logs: id plus the first chars of the secret.
    pub fn redacted(&self) -> String {
        let prefix: String = self.secret.chars().take(4).collect();
        format!("{}.{}***", self.id, prefix)
    }
}

impl fmt::Display for BootstrapToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.id, self.secret)
    }
}

fn random_string(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| TOKEN_CHARSET[rng.random_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

/// Parse a TTL such as `24h`, `1h30m`, `90s` or `0`.
pub fn parse_ttl(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        bail!("ttl must not be empty");
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            bail!("invalid ttl '{}': unit '{}' has no value", s, c);
        }
        let value: u64 = digits.parse()?;
        let unit = match c {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => bail!("invalid ttl '{}': unknown unit '{}' (use h, m or s)", s, c),
        };
        total = match value.checked_mul(unit).and_then(|v| total.checked_add(v)) {
            Some(t) => t,
            None => bail!("invalid ttl '{}': value too large", s),
        };
        digits.clear();
    }
    if !digits.is_empty() {
        bail!("invalid ttl '{}': missing unit after '{}'", s, digits);
    }
    Ok(Duration::from_secs(total))
}
