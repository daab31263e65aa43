//! Strongly-typed secret identifier
//!
//! A `SecretId` is the public lookup key of a secret. Its shareable form is
//! the 22-character URL-safe base64 token of the raw 16 bytes.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Prefix used in the abbreviated display form
const DISPLAY_PREFIX: &str = "sec-";

/// Length of the URL-safe token form
pub const TOKEN_LEN: usize = 22;

/// Error returned when a token or UUID string is not a valid secret id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid secret id")]
pub struct InvalidSecretId;

/// Identifier of a stored secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretId(Uuid);

impl SecretId {
    /// Create an ID from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Create an ID from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Encode as a URL-safe token for shareable links
    pub fn to_token(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0.as_bytes())
    }

    /// Decode a URL-safe token
    pub fn from_token(token: &str) -> Result<Self, InvalidSecretId> {
        let token = token.trim().trim_end_matches('=');
        if token.len() != TOKEN_LEN {
            return Err(InvalidSecretId);
        }
        let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|_| InvalidSecretId)?;
        let bytes: [u8; 16] = bytes.try_into().map_err(|_| InvalidSecretId)?;
        Ok(Self::from_bytes(bytes))
    }
}

/// Abbreviated form for logs and listings; not enough to address the secret.
impl fmt::Display for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DISPLAY_PREFIX, &self.0.simple().to_string()[..8])
    }
}

impl From<Uuid> for SecretId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for SecretId {
    type Err = InvalidSecretId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(uuid) = Uuid::parse_str(s.trim()) {
            return Ok(Self(uuid));
        }
        Self::from_token(s)
    }
}
