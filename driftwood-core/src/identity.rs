//! Ephemeral authoring identities.
//!
//! An identity is generated locally, held for the lifetime of whatever
//! component requested it, and never persisted. Generation is pure: no
//! network, no filesystem.

use crate::error::AddressError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A locally generated authoring credential.
///
/// The address takes the form `@{short_name}.b{digest}` where the digest is
/// derived from a freshly generated UUID, so two identities generated from
/// the same seed label are still distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorIdentity {
    pub short_name: String,
    pub address: String,
    pub secret: String,
}

impl AuthorIdentity {
    /// Generate a fresh ephemeral identity seeded with a human-readable
    /// short name.
    ///
    /// The short name must be exactly 4 lowercase ASCII letters.
    pub fn generate(seed_label: &str) -> Result<Self, AddressError> {
        validate_short_name(seed_label)?;

        let public = digest_hex(Uuid::new_v4().as_bytes());
        let secret = digest_hex(Uuid::new_v4().as_bytes());

        Ok(Self {
            short_name: seed_label.to_string(),
            address: format!("@{}.b{}", seed_label, &public[..52]),
            secret,
        })
    }
}

fn validate_short_name(name: &str) -> Result<(), AddressError> {
    if name.len() != 4 || !name.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(AddressError::InvalidShortName(name.to_string()));
    }
    Ok(())
}

fn digest_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}
