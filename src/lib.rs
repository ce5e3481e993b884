//! Salted, iterated, peppered password hashing for credentials at rest.
//!
//! The canonical [`Hasher`] embeds a per-record iteration count, drawn at
//! random from a configured range, inside an encrypted salt. New records
//! can be made costlier over time while old ones stay verifiable, and an
//! attacker holding only the credential store learns neither the salt
//! text nor the work factor of any record. [`PepperHasher`] is the
//! simpler fixed-cost strategy: cleartext salt, a secret pepper mixed in
//! at derivation time, one global iteration count.
//!
//! ```
//! use saltpeter::{Config, Hasher};
//!
//! # fn main() -> saltpeter::Result<()> {
//! let hasher = Hasher::new(Config::builder().key("server-held secret").build());
//! let credential = hasher.hash("correct horse battery staple")?;
//!
//! // store credential.salt() and credential.hash(), verify on login
//! assert!(hasher.verify("correct horse battery staple", credential.salt(), credential.hash())?);
//! assert!(!hasher.verify("tr0ub4dor", credential.salt(), credential.hash())?);
//! # Ok(())
//! # }
//! ```
//!
//! Hashing is CPU-bound on purpose. Callers on async runtimes should move
//! [`Hasher::hash`] and [`Hasher::verify`] onto a blocking-friendly
//! executor; every method takes `&self`, so one hasher can be shared
//! freely across threads.

mod config;
mod crypto;
mod error;
mod pepper;

pub use crate::config::{Config, ConfigBuilder, IterationRange, PepperConfig, PepperConfigBuilder};
pub use crate::crypto::{CipherAlgorithm, Digest};
pub use crate::error::{Error, Result};
pub use crate::pepper::PepperHasher;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::crypto::{kdf, salt as codec};

/// A hashed credential ready for storage: the persisted salt and the
/// base64 hash. Contains no plaintext and no usable key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub(crate) salt: String,
    pub(crate) hash: String,
}

impl Credential {
    /// The salt to store verbatim and pass back to [`Hasher::compare`].
    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Split into `(salt, hash)` for callers storing them as columns.
    pub fn into_parts(self) -> (String, String) {
        (self.salt, self.hash)
    }
}

/// The variable-cost hasher.
///
/// `hash` picks an iteration count from the configured range, seals it
/// with random salt text into an encrypted payload, and derives the hash
/// from the password and that sealed payload. `compare` decrypts the
/// stored salt to recover the count and re-derives. Everything a record
/// needs for verification travels inside its salt, so the iteration range
/// can be raised at any time without touching existing records.
pub struct Hasher {
    config: Config,
}

impl Hasher {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Hash a plaintext password for storage.
    ///
    /// An empty password is hashed like any other; rejecting weak inputs
    /// is policy and belongs to the caller.
    pub fn hash(&self, password: &str) -> Result<Credential> {
        let iterations = self.config.iterations().sample()?;
        let payload =
            codec::salt_payload(iterations, self.config.unencrypted_salt_min_length())?;
        let salt = codec::encrypt_salt(self.config.algorithm(), self.config.key(), &payload)?;
        let derived = kdf::derive(
            password,
            salt.as_bytes(),
            iterations,
            self.config.hash_length(),
            self.config.digest(),
        )?;

        Ok(Credential {
            salt,
            hash: BASE64.encode(derived),
        })
    }

    /// Re-derive the hash for `password` under a stored salt.
    ///
    /// Returns the base64 hash the pair produces with the current
    /// configuration; it equals the stored hash exactly when the password
    /// is the one originally hashed. [`verify`](Self::verify) does the
    /// final comparison for you.
    pub fn compare(&self, password: &str, salt: &str) -> Result<String> {
        if password.is_empty() {
            return Err(Error::InvalidInput);
        }
        if salt.is_empty() {
            return Err(Error::InvalidSalt);
        }

        let iterations = self.recover_iterations(salt)?;
        let derived = kdf::derive(
            password,
            salt.as_bytes(),
            iterations,
            self.config.hash_length(),
            self.config.digest(),
        )?;
        Ok(BASE64.encode(derived))
    }

    /// Check `password` against a stored salt and hash.
    ///
    /// The hash comparison is constant-time. Errors mean the check could
    /// not be carried out; a clean mismatch is `Ok(false)`.
    pub fn verify(&self, password: &str, salt: &str, hash: &str) -> Result<bool> {
        let candidate = self.compare(password, salt)?;
        Ok(candidate.as_bytes().ct_eq(hash.as_bytes()).into())
    }

    /// Recover the iteration count sealed inside a persisted salt.
    ///
    /// Useful for cost audits: records hashed under an older, cheaper
    /// range can be found and queued for re-hashing on next login.
    pub fn recover_iterations(&self, salt: &str) -> Result<u32> {
        if salt.is_empty() {
            return Err(Error::InvalidSalt);
        }
        let payload =
            codec::decrypt_salt(self.config.algorithm(), self.config.key(), salt)?;
        codec::extract_iterations(&payload, self.config.unencrypted_salt_min_length())
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
