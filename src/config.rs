//! Typed configuration for the two hashing strategies.
//!
//! The configurable surface is a closed set of struct fields instead of a
//! free-form options bag: unknown keys fail to parse, and every value has
//! the type the hasher expects. A failed [`Config::from_json`] call
//! returns an error and leaves nothing half-applied.

use serde::{Deserialize, Deserializer};
use std::fmt;
use zeroize::Zeroize;

use crate::crypto::{random, CipherAlgorithm, Digest};
use crate::error::{Error, Result};

/// Inclusive range the per-record iteration count is drawn from.
///
/// An inverted range is representable; it fails on [`sample`](Self::sample),
/// at the hashing call that tries to use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationRange {
    min: u32,
    max: u32,
}

impl IterationRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Draw a uniformly random iteration count from the range.
    pub fn sample(&self) -> Result<u32> {
        random::random_in_range(self.min, self.max)
    }
}

impl<'de> Deserialize<'de> for IterationRange {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [min, max] = <[u32; 2]>::deserialize(deserializer).map_err(|_| {
            serde::de::Error::custom("iterations must be a [min, max] pair of integers")
        })?;
        Ok(Self { min, max })
    }
}

fn default_hash_length() -> usize {
    128
}

fn default_iterations() -> IterationRange {
    IterationRange::new(12_000, 15_000)
}

fn default_key() -> String {
    String::from("ENCRYPTION KEY")
}

fn default_salt_min_length() -> usize {
    32
}

/// Configuration for the variable-cost [`Hasher`](crate::Hasher).
///
/// The default `key` is a placeholder. Deployments must set their own and
/// keep it out of the credential store, otherwise the embedded iteration
/// counts are readable by anyone holding the records.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_hash_length")]
    hash_length: usize,
    #[serde(default = "default_iterations")]
    iterations: IterationRange,
    #[serde(default = "default_key")]
    key: String,
    #[serde(default)]
    algorithm: CipherAlgorithm,
    #[serde(default)]
    digest: Digest,
    #[serde(default = "default_salt_min_length")]
    unencrypted_salt_min_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hash_length: default_hash_length(),
            iterations: default_iterations(),
            key: default_key(),
            algorithm: CipherAlgorithm::default(),
            digest: Digest::default(),
            unencrypted_salt_min_length: default_salt_min_length(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse a JSON configuration, merging the given keys over the defaults.
    ///
    /// Keys use the camelCase wire names (`hashLength`, `iterations`,
    /// `key`, `algorithm`, `digest`, `unencryptedSaltMinLength`). A value
    /// of the wrong type or an unknown key rejects the whole document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigType(e.to_string()))
    }

    /// Length of the derived hash in bytes, before base64 encoding.
    pub fn hash_length(&self) -> usize {
        self.hash_length
    }

    pub fn iterations(&self) -> IterationRange {
        self.iterations
    }

    /// Key the salt payload is sealed under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn algorithm(&self) -> CipherAlgorithm {
        self.algorithm
    }

    pub fn digest(&self) -> Digest {
        self.digest
    }

    /// Length of the random salt text inside the encrypted payload. Also
    /// the offset the iteration count is read back from, so changing it
    /// orphans previously stored salts.
    pub fn unencrypted_salt_min_length(&self) -> usize {
        self.unencrypted_salt_min_length
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("hash_length", &self.hash_length)
            .field("iterations", &self.iterations)
            .field("key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("digest", &self.digest)
            .field("unencrypted_salt_min_length", &self.unencrypted_salt_min_length)
            .finish()
    }
}

impl Drop for Config {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Builder for [`Config`]. Unset fields keep their defaults.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn hash_length(mut self, hash_length: usize) -> Self {
        self.config.hash_length = hash_length;
        self
    }

    pub fn iterations(mut self, min: u32, max: u32) -> Self {
        self.config.iterations = IterationRange::new(min, max);
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.config.key = key.into();
        self
    }

    pub fn algorithm(mut self, algorithm: CipherAlgorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    pub fn digest(mut self, digest: Digest) -> Self {
        self.config.digest = digest;
        self
    }

    pub fn unencrypted_salt_min_length(mut self, length: usize) -> Self {
        self.config.unencrypted_salt_min_length = length;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

fn default_pepper_hash_length() -> usize {
    256
}

fn default_pepper_salt_length() -> usize {
    128
}

fn default_pepper_iterations() -> u32 {
    15_000
}

fn default_pepper() -> String {
    String::from("THIS SHOULD BE RANDOM AND KEPT SECRET")
}

/// Configuration for the fixed-cost [`PepperHasher`](crate::PepperHasher).
///
/// The default `pepper` is a placeholder, as its text insists. A real
/// deployment generates its own and keeps it next to the application,
/// never next to the stored credentials.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PepperConfig {
    #[serde(default = "default_pepper_hash_length")]
    hash_length: usize,
    #[serde(default = "default_pepper_salt_length")]
    salt_length: usize,
    #[serde(default = "default_pepper_iterations")]
    iterations: u32,
    #[serde(default = "default_pepper")]
    pepper: String,
    #[serde(default)]
    digest: Digest,
}

impl Default for PepperConfig {
    fn default() -> Self {
        Self {
            hash_length: default_pepper_hash_length(),
            salt_length: default_pepper_salt_length(),
            iterations: default_pepper_iterations(),
            pepper: default_pepper(),
            digest: Digest::default(),
        }
    }
}

impl PepperConfig {
    pub fn builder() -> PepperConfigBuilder {
        PepperConfigBuilder::default()
    }

    /// Parse a JSON configuration, merging the given keys over the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigType(e.to_string()))
    }

    pub fn hash_length(&self) -> usize {
        self.hash_length
    }

    /// Length in bytes of the random salt; the stored salt is its base64.
    pub fn salt_length(&self) -> usize {
        self.salt_length
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn pepper(&self) -> &str {
        &self.pepper
    }

    pub fn digest(&self) -> Digest {
        self.digest
    }
}

impl fmt::Debug for PepperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PepperConfig")
            .field("hash_length", &self.hash_length)
            .field("salt_length", &self.salt_length)
            .field("iterations", &self.iterations)
            .field("pepper", &"<redacted>")
            .field("digest", &self.digest)
            .finish()
    }
}

impl Drop for PepperConfig {
    fn drop(&mut self) {
        self.pepper.zeroize();
    }
}

/// Builder for [`PepperConfig`]. Unset fields keep their defaults.
#[derive(Debug, Default)]
pub struct PepperConfigBuilder {
    config: PepperConfig,
}

impl PepperConfigBuilder {
    pub fn hash_length(mut self, hash_length: usize) -> Self {
        self.config.hash_length = hash_length;
        self
    }

    pub fn salt_length(mut self, salt_length: usize) -> Self {
        self.config.salt_length = salt_length;
        self
    }

    pub fn iterations(mut self, iterations: u32) -> Self {
        self.config.iterations = iterations;
        self
    }

    pub fn pepper(mut self, pepper: impl Into<String>) -> Self {
        self.config.pepper = pepper.into();
        self
    }

    pub fn digest(mut self, digest: Digest) -> Self {
        self.config.digest = digest;
        self
    }

    pub fn build(self) -> PepperConfig {
        self.config
    }
}
