use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while hashing or verifying a credential.
#[derive(Debug, Error)]
pub enum Error {
    /// The password argument was rejected before any work was done.
    #[error("invalid input: password must not be empty")]
    InvalidInput,

    /// The stored salt argument was rejected before any work was done.
    #[error("invalid salt: salt must not be empty")]
    InvalidSalt,

    /// The configured iteration range is inverted.
    #[error("invalid min and max values for random number within range [{min}, {max}]")]
    InvalidRange { min: u32, max: u32 },

    /// A configuration value had the wrong type or an unknown key.
    #[error("invalid configuration: {0}")]
    ConfigType(String),

    #[error("salt encryption failed: {0}")]
    Encryption(String),

    #[error("salt decryption failed: {0}")]
    Decryption(String),

    /// The decrypted salt did not carry a readable iteration count. Usually
    /// means the salt was produced under a different `unencrypted_salt_min_length`.
    #[error("could not get hash iterations from salt: {0}")]
    IterationRecovery(String),

    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("OS random generator unavailable")]
    Randomness,
}
