//! Cryptographic primitives for credential hashing.
//!
//! Provides secure randomness, PBKDF2 key derivation, and the reversible
//! salt codec used by the variable-cost strategy.

pub mod kdf;
pub mod random;
pub mod salt;

pub use kdf::Digest;
pub use salt::CipherAlgorithm;

/// Length of the derived cipher key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the nonce for AES-256-GCM (12 bytes).
pub const GCM_NONCE_LEN: usize = 12;
/// Length of the nonce for XChaCha20-Poly1305 (24 bytes).
pub const XCHACHA_NONCE_LEN: usize = 24;
/// Length of the AEAD authentication tag (16 bytes).
pub const TAG_LEN: usize = 16;
