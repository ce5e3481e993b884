//! Reversible salt codec.
//!
//! The variable-cost strategy persists a salt that carries its own
//! iteration count: random salt text with the count appended in decimal,
//! sealed under a server-held key with an AEAD cipher. Verification
//! decrypts the stored salt to recover the count, so the cost of newly
//! hashed credentials can be raised without invalidating old records.

use aes_gcm::{Aes256Gcm, Key as AesKey, Nonce};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    Key, XChaCha20Poly1305, XNonce,
};
use hkdf::Hkdf;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

use super::{random, GCM_NONCE_LEN, KEY_LEN, TAG_LEN, XCHACHA_NONCE_LEN};
use crate::error::{Error, Result};

/// Domain separation for the HKDF cipher-key schedule.
const CODEC_INFO: &[u8] = b"saltpeter:salt-codec:v1";

/// Ciphers available for sealing the salt payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CipherAlgorithm {
    /// AES-256-GCM (96-bit nonce)
    #[default]
    #[serde(rename = "aes256gcm")]
    Aes256Gcm,
    /// XChaCha20-Poly1305 (192-bit nonce)
    #[serde(rename = "xchacha20poly1305")]
    XChaCha20Poly1305,
}

impl CipherAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Aes256Gcm => "aes256gcm",
            Self::XChaCha20Poly1305 => "xchacha20poly1305",
        }
    }

    /// Nonce length in bytes.
    pub fn nonce_len(&self) -> usize {
        match self {
            Self::Aes256Gcm => GCM_NONCE_LEN,
            Self::XChaCha20Poly1305 => XCHACHA_NONCE_LEN,
        }
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CipherAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "aes256gcm" | "aes-256-gcm" | "aes256" => Ok(Self::Aes256Gcm),
            "xchacha20poly1305" | "xchacha20-poly1305" | "xchacha" | "chacha" => {
                Ok(Self::XChaCha20Poly1305)
            }
            _ => Err(Error::ConfigType(format!(
                "unsupported cipher algorithm '{s}', expected aes256gcm or xchacha20poly1305"
            ))),
        }
    }
}

/// Encrypt a salt payload under the configured key.
///
/// Returns base64(nonce || ciphertext), a self-contained string the caller
/// persists as the record's salt. The cipher key is derived from `key`
/// with HKDF-SHA256, so any key string works regardless of length.
pub fn encrypt_salt(algorithm: CipherAlgorithm, key: &str, payload: &str) -> Result<String> {
    let hk = Hkdf::<Sha256>::new(None, key.as_bytes());
    let mut cipher_key = Zeroizing::new([0u8; KEY_LEN]);
    hk.expand(CODEC_INFO, &mut *cipher_key)
        .map_err(|e| Error::Encryption(format!("cipher key derivation failed: {e}")))?;

    let mut nonce = vec![0u8; algorithm.nonce_len()];
    random::fill_random(&mut nonce)?;

    let ciphertext = match algorithm {
        CipherAlgorithm::Aes256Gcm => {
            let cipher = Aes256Gcm::new(AesKey::<Aes256Gcm>::from_slice(&*cipher_key));
            cipher.encrypt(Nonce::from_slice(&nonce), payload.as_bytes())
        }
        CipherAlgorithm::XChaCha20Poly1305 => {
            let cipher = XChaCha20Poly1305::new(Key::from_slice(&*cipher_key));
            cipher.encrypt(XNonce::from_slice(&nonce), payload.as_bytes())
        }
    }
    .map_err(|_| Error::Encryption("encryption failed".into()))?;

    let mut blob = nonce;
    blob.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(blob))
}

/// Decrypt a persisted salt back to its plaintext payload.
///
/// Fails cleanly when the key is wrong, the cipher does not match, or the
/// stored string was tampered with.
pub fn decrypt_salt(
    algorithm: CipherAlgorithm,
    key: &str,
    persisted: &str,
) -> Result<Zeroizing<String>> {
    let hk = Hkdf::<Sha256>::new(None, key.as_bytes());
    let mut cipher_key = Zeroizing::new([0u8; KEY_LEN]);
    hk.expand(CODEC_INFO, &mut *cipher_key)
        .map_err(|e| Error::Decryption(format!("cipher key derivation failed: {e}")))?;

    let blob = BASE64
        .decode(persisted)
        .map_err(|e| Error::Decryption(format!("salt is not valid base64: {e}")))?;

    let nonce_len = algorithm.nonce_len();
    if blob.len() < nonce_len + TAG_LEN {
        return Err(Error::Decryption("salt is too short to decrypt".into()));
    }
    let (nonce, ciphertext) = blob.split_at(nonce_len);

    let plaintext = match algorithm {
        CipherAlgorithm::Aes256Gcm => {
            let cipher = Aes256Gcm::new(AesKey::<Aes256Gcm>::from_slice(&*cipher_key));
            cipher.decrypt(Nonce::from_slice(nonce), ciphertext)
        }
        CipherAlgorithm::XChaCha20Poly1305 => {
            let cipher = XChaCha20Poly1305::new(Key::from_slice(&*cipher_key));
            cipher.decrypt(XNonce::from_slice(nonce), ciphertext)
        }
    }
    .map_err(|_| Error::Decryption("wrong key or corrupted salt".into()))?;

    let plaintext = Zeroizing::new(plaintext);
    let payload = std::str::from_utf8(&plaintext)
        .map_err(|_| Error::Decryption("salt payload is not valid UTF-8".into()))?;
    Ok(Zeroizing::new(payload.to_string()))
}

/// Build the plaintext salt payload: `min_length` base64 characters of
/// fresh randomness with the iteration count appended in decimal.
pub fn salt_payload(iterations: u32, min_length: usize) -> Result<String> {
    let bytes = random::random_bytes(min_length)?;
    let mut payload = BASE64.encode(bytes);
    // base64 of n bytes is never shorter than n characters
    payload.truncate(min_length);
    payload.push_str(&iterations.to_string());
    Ok(payload)
}

/// Recover the iteration count appended to a decrypted salt payload.
///
/// `min_length` must match the value the payload was built with; anything
/// else leaves base64 characters in the suffix and fails the parse.
pub fn extract_iterations(payload: &str, min_length: usize) -> Result<u32> {
    let suffix = payload.get(min_length..).ok_or_else(|| {
        Error::IterationRecovery(format!("salt payload is shorter than {min_length} characters"))
    })?;
    suffix
        .parse::<u32>()
        .map_err(|_| Error::IterationRecovery(format!("'{suffix}' is not an iteration count")))
}
