//! Fixed-cost hashing with a secret pepper.
//!
//! The older of the two strategies: the salt is stored in the clear and a
//! server-held pepper is prepended to it at derivation time, so a leaked
//! credential store alone is not enough to mount a dictionary attack.
//! Every record costs the same configured iteration count.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::config::PepperConfig;
use crate::crypto::{kdf, random};
use crate::error::{Error, Result};
use crate::Credential;

pub struct PepperHasher {
    config: PepperConfig,
}

impl PepperHasher {
    pub fn new(config: PepperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PepperConfig {
        &self.config
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<Credential> {
        let salt = BASE64.encode(random::random_bytes(self.config.salt_length())?);
        let derived = self.derive(password, &salt)?;

        Ok(Credential {
            salt,
            hash: BASE64.encode(derived),
        })
    }

    /// Re-derive the hash for `password` under a stored salt.
    pub fn compare(&self, password: &str, salt: &str) -> Result<String> {
        if password.is_empty() {
            return Err(Error::InvalidInput);
        }
        if salt.is_empty() {
            return Err(Error::InvalidSalt);
        }

        let derived = self.derive(password, salt)?;
        Ok(BASE64.encode(derived))
    }

    /// Check `password` against a stored salt and hash in constant time.
    pub fn verify(&self, password: &str, salt: &str, hash: &str) -> Result<bool> {
        let candidate = self.compare(password, salt)?;
        Ok(candidate.as_bytes().ct_eq(hash.as_bytes()).into())
    }

    fn derive(&self, password: &str, salt: &str) -> Result<Vec<u8>> {
        // the pepper rides along at derivation time only, never in storage
        let peppered = Zeroizing::new(format!("{}{}", self.config.pepper(), salt));
        kdf::derive(
            password,
            peppered.as_bytes(),
            self.config.iterations(),
            self.config.hash_length(),
            self.config.digest(),
        )
    }
}

impl Default for PepperHasher {
    fn default() -> Self {
        Self::new(PepperConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> PepperConfig {
        PepperConfig::builder().iterations(100).build()
    }

    #[test]
    fn hash_returns_salt_and_hash() {
        let hasher = PepperHasher::new(fast_config());
        let credential = hasher.hash("password").unwrap();

        assert!(credential.salt().len() >= 128);
        assert!(credential.hash().len() >= 256);
        assert_ne!(credential.hash(), "password");
    }

    #[test]
    fn hash_and_compare_roundtrip() {
        let hasher = PepperHasher::new(fast_config());
        let credential = hasher.hash("password").unwrap();
        let candidate = hasher.compare("password", credential.salt()).unwrap();

        assert_eq!(candidate, credential.hash());
    }

    #[test]
    fn verify_accepts_right_and_rejects_wrong() {
        let hasher = PepperHasher::new(fast_config());
        let credential = hasher.hash("password").unwrap();

        assert!(hasher.verify("password", credential.salt(), credential.hash()).unwrap());
        assert!(!hasher.verify("wordpass", credential.salt(), credential.hash()).unwrap());
    }

    #[test]
    fn empty_password_hashes_but_does_not_compare() {
        let hasher = PepperHasher::new(fast_config());
        let credential = hasher.hash("").unwrap();
        assert!(!credential.hash().is_empty());

        match hasher.compare("", credential.salt()) {
            Err(Error::InvalidInput) => {}
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        match hasher.compare("password", "") {
            Err(Error::InvalidSalt) => {}
            other => panic!("expected InvalidSalt, got {other:?}"),
        }
    }

    #[test]
    fn pepper_never_appears_in_the_output() {
        let hasher = PepperHasher::new(
            PepperConfig::builder().pepper("uncommon_pepper_text").iterations(100).build(),
        );
        let credential = hasher.hash("password").unwrap();

        assert!(!credential.salt().contains("uncommon_pepper_text"));
        assert!(!credential.hash().contains("uncommon_pepper_text"));
    }

    #[test]
    fn unusual_peppers_roundtrip() {
        for pepper in ["", "&%$/()=?!+#", "pfäffers🌶️", "0", &"p".repeat(10_000)] {
            let hasher =
                PepperHasher::new(PepperConfig::builder().pepper(pepper).iterations(10).build());
            let credential = hasher.hash("password").unwrap();
            assert!(hasher.verify("password", credential.salt(), credential.hash()).unwrap());
        }
    }

    #[test]
    fn a_different_pepper_fails_verification() {
        let hasher = PepperHasher::new(fast_config());
        let credential = hasher.hash("password").unwrap();

        let other = PepperHasher::new(
            PepperConfig::builder().pepper("not the same pepper").iterations(100).build(),
        );
        assert!(!other.verify("password", credential.salt(), credential.hash()).unwrap());
    }

    #[test]
    fn zero_iterations_fail_at_derivation() {
        let hasher = PepperHasher::new(PepperConfig::builder().iterations(0).build());
        match hasher.hash("password") {
            Err(Error::Derivation(_)) => {}
            other => panic!("expected Derivation error, got {other:?}"),
        }
    }

    #[test]
    fn zero_hash_length_yields_empty_hash() {
        let hasher = PepperHasher::new(
            PepperConfig::builder().hash_length(0).iterations(100).build(),
        );
        let credential = hasher.hash("password").unwrap();

        assert_eq!(credential.hash(), "");
        assert_eq!(hasher.compare("password", credential.salt()).unwrap(), "");
    }

    #[test]
    fn big_salt_length_roundtrips() {
        let hasher = PepperHasher::new(
            PepperConfig::builder().salt_length(100_000).iterations(10).build(),
        );
        let credential = hasher.hash("password").unwrap();

        assert!(hasher.verify("password", credential.salt(), credential.hash()).unwrap());
    }

    #[test]
    fn two_hashes_of_the_same_password_differ() {
        let hasher = PepperHasher::new(fast_config());
        let a = hasher.hash("password").unwrap();
        let b = hasher.hash("password").unwrap();

        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn sha256_digest_roundtrips() {
        let hasher = PepperHasher::new(
            PepperConfig::builder().digest(crate::Digest::Sha256).iterations(100).build(),
        );
        let credential = hasher.hash("password").unwrap();

        assert!(hasher.verify("password", credential.salt(), credential.hash()).unwrap());
    }
}
