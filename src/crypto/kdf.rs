use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha512};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Digest functions supported by the key-derivation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Digest {
    /// PBKDF2-HMAC-SHA256
    #[serde(rename = "sha256")]
    Sha256,
    /// PBKDF2-HMAC-SHA512
    #[default]
    #[serde(rename = "sha512")]
    Sha512,
}

impl Digest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            _ => Err(Error::ConfigType(format!(
                "unrecognized digest '{s}', expected sha256 or sha512"
            ))),
        }
    }
}

/// Derive `length` bytes from `password` and `salt` with PBKDF2.
///
/// A `length` of zero is permitted and yields empty output; it is the
/// caller's configuration that decides whether that is useful.
pub fn derive(
    password: &str,
    salt: &[u8],
    iterations: u32,
    length: usize,
    digest: Digest,
) -> Result<Vec<u8>> {
    if iterations == 0 {
        return Err(Error::Derivation("iterations must be >= 1".into()));
    }

    let mut out = vec![0u8; length];
    match digest {
        Digest::Sha256 => pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out),
        Digest::Sha512 => pbkdf2_hmac::<Sha512>(password.as_bytes(), salt, iterations, &mut out),
    }
    Ok(out)
}
