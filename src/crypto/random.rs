use getrandom::fill;
use rand::Rng;

use crate::error::{Error, Result};

/// Fill buffer with cryptographically secure random bytes
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| Error::Randomness)
}

/// Generate `n` cryptographically secure random bytes
pub fn random_bytes(n: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; n];
    fill_random(&mut bytes)?;
    Ok(bytes)
}

/// Pick an integer uniformly from `[min, max]`, both ends included.
///
/// The bounds are checked here rather than at configuration time, so an
/// inverted range surfaces as an error on the hashing call that uses it.
pub fn random_in_range(min: u32, max: u32) -> Result<u32> {
    if min > max {
        return Err(Error::InvalidRange { min, max });
    }
    Ok(rand::rng().random_range(min..=max))
}
