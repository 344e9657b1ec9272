//! Salted, iterated SHA-256 password hashing.
//!
//! Encoded as `sha256$<iterations>$<salt hex>$<digest hex>` so the iteration
//! count can be raised without invalidating stored hashes.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

const SCHEME: &str = "sha256";
const SALT_BYTES: usize = 16;
const DEFAULT_ITERATIONS: u32 = 100_000;

/// Default [`PasswordHasher`] adapter.
#[derive(Debug, Clone, Copy)]
pub struct Sha256PasswordHasher {
    iterations: u32,
}

impl Default for Sha256PasswordHasher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl Sha256PasswordHasher {
    /// Use a custom iteration count. Zero is raised to one.
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }
}

fn digest(password: &str, salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut state: [u8; 32] = Sha256::new()
        .chain_update(salt)
        .chain_update(password.as_bytes())
        .finalize()
        .into();
    for _ in 1..iterations {
        state = Sha256::new()
            .chain_update(state)
            .chain_update(salt)
            .finalize()
            .into();
    }
    state
}

struct Encoded {
    iterations: u32,
    salt: Vec<u8>,
    digest: Vec<u8>,
}

fn decode(hash: &PasswordHash) -> Result<Encoded, PasswordHasherError> {
    let mut parts = hash.as_str().split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(digest), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(PasswordHasherError::malformed_hash("expected four `$` segments"));
    };
    if scheme != SCHEME {
        return Err(PasswordHasherError::malformed_hash(format!(
            "unsupported scheme `{scheme}`"
        )));
    }
    let iterations = iterations
        .parse::<u32>()
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| PasswordHasherError::malformed_hash("invalid iteration count"))?;
    let salt = hex::decode(salt)
        .map_err(|err| PasswordHasherError::malformed_hash(format!("salt: {err}")))?;
    let digest = hex::decode(digest)
        .map_err(|err| PasswordHasherError::malformed_hash(format!("digest: {err}")))?;
    Ok(Encoded {
        iterations,
        salt,
        digest,
    })
}

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, password: &str) -> PasswordHash {
        let mut salt = [0u8; SALT_BYTES];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = digest(password, &salt, self.iterations);
        PasswordHash::new(format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            hex::encode(salt),
            hex::encode(digest)
        ))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let encoded = decode(hash)?;
        let candidate = digest(password, &encoded.salt, encoded.iterations);
        Ok(candidate.as_slice().ct_eq(&encoded.digest).into())
    }
}
