//! Infrastructure implementation of the `SecretGenerator` port.

use anyhow::{Context, Result};
use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::application::ports::SecretGenerator;
use crate::domain::secrets::{SECRET_LEN, alphabet_symbol};
use crate::domain::{CredentialSet, Secret};

/// Draws secrets from the operating system's randomness source.
///
/// There is no fallback: if the OS source fails, generation fails.
pub struct OsSecretGenerator;

impl OsSecretGenerator {
    fn secret() -> Result<Secret> {
        let mut value = String::with_capacity(SECRET_LEN);
        let mut buf = [0u8; 32];
        while value.len() < SECRET_LEN {
            OsRng
                .try_fill_bytes(&mut buf)
                .context("secure randomness source unavailable")?;
            let missing = SECRET_LEN - value.len();
            value.extend(buf.iter().filter_map(|&b| alphabet_symbol(b)).take(missing));
        }
        Ok(Secret::new(value))
    }
}

impl SecretGenerator for OsSecretGenerator {
    fn generate(&self) -> Result<CredentialSet> {
        Ok(CredentialSet {
            postgres: Self::secret()?,
            ckan: Self::secret()?,
            datastore_ro: Self::secret()?,
            datastore_rw: Self::secret()?,
        })
    }
}
