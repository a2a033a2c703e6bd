//! Credential types.
//!
//! Generation needs an entropy source and lives in `crate::infra::secrets`;
//! this module only defines the shapes and the byte-to-symbol mapping.

/// Length of every generated secret.
pub const SECRET_LEN: usize = 16;

/// Alphabet secrets are drawn from.
pub const SECRET_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Largest multiple of the alphabet size that fits in a byte. Bytes at or
/// above it are rejected so every symbol is equally likely.
const ACCEPT_BELOW: u8 = 248;

/// Map one random byte onto the alphabet, or `None` if it must be discarded.
#[must_use]
pub fn alphabet_symbol(byte: u8) -> Option<char> {
    (byte < ACCEPT_BELOW).then(|| char::from(SECRET_ALPHABET[usize::from(byte) % SECRET_ALPHABET.len()]))
}

/// A credential string. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The plaintext value, for injection into a container environment or
    /// the patched configuration file.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// The four secrets needed to bring the stack up consistently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSet {
    /// Database superuser password.
    pub postgres: Secret,
    /// Application database password.
    pub ckan: Secret,
    /// Read-only datastore password.
    pub datastore_ro: Secret,
    /// Read-write datastore password.
    pub datastore_rw: Secret,
}

impl CredentialSet {
    /// All four secrets in a fixed order.
    #[must_use]
    pub fn all(&self) -> [&Secret; 4] {
        [&self.postgres, &self.ckan, &self.datastore_ro, &self.datastore_rw]
    }
}
