//! src/builders/pbkdf2_builder.rs
//! PBKDF2-HMAC builder over any resolvable digest

use std::sync::Arc;

use crate::consts::{DEFAULT_PBKDF2_DIGEST, DEFAULT_PBKDF2_ITERATIONS};
use crate::crypto::kdf::pbkdf2::pbkdf2_hmac;
use crate::digest::{HashDescriptor, HashIdentifier};
use crate::error::KdfError;

#[derive(Debug, Clone)]
enum DigestChoice {
    Name(String),
    Descriptor(Arc<HashDescriptor>),
}

/// PBKDF2-HMAC key derivation builder
///
/// Defaults: SHA-256 ([`DEFAULT_PBKDF2_DIGEST`]), [`DEFAULT_PBKDF2_ITERATIONS`]
/// rounds, empty salt, digest-sized output.
///
/// # Thread Safety
///
/// This type is `Send + Sync`; derivation is pure apart from the shared caches.
#[derive(Debug, Clone)]
pub struct Pbkdf2Builder {
    digest: DigestChoice,
    iterations: u32,
    keylen: Option<usize>,
    salt: Vec<u8>,
}

impl Pbkdf2Builder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            digest: DigestChoice::Name(DEFAULT_PBKDF2_DIGEST.to_owned()),
            iterations: DEFAULT_PBKDF2_ITERATIONS,
            keylen: None,
            salt: Vec::new(),
        }
    }

    /// Digest by name, in any spelling [`resolve`](crate::resolve) accepts.
    #[must_use]
    pub fn with_digest(mut self, name: impl Into<String>) -> Self {
        self.digest = DigestChoice::Name(name.into());
        self
    }

    /// Digest by already-resolved descriptor.
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: Arc<HashDescriptor>) -> Self {
        self.digest = DigestChoice::Descriptor(descriptor);
        self
    }

    /// Set iteration count; zero is rejected at derivation time.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = salt.into();
        self
    }

    /// Output length; `None` means the digest size.
    #[must_use]
    pub fn with_keylen(mut self, keylen: Option<usize>) -> Self {
        self.keylen = keylen;
        self
    }

    #[must_use]
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    fn identifier(&self) -> HashIdentifier<'_> {
        match &self.digest {
            DigestChoice::Name(name) => HashIdentifier::Name(name),
            DigestChoice::Descriptor(descriptor) => HashIdentifier::Descriptor(Arc::clone(descriptor)),
        }
    }

    /// Derive a fresh key.
    pub fn derive(&self, secret: impl AsRef<[u8]>) -> Result<Vec<u8>, KdfError> {
        pbkdf2_hmac(
            self.identifier(),
            secret,
            &self.salt,
            self.iterations,
            self.keylen,
        )
    }

    /// Derive exactly `out.len()` bytes into a caller-provided buffer.
    pub fn derive_into(&self, secret: impl AsRef<[u8]>, out: &mut [u8]) -> Result<(), KdfError> {
        let key = pbkdf2_hmac(
            self.identifier(),
            secret,
            &self.salt,
            self.iterations,
            Some(out.len()),
        )?;
        out.copy_from_slice(&key);
        Ok(())
    }
}

impl Default for Pbkdf2Builder {
    fn default() -> Self {
        Self::new()
    }
}
