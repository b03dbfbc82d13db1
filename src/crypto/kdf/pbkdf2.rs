//! src/crypto/kdf/pbkdf2.rs

use std::sync::Arc;

use tracing::trace;

use crate::consts::MAX_PBKDF2_BLOCKS;
use crate::crypto::hmac::CompiledMac;
use crate::crypto::kdf::accumulator::accumulator_for;
use crate::crypto::kdf::backend::{self, Backend, BackendSupport};
use crate::digest::{resolve, HashDescriptor, HashIdentifier};
use crate::error::KdfError;

/// Validated PBKDF2 parameters.
#[derive(Debug, Clone, Copy)]
struct Pbkdf2Params {
    digest_size: usize,
    keylen: usize,
    block_count: u32,
}

// Order matters: accelerated backends rely on these checks having run.
fn validate(
    descriptor: &HashDescriptor,
    rounds: u32,
    keylen: Option<usize>,
) -> Result<Pbkdf2Params, KdfError> {
    let (_, digest_size, _) = descriptor.require()?;

    if rounds < 1 {
        return Err(KdfError::invalid("rounds must be at least 1"));
    }
    let keylen = match keylen {
        None => digest_size,
        Some(0) => return Err(KdfError::invalid("keylen must be at least 1")),
        Some(n) => n,
    };

    let block_count = keylen.div_ceil(digest_size) as u64;
    if block_count > MAX_PBKDF2_BLOCKS {
        return Err(KdfError::KeyTooLong {
            keylen,
            digest_size,
        });
    }

    Ok(Pbkdf2Params {
        digest_size,
        keylen,
        block_count: block_count as u32,
    })
}

/// PKCS#5 v2.0 password-based key derivation using HMAC over any resolvable digest.
///
/// Uses the first enabled backend that supports the digest
/// ([`pbkdf2_backends`](crate::pbkdf2_backends) lists them), falling back to
/// the builtin lane accumulator. All backends produce identical output.
///
/// # Errors
///
/// - any resolution error
/// - [`KdfError::InvalidParameter`] if `rounds == 0` or `keylen == Some(0)`
/// - [`KdfError::KeyTooLong`] if `keylen` needs more than `u32::MAX` blocks
/// - [`KdfError::UnsupportedDigestSize`] if the builtin backend cannot lane the digest
///
/// # Example
///
/// ```
/// use digest_kdf::pbkdf2_hmac;
///
/// let key = pbkdf2_hmac("sha1", "password", "salt", 2, Some(20))?;
/// assert_eq!(hex::encode(key), "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957");
/// # Ok::<(), digest_kdf::KdfError>(())
/// ```
pub fn pbkdf2_hmac<'a>(
    digest: impl Into<HashIdentifier<'a>>,
    secret: impl AsRef<[u8]>,
    salt: impl AsRef<[u8]>,
    rounds: u32,
    keylen: Option<usize>,
) -> Result<Vec<u8>, KdfError> {
    let descriptor = resolve(digest)?;
    let params = validate(&descriptor, rounds, keylen)?;
    let (secret, salt) = (secret.as_ref(), salt.as_ref());

    for backend in Backend::ACCELERATED {
        if descriptor.supported_by(backend) == BackendSupport::Supported {
            trace!(digest = descriptor.name(), backend = backend.name(), "pbkdf2 delegated");
            return derive_accelerated(backend, &descriptor, secret, salt, rounds, params);
        }
    }
    derive_builtin(&descriptor, secret, salt, rounds, params)
}

/// [`pbkdf2_hmac`] pinned to one backend.
///
/// # Errors
///
/// As [`pbkdf2_hmac`], plus [`KdfError::InvalidParameter`] if `backend` is not
/// enabled or does not support the digest.
pub fn pbkdf2_hmac_with_backend<'a>(
    backend: Backend,
    digest: impl Into<HashIdentifier<'a>>,
    secret: impl AsRef<[u8]>,
    salt: impl AsRef<[u8]>,
    rounds: u32,
    keylen: Option<usize>,
) -> Result<Vec<u8>, KdfError> {
    let descriptor = resolve(digest)?;
    let params = validate(&descriptor, rounds, keylen)?;
    let (secret, salt) = (secret.as_ref(), salt.as_ref());

    match descriptor.supported_by(backend) {
        BackendSupport::Supported if backend == Backend::Builtin => {
            derive_builtin(&descriptor, secret, salt, rounds, params)
        }
        BackendSupport::Supported => {
            derive_accelerated(backend, &descriptor, secret, salt, rounds, params)
        }
        support => Err(KdfError::invalid(format!(
            "pbkdf2 backend {} cannot derive with {}: {support:?}",
            backend.name(),
            descriptor.name()
        ))),
    }
}

fn derive_accelerated(
    backend: Backend,
    descriptor: &HashDescriptor,
    secret: &[u8],
    salt: &[u8],
    rounds: u32,
    params: Pbkdf2Params,
) -> Result<Vec<u8>, KdfError> {
    let mut out = vec![0u8; params.keylen];
    backend::derive(backend, descriptor.name(), secret, salt, rounds, &mut out)?;
    Ok(out)
}

fn derive_builtin(
    descriptor: &Arc<HashDescriptor>,
    secret: &[u8],
    salt: &[u8],
    rounds: u32,
    params: Pbkdf2Params,
) -> Result<Vec<u8>, KdfError> {
    let accumulate = accumulator_for(params.digest_size)?;
    let mac = CompiledMac::new(Arc::clone(descriptor), secret)?;
    let prf = |message: &[u8]| mac.mac(message);

    let mut block_input = Vec::with_capacity(salt.len() + 4);
    let mut out = Vec::with_capacity(params.block_count as usize * params.digest_size);
    for index in 1..=params.block_count {
        block_input.clear();
        block_input.extend_from_slice(salt);
        block_input.extend_from_slice(&index.to_be_bytes());
        let first = mac.mac(&block_input);
        out.extend_from_slice(&accumulate(&prf, first, rounds));
    }
    out.truncate(params.keylen);
    Ok(out)
}
