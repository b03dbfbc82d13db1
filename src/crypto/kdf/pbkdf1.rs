//! src/crypto/kdf/pbkdf1.rs

use crate::digest::{resolve, HashIdentifier};
use crate::error::KdfError;
use crate::utils::wipe;

/// PKCS#5 v1.5 password-based key derivation.
///
/// `block = secret ‖ salt`, hashed `rounds` times; returns the first `keylen`
/// bytes (default: the digest size). Deprecated; use
/// [`pbkdf2_hmac`](crate::pbkdf2_hmac) for new code.
///
/// # Errors
///
/// - any resolution error
/// - [`KdfError::InvalidParameter`] if `rounds == 0` or `keylen` exceeds the digest size
pub fn pbkdf1<'a>(
    digest: impl Into<HashIdentifier<'a>>,
    secret: impl AsRef<[u8]>,
    salt: impl AsRef<[u8]>,
    rounds: u32,
    keylen: Option<usize>,
) -> Result<Vec<u8>, KdfError> {
    let descriptor = resolve(digest)?;
    let (constructor, digest_size, _) = descriptor.require()?;

    if rounds < 1 {
        return Err(KdfError::invalid("rounds must be at least 1"));
    }
    let keylen = keylen.unwrap_or(digest_size);
    if keylen > digest_size {
        return Err(KdfError::invalid(format!(
            "keylength too large for digest: {keylen} > {digest_size}"
        )));
    }

    let mut block = [secret.as_ref(), salt.as_ref()].concat();
    for _ in 0..rounds {
        let next = constructor.digest(&block);
        wipe(&mut block);
        block = next;
    }
    block.truncate(keylen);
    Ok(block)
}
