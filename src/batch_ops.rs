//! Parallel PBKDF2 over independent (secret, salt) pairs.

use rayon::prelude::*;

use crate::digest::{resolve, HashIdentifier};
use crate::{pbkdf2_hmac, KdfError};

/// Derives one key per `(secret, salt)` pair on the rayon pool.
///
/// The digest is resolved once; results keep the input order. The first
/// error aborts the batch.
pub fn pbkdf2_hmac_batch<'a, S, T>(
    digest: impl Into<HashIdentifier<'a>>,
    batch: &[(S, T)],
    rounds: u32,
    keylen: Option<usize>,
) -> Result<Vec<Vec<u8>>, KdfError>
where
    S: AsRef<[u8]> + Sync,
    T: AsRef<[u8]> + Sync,
{
    let descriptor = resolve(digest)?;
    batch
        .par_iter()
        .map(|(secret, salt)| pbkdf2_hmac(&descriptor, secret, salt, rounds, keylen))
        .collect()
}
