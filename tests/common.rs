//! tests/common.rs
//! Common constants and test doubles shared across test files

use std::sync::Arc;

use digest_kdf::{DigestConstructor, HashState};
use sha2::{Digest, Sha512};

/// Fast iteration count for tests - performance testing is in benches/
#[allow(dead_code)] // Used across multiple test files
pub const TEST_ITERATIONS: u32 = 5;

#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "password";

#[allow(dead_code)]
pub const TEST_SALT: &[u8] = b"salt";

/// Message used by the classic HMAC examples
#[allow(dead_code)]
pub const FOX: &[u8] = b"The quick brown fox jumps over the lazy dog";

/// Common iteration count vectors for testing various iteration values
#[allow(dead_code)]
pub const TEST_ITERATION_VALUES: &[u32] = &[1, 2, TEST_ITERATIONS, 17];

/// SHA-512 truncated to `emitted` bytes while claiming `declared` bytes.
#[derive(Clone)]
struct TruncatedState {
    name: &'static str,
    declared: usize,
    emitted: usize,
    block: usize,
    inner: Sha512,
}

impl HashState for TruncatedState {
    fn name(&self) -> &str {
        self.name
    }

    fn digest_size(&self) -> usize {
        self.declared
    }

    fn block_size(&self) -> usize {
        self.block
    }

    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.inner, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        let TruncatedState { inner, emitted, .. } = *self;
        inner.finalize()[..emitted].to_vec()
    }

    fn box_clone(&self) -> Box<dyn HashState> {
        Box::new(self.clone())
    }
}

pub struct TruncatedSha512 {
    name: &'static str,
    declared: usize,
    emitted: usize,
    block: usize,
}

impl DigestConstructor for TruncatedSha512 {
    fn new_hash(&self) -> Box<dyn HashState> {
        Box::new(TruncatedState {
            name: self.name,
            declared: self.declared,
            emitted: self.emitted,
            block: self.block,
            inner: Sha512::new(),
        })
    }
}

/// An honest truncated-SHA-512 constructor of `size` bytes.
///
/// Each test should use its own `name`; constructors with unknown names are
/// cached globally by name.
#[allow(dead_code)]
pub fn truncated_sha512(name: &'static str, size: usize) -> Arc<dyn DigestConstructor> {
    Arc::new(TruncatedSha512 {
        name,
        declared: size,
        emitted: size,
        block: 128,
    })
}

/// A constructor whose digests are shorter than it claims.
#[allow(dead_code)]
pub fn lying_sha512(name: &'static str, declared: usize, emitted: usize) -> Arc<dyn DigestConstructor> {
    Arc::new(TruncatedSha512 {
        name,
        declared,
        emitted,
        block: 128,
    })
}

/// Full SHA-512 reporting a block narrower than its 64-byte digest.
#[allow(dead_code)]
pub fn narrow_block_sha512(name: &'static str, block: usize) -> Arc<dyn DigestConstructor> {
    Arc::new(TruncatedSha512 {
        name,
        declared: 64,
        emitted: 64,
        block,
    })
}

/// Reference PBKDF2 block function, straight from the definition, over any
/// constructor (HMAC done by hand).
#[allow(dead_code)]
pub fn reference_pbkdf2(
    constructor: &Arc<dyn DigestConstructor>,
    block_size: usize,
    secret: &[u8],
    salt: &[u8],
    rounds: u32,
    keylen: usize,
) -> Vec<u8> {
    let mut key = if secret.len() > block_size {
        constructor.digest(secret)
    } else {
        secret.to_vec()
    };
    if key.len() < block_size {
        key.resize(block_size, 0);
    }
    let ipad: Vec<u8> = key.iter().map(|b| b ^ 0x36).collect();
    let opad: Vec<u8> = key.iter().map(|b| b ^ 0x5c).collect();
    let hmac = |msg: &[u8]| {
        let inner = constructor.digest(&[ipad.as_slice(), msg].concat());
        constructor.digest(&[opad.as_slice(), inner.as_slice()].concat())
    };

    let mut out = Vec::new();
    let mut index = 1u32;
    while out.len() < keylen {
        let mut u = hmac(&[salt, &index.to_be_bytes()[..]].concat());
        let mut t = u.clone();
        for _ in 1..rounds {
            u = hmac(&u);
            t.iter_mut().zip(&u).for_each(|(a, b)| *a ^= b);
        }
        out.extend_from_slice(&t);
        index += 1;
    }
    out.truncate(keylen);
    out
}
