//! src/crypto/hmac.rs
//!
//! Compiled HMAC: the key schedule is paid once per [`compile_hmac`] call, and
//! every MAC computation starts from clones of the precomputed inner/outer
//! states.
//!
//! ```
//! use digest_kdf::compile_hmac;
//!
//! let mac = compile_hmac("sha256", b"key")?;
//! let tag = mac.mac(b"The quick brown fox jumps over the lazy dog");
//! assert_eq!(
//!     hex::encode(tag),
//!     "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
//! );
//! # Ok::<(), digest_kdf::KdfError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use crate::consts::MIN_HMAC_BLOCK_SIZE;
use crate::digest::{resolve, HashDescriptor, HashIdentifier, HashState};
use crate::error::KdfError;
use crate::utils::{translate, wipe, TRANS_36, TRANS_5C};

/// Resolves `digest` and compiles an HMAC keyed with `key`.
///
/// Text keys are used as their UTF-8 bytes.
///
/// # Errors
///
/// Any resolution error, or [`KdfError::UnknownHash`] for a placeholder descriptor.
///
/// # Panics
///
/// If the digest's block size is below 16 bytes.
pub fn compile_hmac<'a>(
    digest: impl Into<HashIdentifier<'a>>,
    key: impl AsRef<[u8]>,
) -> Result<CompiledMac, KdfError> {
    CompiledMac::new(resolve(digest)?, key.as_ref())
}

/// An HMAC bound to one digest and one key.
///
/// Logically immutable: [`mac`](Self::mac) and [`start`](Self::start) never
/// touch the captured seed states.
pub struct CompiledMac {
    descriptor: Arc<HashDescriptor>,
    inner: Box<dyn HashState>,
    outer: Box<dyn HashState>,
}

impl CompiledMac {
    /// Compiles an HMAC for an already-resolved descriptor.
    pub fn new(descriptor: Arc<HashDescriptor>, key: &[u8]) -> Result<Self, KdfError> {
        let (constructor, _, block_size) = descriptor.require()?;
        assert!(block_size >= MIN_HMAC_BLOCK_SIZE, "block size too small");

        let mut padded = if key.len() > block_size {
            constructor.digest(key)
        } else {
            key.to_vec()
        };
        // a hashed key wider than the block is used whole
        if padded.len() < block_size {
            padded.resize(block_size, 0);
        }

        let mut inner_key = translate(&padded, &TRANS_36);
        let mut outer_key = translate(&padded, &TRANS_5C);

        let mut inner = constructor.new_hash();
        inner.update(&inner_key);
        let mut outer = constructor.new_hash();
        outer.update(&outer_key);

        wipe(&mut padded);
        wipe(&mut inner_key);
        wipe(&mut outer_key);

        Ok(Self {
            descriptor,
            inner,
            outer,
        })
    }

    /// The digest this MAC was compiled for.
    pub fn descriptor(&self) -> &Arc<HashDescriptor> {
        &self.descriptor
    }

    /// Output length in bytes.
    pub fn output_size(&self) -> usize {
        self.inner.digest_size()
    }

    /// Single-shot HMAC of `message`.
    #[inline]
    pub fn mac(&self, message: &[u8]) -> Vec<u8> {
        let mut inner = self.inner.box_clone();
        inner.update(message);
        self.wrap(inner)
    }

    /// Starts an incremental computation.
    pub fn start(&self) -> MacStream<'_> {
        MacStream {
            mac: self,
            inner: self.inner.box_clone(),
        }
    }

    #[inline(always)]
    fn wrap(&self, inner: Box<dyn HashState>) -> Vec<u8> {
        let inner_digest = inner.finalize();
        let mut outer = self.outer.box_clone();
        outer.update(&inner_digest);
        outer.finalize()
    }
}

impl Clone for CompiledMac {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            inner: self.inner.box_clone(),
            outer: self.outer.box_clone(),
        }
    }
}

impl fmt::Debug for CompiledMac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledMac")
            .field("digest", &self.descriptor.name())
            .finish_non_exhaustive()
    }
}

/// Incremental HMAC computation from [`CompiledMac::start`].
pub struct MacStream<'a> {
    mac: &'a CompiledMac,
    inner: Box<dyn HashState>,
}

impl MacStream<'_> {
    pub fn update(&mut self, chunk: &[u8]) {
        self.inner.update(chunk);
    }

    /// HMAC of everything fed so far. May be called any number of times;
    /// later [`update`](Self::update) calls continue from the same point.
    pub fn finalize(&self) -> Vec<u8> {
        self.mac.wrap(self.inner.box_clone())
    }

    pub fn descriptor(&self) -> &Arc<HashDescriptor> {
        self.mac.descriptor()
    }
}
