//! # Error Types
//!
//! This module defines the error type used throughout the library.
//! All fallible operations return [`Result<T, KdfError>`](KdfError); nothing is
//! retried or swallowed internally.

use thiserror::Error;

/// The error type for digest resolution, HMAC compilation and key derivation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KdfError {
    /// The identifier does not resolve to any available digest implementation.
    ///
    /// Only returned by non-tolerant resolution (and by operations that need a
    /// working constructor, such as [`compile_hmac`](crate::compile_hmac)).
    #[error("unknown hash: {0:?}")]
    UnknownHash(String),

    /// The value handed to the resolver is not a usable name, descriptor or
    /// constructor (e.g. a raw name that is not UTF-8, or an empty name).
    #[error("unsupported digest identifier: {0}")]
    UnsupportedIdentifierKind(String),

    /// `rounds` or `keylen` is outside the algorithm's valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested key needs more PBKDF2 blocks than a 32-bit counter allows.
    #[error("keylen too long for digest: {keylen} bytes with {digest_size}-byte digest")]
    KeyTooLong { keylen: usize, digest_size: usize },

    /// Digest size cannot be split into 32/64-bit accumulator lanes.
    #[error("unsupported digest size: {0}")]
    UnsupportedDigestSize(usize),

    /// A constructor produced a digest whose length disagrees with its declared size.
    ///
    /// This indicates a broken implementation; resolution of that algorithm aborts.
    #[error("{name:?} constructor failed sanity check: declared {declared} bytes, produced {actual}")]
    ConstructorSanityFailure {
        name: String,
        declared: usize,
        actual: usize,
    },
}

impl KdfError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        KdfError::InvalidParameter(msg.into())
    }
}
