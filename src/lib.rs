// src/lib.rs

//! Digest name resolution, compiled HMAC and PBKDF1/PBKDF2 over any
//! resolvable hash.
//!
//! ```
//! use digest_kdf::{compile_hmac, pbkdf2_hmac, resolve};
//!
//! let sha256 = resolve("SHA-256")?;
//! let mac = compile_hmac(&sha256, b"key")?;
//! assert_eq!(mac.output_size(), 32);
//!
//! let key = pbkdf2_hmac(&sha256, "password", "salt", 1, Some(32))?;
//! assert_eq!(key.len(), 32);
//! # Ok::<(), digest_kdf::KdfError>(())
//! ```

#[cfg(feature = "batch-ops")]
pub mod batch_ops;
pub mod builders;
pub mod consts;
pub mod crypto;
pub mod digest;
pub mod error;
pub mod utils;

pub use digest::{
    clear_cache, norm_hash_name, resolve, resolve_tolerant, DigestConstructor, DigestRegistry,
    HashDescriptor, HashIdentifier, HashState, NameFormat,
};
pub use error::KdfError;

pub use crypto::hmac::{compile_hmac, CompiledMac, MacStream};
pub use crypto::kdf::backend::{pbkdf2_backends, pbkdf2_speed_factor, Backend, BackendSupport};
pub use crypto::kdf::pbkdf1::pbkdf1;
pub use crypto::kdf::pbkdf2::{pbkdf2_hmac, pbkdf2_hmac_with_backend};

pub use builders::Pbkdf2Builder;

#[cfg(feature = "batch-ops")]
pub use batch_ops::pbkdf2_hmac_batch;
