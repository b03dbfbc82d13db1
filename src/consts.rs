//! # Constants
//!
//! Fixed values shared by the resolver, the HMAC compiler and the KDF engines.

/// Largest PBKDF2 block index; block counters are serialized as big-endian `u32`.
pub const MAX_PBKDF2_BLOCKS: u64 = u32::MAX as u64;

/// Minimum digest block size accepted by [`compile_hmac`](crate::compile_hmac).
pub const MIN_HMAC_BLOCK_SIZE: usize = 16;

/// HMAC inner pad byte.
pub const HMAC_IPAD: u8 = 0x36;

/// HMAC outer pad byte.
pub const HMAC_OPAD: u8 = 0x5c;

/// Environment variable that forces a PBKDF2 backend (`any`, `fast-pbkdf2`, `ring`, `builtin`).
///
/// Read once per process. Intended for benchmarking.
pub const PBKDF2_BACKEND_ENV: &str = "DIGEST_KDF_PBKDF2_BACKEND";

/// Default PBKDF2 iteration count used by [`Pbkdf2Builder`](crate::Pbkdf2Builder).
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 300_000;

/// Default digest used by [`Pbkdf2Builder`](crate::Pbkdf2Builder).
pub const DEFAULT_PBKDF2_DIGEST: &str = "sha256";

/// Password and salt used when probing whether a backend accepts a digest.
pub(crate) const PROBE_SECRET: &[u8] = b"p";
pub(crate) const PROBE_SALT: &[u8] = b"s";
