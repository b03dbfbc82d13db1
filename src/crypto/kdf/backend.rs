//! src/crypto/kdf/backend.rs
//!
//! PBKDF2 backend selection.
//!
//! Accelerated backends are compiled in through Cargo features and probed
//! per digest; the builtin lane accumulator is always available. The
//! `DIGEST_KDF_PBKDF2_BACKEND` environment variable can restrict selection
//! for benchmarking.

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::consts::{PBKDF2_BACKEND_ENV, PROBE_SALT, PROBE_SECRET};
use crate::error::KdfError;

/// A PBKDF2-HMAC implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Monomorphized RustCrypto `pbkdf2` (feature `fast-pbkdf2`).
    FastPbkdf2,
    /// `ring::pbkdf2` (feature `ring`).
    Ring,
    /// The crate's own lane accumulator.
    Builtin,
}

/// Result of probing a backend for one digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendSupport {
    Supported,
    Unsupported,
    /// Backend not compiled in, or disabled by the environment override.
    Unavailable,
}

impl Backend {
    /// Accelerated backends in priority order.
    pub const ACCELERATED: [Backend; 2] = [Backend::FastPbkdf2, Backend::Ring];

    pub const fn name(self) -> &'static str {
        match self {
            Backend::FastPbkdf2 => "fast-pbkdf2",
            Backend::Ring => "ring",
            Backend::Builtin => "builtin-lanes",
        }
    }

    /// Index into a descriptor's probe cells; `None` for the builtin backend.
    pub(crate) const fn probe_slot(self) -> Option<usize> {
        match self {
            Backend::FastPbkdf2 => Some(0),
            Backend::Ring => Some(1),
            Backend::Builtin => None,
        }
    }

    pub const fn is_compiled(self) -> bool {
        match self {
            Backend::FastPbkdf2 => cfg!(feature = "fast-pbkdf2"),
            Backend::Ring => cfg!(feature = "ring"),
            Backend::Builtin => true,
        }
    }

    /// Compiled in and not excluded by the environment override.
    pub fn is_enabled(self) -> bool {
        self.is_compiled() && POLICY.allows(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackendPolicy {
    Any,
    Only(Backend),
}

impl BackendPolicy {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "any" => BackendPolicy::Any,
            "fast-pbkdf2" => BackendPolicy::Only(Backend::FastPbkdf2),
            "ring" => BackendPolicy::Only(Backend::Ring),
            "builtin" | "builtin-lanes" => BackendPolicy::Only(Backend::Builtin),
            other => {
                warn!(value = other, env = PBKDF2_BACKEND_ENV, "ignoring unknown pbkdf2 backend");
                BackendPolicy::Any
            }
        }
    }

    fn from_env() -> Self {
        let policy = std::env::var(PBKDF2_BACKEND_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or(BackendPolicy::Any);
        debug!(?policy, "pbkdf2 backend policy");
        policy
    }

    fn allows(self, backend: Backend) -> bool {
        match self {
            BackendPolicy::Any => true,
            BackendPolicy::Only(only) => backend == only || backend == Backend::Builtin,
        }
    }
}

static POLICY: Lazy<BackendPolicy> = Lazy::new(BackendPolicy::from_env);

/// Names of the enabled backends, in the order they are tried.
pub fn pbkdf2_backends() -> Vec<&'static str> {
    Backend::ACCELERATED
        .into_iter()
        .filter(|b| b.is_enabled())
        .chain(std::iter::once(Backend::Builtin))
        .map(Backend::name)
        .collect()
}

/// Very rough speed of the best enabled backend relative to the builtin one.
pub fn pbkdf2_speed_factor() -> f32 {
    if Backend::FastPbkdf2.is_enabled() {
        3.0
    } else if Backend::Ring.is_enabled() {
        1.4
    } else {
        1.0
    }
}

/// Trial derivation deciding whether `backend` accepts digest `name`.
pub(crate) fn probe(backend: Backend, name: &str) -> BackendSupport {
    if !backend.is_enabled() {
        return BackendSupport::Unavailable;
    }
    let mut out = [0u8; 1];
    let support = match derive(backend, name, PROBE_SECRET, PROBE_SALT, 1, &mut out) {
        Ok(()) => BackendSupport::Supported,
        Err(_) => BackendSupport::Unsupported,
    };
    debug!(backend = backend.name(), digest = name, ?support, "probed pbkdf2 backend");
    support
}

/// Runs an accelerated backend. Callers validate `rounds` and the output length.
pub(crate) fn derive(
    backend: Backend,
    name: &str,
    secret: &[u8],
    salt: &[u8],
    rounds: u32,
    out: &mut [u8],
) -> Result<(), KdfError> {
    match backend {
        #[cfg(feature = "fast-pbkdf2")]
        Backend::FastPbkdf2 => fast::derive(name, secret, salt, rounds, out),
        #[cfg(feature = "ring")]
        Backend::Ring => native::derive(name, secret, salt, rounds, out),
        _ => {
            let _ = (name, secret, salt, rounds, out);
            Err(KdfError::invalid(format!(
                "pbkdf2 backend {} is not compiled in",
                backend.name()
            )))
        }
    }
}

#[cfg(feature = "fast-pbkdf2")]
mod fast {
    use hmac::Hmac;
    use pbkdf2::pbkdf2;

    use crate::error::KdfError;

    macro_rules! derive_with {
        ($digest:ty, $secret:expr, $salt:expr, $rounds:expr, $out:expr) => {
            pbkdf2::<Hmac<$digest>>($secret, $salt, $rounds, $out)
                .map_err(|e| KdfError::invalid(format!("PBKDF2 failed: {e}")))
        };
    }

    pub(super) fn derive(
        name: &str,
        secret: &[u8],
        salt: &[u8],
        rounds: u32,
        out: &mut [u8],
    ) -> Result<(), KdfError> {
        match name {
            "md4" => derive_with!(md4::Md4, secret, salt, rounds, out),
            "md5" => derive_with!(md5::Md5, secret, salt, rounds, out),
            "sha1" => derive_with!(sha1::Sha1, secret, salt, rounds, out),
            "sha224" => derive_with!(sha2::Sha224, secret, salt, rounds, out),
            "sha256" => derive_with!(sha2::Sha256, secret, salt, rounds, out),
            "sha384" => derive_with!(sha2::Sha384, secret, salt, rounds, out),
            "sha512" => derive_with!(sha2::Sha512, secret, salt, rounds, out),
            "sha512_224" => derive_with!(sha2::Sha512_224, secret, salt, rounds, out),
            "sha512_256" => derive_with!(sha2::Sha512_256, secret, salt, rounds, out),
            #[cfg(feature = "extended-digests")]
            "sha3_224" => derive_with!(sha3::Sha3_224, secret, salt, rounds, out),
            #[cfg(feature = "extended-digests")]
            "sha3_256" => derive_with!(sha3::Sha3_256, secret, salt, rounds, out),
            #[cfg(feature = "extended-digests")]
            "sha3_384" => derive_with!(sha3::Sha3_384, secret, salt, rounds, out),
            #[cfg(feature = "extended-digests")]
            "sha3_512" => derive_with!(sha3::Sha3_512, secret, salt, rounds, out),
            #[cfg(feature = "extended-digests")]
            "ripemd160" => derive_with!(ripemd::Ripemd160, secret, salt, rounds, out),
            _ => Err(KdfError::UnknownHash(name.to_owned())),
        }
    }
}

#[cfg(feature = "ring")]
mod native {
    use std::num::NonZeroU32;

    use ring::pbkdf2;

    use crate::error::KdfError;

    pub(super) fn derive(
        name: &str,
        secret: &[u8],
        salt: &[u8],
        rounds: u32,
        out: &mut [u8],
    ) -> Result<(), KdfError> {
        let algorithm = match name {
            "sha1" => pbkdf2::PBKDF2_HMAC_SHA1,
            "sha256" => pbkdf2::PBKDF2_HMAC_SHA256,
            "sha384" => pbkdf2::PBKDF2_HMAC_SHA384,
            "sha512" => pbkdf2::PBKDF2_HMAC_SHA512,
            _ => return Err(KdfError::UnknownHash(name.to_owned())),
        };
        let iterations =
            NonZeroU32::new(rounds).ok_or_else(|| KdfError::invalid("rounds must be at least 1"))?;
        pbkdf2::derive(algorithm, iterations, salt, secret, out);
        Ok(())
    }
}
