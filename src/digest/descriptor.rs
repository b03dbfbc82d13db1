//! The canonical per-algorithm record handed out by the resolver.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::warn;

use crate::crypto::kdf::backend::{self, Backend, BackendSupport};
use crate::digest::constructors::{lookup_constructor, same_constructor, DigestConstructor};
use crate::digest::names::HashNames;
use crate::error::KdfError;

/// Information about one digest algorithm, as returned by [`resolve`](crate::resolve).
///
/// Equivalent identifiers resolve to the *same* `Arc<HashDescriptor>`, so the
/// `Arc` address can be used as a cache key. The only interior mutability is the
/// write-once backend probe results.
pub struct HashDescriptor {
    names: HashNames,
    constructor: Option<Arc<dyn DigestConstructor>>,
    digest_size: Option<usize>,
    block_size: Option<usize>,
    probes: [OnceCell<BackendSupport>; Backend::ACCELERATED.len()],
}

impl HashDescriptor {
    /// Builds a descriptor, sanity-checking the constructor once.
    ///
    /// # Errors
    ///
    /// [`KdfError::ConstructorSanityFailure`] if the constructor declares an
    /// empty digest, or an actual digest's length disagrees with the declared
    /// digest size.
    pub(crate) fn new(
        constructor: Arc<dyn DigestConstructor>,
        names: HashNames,
    ) -> Result<Self, KdfError> {
        let state = constructor.new_hash();
        let declared = state.digest_size();
        let block_size = state.block_size();
        let reported = state.name().to_owned();
        let actual = state.finalize().len();

        if declared == 0 || actual != declared {
            return Err(KdfError::ConstructorSanityFailure {
                name: names.name,
                declared,
                actual,
            });
        }
        if reported != names.name {
            warn!(
                name = %names.name,
                reported = %reported,
                "inconsistent digest name: constructor reports a different name"
            );
        }

        Ok(Self {
            names,
            constructor: Some(constructor),
            digest_size: Some(declared),
            block_size: Some(block_size),
            probes: Default::default(),
        })
    }

    /// Placeholder for a name with no available implementation.
    pub(crate) fn unavailable(names: HashNames) -> Self {
        Self {
            names,
            constructor: None,
            digest_size: None,
            block_size: None,
            probes: Default::default(),
        }
    }

    /// Canonical implementation name (e.g. `"sha256"`).
    pub fn name(&self) -> &str {
        &self.names.name
    }

    /// Standardized name (e.g. `"sha-256"`), if one is assigned.
    pub fn standard_name(&self) -> Option<&str> {
        self.names.standard_name.as_deref()
    }

    pub fn aliases(&self) -> &[String] {
        &self.names.aliases
    }

    pub(crate) fn names(&self) -> &HashNames {
        &self.names
    }

    pub fn constructor(&self) -> Option<&Arc<dyn DigestConstructor>> {
        self.constructor.as_ref()
    }

    pub fn digest_size(&self) -> Option<usize> {
        self.digest_size
    }

    pub fn block_size(&self) -> Option<usize> {
        self.block_size
    }

    /// `false` for placeholder descriptors returned by tolerant resolution.
    pub fn is_available(&self) -> bool {
        self.constructor.is_some()
    }

    /// Constructor, digest size and block size, or [`KdfError::UnknownHash`]
    /// for a placeholder descriptor.
    pub(crate) fn require(&self) -> Result<(&Arc<dyn DigestConstructor>, usize, usize), KdfError> {
        match (&self.constructor, self.digest_size, self.block_size) {
            (Some(c), Some(d), Some(b)) => Ok((c, d, b)),
            _ => Err(KdfError::UnknownHash(self.names.name.clone())),
        }
    }

    /// Whether `backend` can derive PBKDF2 keys with this digest.
    ///
    /// Accelerated backends are probed at most once per descriptor; the builtin
    /// backend is always [`BackendSupport::Supported`]. Accelerated backends
    /// select their digest by name, so a descriptor built from any constructor
    /// other than the linked-in one for that name is unsupported by them.
    pub fn supported_by(&self, backend: Backend) -> BackendSupport {
        match backend.probe_slot() {
            Some(slot) => *self.probes[slot].get_or_init(|| {
                if !backend.is_enabled() {
                    BackendSupport::Unavailable
                } else if self.is_linked_in() {
                    backend::probe(backend, self.name())
                } else {
                    BackendSupport::Unsupported
                }
            }),
            None => BackendSupport::Supported,
        }
    }

    fn is_linked_in(&self) -> bool {
        match (&self.constructor, lookup_constructor(self.name())) {
            (Some(ours), Some(linked)) => same_constructor(ours, &linked),
            _ => false,
        }
    }
}

impl fmt::Debug for HashDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashDescriptor")
            .field("name", &self.names.name)
            .field("standard_name", &self.names.standard_name)
            .field("aliases", &self.names.aliases)
            .field("available", &self.is_available())
            .field("digest_size", &self.digest_size)
            .field("block_size", &self.block_size)
            .finish()
    }
}

impl fmt::Display for HashDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.digest_size, self.block_size) {
            (Some(d), Some(b)) => write!(f, "{} (digest_size={d}, block_size={b})", self.name()),
            _ => write!(f, "{} (unavailable)", self.name()),
        }
    }
}
