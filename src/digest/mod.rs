//! # Digest Resolution
//!
//! Maps hash identifiers (names in any common spelling, constructors, or
//! already-resolved descriptors) to a canonical, shared [`HashDescriptor`].
//!
//! ```
//! use digest_kdf::{resolve, HashIdentifier};
//! use std::sync::Arc;
//!
//! let a = resolve("SHA2-256")?;
//! let b = resolve("sha256")?;
//! assert!(Arc::ptr_eq(&a, &b));
//! assert_eq!(a.standard_name(), Some("sha-256"));
//! assert_eq!(a.digest_size(), Some(32));
//! # Ok::<(), digest_kdf::KdfError>(())
//! ```

pub mod constructors;
pub mod descriptor;
pub mod names;
pub mod registry;

use std::sync::Arc;

use tracing::warn;

pub use constructors::{lookup_constructor, DigestConstructor, HashState, RustCryptoDigest};
pub use descriptor::HashDescriptor;
pub use names::{hash_names, HashNames};
pub use registry::DigestRegistry;

use crate::error::KdfError;

/// Anything the resolver accepts.
#[derive(Clone)]
pub enum HashIdentifier<'a> {
    /// A digest name in any supported spelling.
    Name(&'a str),
    /// A digest name as bytes; must be UTF-8.
    RawName(&'a [u8]),
    /// An already-resolved descriptor, returned unchanged.
    Descriptor(Arc<HashDescriptor>),
    /// A constructor, resolved through its self-reported name.
    Constructor(Arc<dyn DigestConstructor>),
}

impl<'a> From<&'a str> for HashIdentifier<'a> {
    fn from(name: &'a str) -> Self {
        HashIdentifier::Name(name)
    }
}

impl<'a> From<&'a String> for HashIdentifier<'a> {
    fn from(name: &'a String) -> Self {
        HashIdentifier::Name(name)
    }
}

impl<'a> From<&'a [u8]> for HashIdentifier<'a> {
    fn from(raw: &'a [u8]) -> Self {
        HashIdentifier::RawName(raw)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for HashIdentifier<'a> {
    fn from(raw: &'a [u8; N]) -> Self {
        HashIdentifier::RawName(raw)
    }
}

impl From<Arc<HashDescriptor>> for HashIdentifier<'_> {
    fn from(descriptor: Arc<HashDescriptor>) -> Self {
        HashIdentifier::Descriptor(descriptor)
    }
}

impl From<&Arc<HashDescriptor>> for HashIdentifier<'_> {
    fn from(descriptor: &Arc<HashDescriptor>) -> Self {
        HashIdentifier::Descriptor(Arc::clone(descriptor))
    }
}

impl From<Arc<dyn DigestConstructor>> for HashIdentifier<'_> {
    fn from(constructor: Arc<dyn DigestConstructor>) -> Self {
        HashIdentifier::Constructor(constructor)
    }
}

impl From<&Arc<dyn DigestConstructor>> for HashIdentifier<'_> {
    fn from(constructor: &Arc<dyn DigestConstructor>) -> Self {
        HashIdentifier::Constructor(Arc::clone(constructor))
    }
}

/// Resolves a digest identifier using the global [`DigestRegistry`].
///
/// Repeated calls with equivalent identifiers return the same `Arc`.
///
/// # Errors
///
/// - [`KdfError::UnknownHash`] if no implementation is available
/// - [`KdfError::UnsupportedIdentifierKind`] for non-UTF-8 or empty names
/// - [`KdfError::ConstructorSanityFailure`] if the implementation is broken
pub fn resolve<'a>(identifier: impl Into<HashIdentifier<'a>>) -> Result<Arc<HashDescriptor>, KdfError> {
    DigestRegistry::global().resolve(identifier)
}

/// Resolves a digest identifier, returning a constructor-less placeholder
/// instead of failing on unknown names.
pub fn resolve_tolerant<'a>(
    identifier: impl Into<HashIdentifier<'a>>,
) -> Result<Arc<HashDescriptor>, KdfError> {
    DigestRegistry::global().resolve_tolerant(identifier)
}

/// Clears the global descriptor cache.
pub fn clear_cache() {
    DigestRegistry::global().clear();
}

/// Naming convention for [`norm_hash_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameFormat {
    /// The resolver's own implementation name (`"sha256"`).
    #[default]
    Implementation,
    /// The standardized name (`"sha-256"`); `None` when none is assigned.
    Standard,
}

/// Normalizes a hash name to the requested convention.
///
/// Unknown names are normalized heuristically and logged as a warning.
pub fn norm_hash_name(name: &str, format: NameFormat) -> Result<Option<String>, KdfError> {
    let info = resolve_tolerant(name)?;
    if !info.is_available() {
        warn!(name, "norm_hash_name(): unknown hash");
    }
    Ok(match format {
        NameFormat::Implementation => Some(info.name().to_owned()),
        NameFormat::Standard => info.standard_name().map(str::to_owned),
    })
}
