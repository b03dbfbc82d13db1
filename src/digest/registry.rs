//! Process-wide descriptor cache.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::digest::constructors::{constructor_id, lookup_constructor, same_constructor, DigestConstructor};
use crate::digest::descriptor::HashDescriptor;
use crate::digest::names::{hash_names, HashNames};
use crate::digest::HashIdentifier;
use crate::error::KdfError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Name(String),
    Constructor(usize),
}

impl CacheKey {
    fn name(name: &str) -> Self {
        CacheKey::Name(name.to_owned())
    }
}

static GLOBAL: Lazy<DigestRegistry> = Lazy::new(DigestRegistry::new);

/// Cache of resolved [`HashDescriptor`]s, keyed by every name that led to
/// them and by constructor identity.
///
/// Starts empty and only grows until [`clear`](Self::clear) is called. At most
/// one descriptor is ever stored per canonical name or constructor; a thread
/// that loses an insertion race gets the already-stored instance.
#[derive(Debug, Default)]
pub struct DigestRegistry {
    cache: RwLock<HashMap<CacheKey, Arc<HashDescriptor>>>,
}

impl DigestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry used by the crate-level functions.
    pub fn global() -> &'static DigestRegistry {
        &GLOBAL
    }

    /// Resolves an identifier, failing with [`KdfError::UnknownHash`] when no
    /// implementation exists.
    pub fn resolve<'a>(
        &self,
        identifier: impl Into<HashIdentifier<'a>>,
    ) -> Result<Arc<HashDescriptor>, KdfError> {
        self.resolve_identifier(identifier.into(), false)
    }

    /// Like [`resolve`](Self::resolve), but unknown names yield an uncached
    /// placeholder descriptor with no constructor.
    pub fn resolve_tolerant<'a>(
        &self,
        identifier: impl Into<HashIdentifier<'a>>,
    ) -> Result<Arc<HashDescriptor>, KdfError> {
        self.resolve_identifier(identifier.into(), true)
    }

    /// Drops every cached descriptor.
    pub fn clear(&self) {
        self.cache.write().clear();
    }

    /// Number of cache keys (names plus constructors).
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    fn lookup(&self, key: &CacheKey) -> Option<Arc<HashDescriptor>> {
        self.cache.read().get(key).cloned()
    }

    fn resolve_identifier(
        &self,
        identifier: HashIdentifier<'_>,
        tolerant: bool,
    ) -> Result<Arc<HashDescriptor>, KdfError> {
        match identifier {
            HashIdentifier::Name(name) => self.resolve_name(name, tolerant),
            HashIdentifier::RawName(raw) => {
                let name = std::str::from_utf8(raw).map_err(|_| {
                    KdfError::UnsupportedIdentifierKind("digest name is not valid UTF-8".into())
                })?;
                self.resolve_name(name, tolerant)
            }
            HashIdentifier::Descriptor(descriptor) => Ok(descriptor),
            HashIdentifier::Constructor(constructor) => self.resolve_constructor(constructor),
        }
    }

    fn resolve_name(&self, raw: &str, tolerant: bool) -> Result<Arc<HashDescriptor>, KdfError> {
        if let Some(hit) = self.lookup(&CacheKey::name(raw)) {
            return Ok(hit);
        }

        let names = hash_names(raw);
        if names.name.is_empty() {
            return Err(KdfError::UnsupportedIdentifierKind(format!(
                "empty digest name: {raw:?}"
            )));
        }

        let info = match self.lookup(&CacheKey::name(&names.name)) {
            Some(hit) => hit,
            None => self.resolve_canonical(names, tolerant)?,
        };

        // placeholders stay uncached so a later strict lookup still fails
        if info.is_available() && info.name() != raw {
            let mut cache = self.cache.write();
            let stored = cache
                .entry(CacheKey::name(raw))
                .or_insert_with(|| Arc::clone(&info));
            return Ok(Arc::clone(stored));
        }
        Ok(info)
    }

    fn resolve_canonical(
        &self,
        names: HashNames,
        tolerant: bool,
    ) -> Result<Arc<HashDescriptor>, KdfError> {
        match lookup_constructor(&names.name) {
            Some(constructor) => {
                let info = HashDescriptor::new(constructor, names)?;
                Ok(self.store(info, true))
            }
            None if tolerant => Ok(Arc::new(HashDescriptor::unavailable(names))),
            None => Err(KdfError::UnknownHash(names.name)),
        }
    }

    fn resolve_constructor(
        &self,
        constructor: Arc<dyn DigestConstructor>,
    ) -> Result<Arc<HashDescriptor>, KdfError> {
        if let Some(hit) = self.lookup(&CacheKey::Constructor(constructor_id(&constructor))) {
            return Ok(hit);
        }

        // trust the self-reported name as the canonical one
        let reported = constructor.new_hash().name().to_owned();
        let names = hash_names(&reported);
        if names.name.is_empty() {
            return Err(KdfError::UnsupportedIdentifierKind(
                "digest constructor reports an empty name".into(),
            ));
        }

        // a different authoritative constructor means this one is a stand-in
        // (mock, third-party build); it must not shadow the real one by name
        let by_name = match lookup_constructor(&names.name) {
            Some(authoritative) => same_constructor(&authoritative, &constructor),
            None => true,
        };

        let info = HashDescriptor::new(constructor, names)?;
        Ok(self.store(info, by_name))
    }

    fn store(&self, info: HashDescriptor, by_name: bool) -> Arc<HashDescriptor> {
        let constructor_key = info
            .constructor()
            .map(|c| CacheKey::Constructor(constructor_id(c)));

        let mut cache = self.cache.write();
        if let Some(existing) = constructor_key.as_ref().and_then(|k| cache.get(k)) {
            return Arc::clone(existing);
        }

        let info = Arc::new(info);
        if let Some(key) = constructor_key {
            cache.insert(key, Arc::clone(&info));
        }

        if by_name {
            if cache.contains_key(&CacheKey::name(info.name())) {
                debug!(name = info.name(), "name already bound to another constructor");
            } else {
                for name in info.names().all() {
                    cache
                        .entry(CacheKey::name(name))
                        .or_insert_with(|| Arc::clone(&info));
                }
            }
        }

        debug!(descriptor = %info, by_name, "cached digest descriptor");
        info
    }
}
