//! Digest constructors.
//!
//! A [`DigestConstructor`] produces fresh [`HashState`]s on demand. The
//! built-in constructors wrap RustCrypto digests; callers may supply their own
//! (e.g. test doubles) and resolve them like any other identifier.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use digest::core_api::BlockSizeUser;
use digest::Digest;
use once_cell::sync::Lazy;

/// A stateful, cloneable hash computation.
pub trait HashState: Send + Sync {
    /// Self-reported implementation name (e.g. `"sha256"`).
    fn name(&self) -> &str;

    /// Output length in bytes.
    fn digest_size(&self) -> usize;

    /// Internal block length in bytes.
    fn block_size(&self) -> usize;

    fn update(&mut self, data: &[u8]);

    /// Consumes the state and returns the digest.
    fn finalize(self: Box<Self>) -> Vec<u8>;

    /// Duplicates the current state.
    fn box_clone(&self) -> Box<dyn HashState>;
}

/// Factory for [`HashState`]s.
///
/// Constructors are compared by identity (`Arc` address) when cached.
pub trait DigestConstructor: Send + Sync {
    fn new_hash(&self) -> Box<dyn HashState>;

    /// One-shot digest of `data`.
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        let mut state = self.new_hash();
        state.update(data);
        state.finalize()
    }
}

/// [`HashState`] over any RustCrypto [`Digest`].
#[derive(Clone)]
pub struct RustCryptoState<D> {
    name: &'static str,
    inner: D,
}

impl<D> HashState for RustCryptoState<D>
where
    D: Digest + BlockSizeUser + Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        self.name
    }

    fn digest_size(&self) -> usize {
        <D as Digest>::output_size()
    }

    fn block_size(&self) -> usize {
        <D as BlockSizeUser>::block_size()
    }

    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.inner, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.inner.finalize().to_vec()
    }

    fn box_clone(&self) -> Box<dyn HashState> {
        Box::new(self.clone())
    }
}

/// Constructor for a RustCrypto digest type.
pub struct RustCryptoDigest<D> {
    name: &'static str,
    _digest: PhantomData<fn() -> D>,
}

impl<D> RustCryptoDigest<D> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _digest: PhantomData,
        }
    }
}

impl<D> DigestConstructor for RustCryptoDigest<D>
where
    D: Digest + BlockSizeUser + Clone + Send + Sync + 'static,
{
    fn new_hash(&self) -> Box<dyn HashState> {
        Box::new(RustCryptoState {
            name: self.name,
            inner: D::new(),
        })
    }
}

impl<D> fmt::Debug for RustCryptoDigest<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RustCryptoDigest({})", self.name)
    }
}

type ConstructorTable = Vec<(&'static str, Arc<dyn DigestConstructor>)>;

fn entry<D>(name: &'static str) -> (&'static str, Arc<dyn DigestConstructor>)
where
    D: Digest + BlockSizeUser + Clone + Send + Sync + 'static,
{
    let constructor: Arc<dyn DigestConstructor> = Arc::new(RustCryptoDigest::<D>::new(name));
    (name, constructor)
}

// Digests always linked in, looked up first.
static NATIVE_DIGESTS: Lazy<ConstructorTable> = Lazy::new(|| {
    vec![
        entry::<md5::Md5>("md5"),
        entry::<sha1::Sha1>("sha1"),
        entry::<sha2::Sha224>("sha224"),
        entry::<sha2::Sha256>("sha256"),
        entry::<sha2::Sha384>("sha384"),
        entry::<sha2::Sha512>("sha512"),
    ]
});

// Less common digests, constructed by name.
static EXTENDED_DIGESTS: Lazy<ConstructorTable> = Lazy::new(|| {
    #[allow(unused_mut)]
    let mut table = vec![
        entry::<sha2::Sha512_224>("sha512_224"),
        entry::<sha2::Sha512_256>("sha512_256"),
    ];
    #[cfg(feature = "extended-digests")]
    table.extend([
        entry::<sha3::Sha3_224>("sha3_224"),
        entry::<sha3::Sha3_256>("sha3_256"),
        entry::<sha3::Sha3_384>("sha3_384"),
        entry::<sha3::Sha3_512>("sha3_512"),
        entry::<ripemd::Ripemd160>("ripemd160"),
    ]);
    table
});

// Legacy fallback for platforms whose by-name table lacks it.
static BUILTIN_MD4: Lazy<Arc<dyn DigestConstructor>> =
    Lazy::new(|| -> Arc<dyn DigestConstructor> { Arc::new(RustCryptoDigest::<md4::Md4>::new("md4")) });

fn find(table: &ConstructorTable, name: &str) -> Option<Arc<dyn DigestConstructor>> {
    table
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| Arc::clone(c))
}

/// Looks up the constructor for an implementation name.
///
/// Search order: native table, extended by-name table, builtin MD4. Returns
/// `None` when no implementation is linked in; the same `Arc` is returned on
/// every call for a given name.
pub fn lookup_constructor(name: &str) -> Option<Arc<dyn DigestConstructor>> {
    find(&NATIVE_DIGESTS, name)
        .or_else(|| find(&EXTENDED_DIGESTS, name))
        .or_else(|| (name == "md4").then(|| Arc::clone(&BUILTIN_MD4)))
}

/// Address of a constructor, used as its identity.
pub(crate) fn constructor_id(constructor: &Arc<dyn DigestConstructor>) -> usize {
    Arc::as_ptr(constructor) as *const () as usize
}

pub(crate) fn same_constructor(
    a: &Arc<dyn DigestConstructor>,
    b: &Arc<dyn DigestConstructor>,
) -> bool {
    constructor_id(a) == constructor_id(b)
}
