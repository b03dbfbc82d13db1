//! Hash name normalization.
//!
//! Turns arbitrary spellings (`"SHA-256"`, `"sha2_256"`, `"SCRAM-SHA-1-PLUS"`,
//! `"Sha 512"`) into a [`HashNames`] row: the implementation name used to look
//! up a constructor, an optional standardized (IANA-style) name, and aliases.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

/// One row of the known-hash table.
struct KnownHash {
    name: &'static str,
    standard: Option<&'static str>,
    aliases: &'static [&'static str],
}

const fn row(
    name: &'static str,
    standard: Option<&'static str>,
    aliases: &'static [&'static str],
) -> KnownHash {
    KnownHash {
        name,
        standard,
        aliases,
    }
}

// Hashes with IANA-assigned names come first; the rest use compatible stand-ins.
static KNOWN_HASH_NAMES: &[KnownHash] = &[
    row("md2", Some("md2"), &[]),
    row("md5", Some("md5"), &[]),
    row("sha1", Some("sha-1"), &[]),
    row("sha224", Some("sha-224"), &["sha2-224"]),
    row("sha256", Some("sha-256"), &["sha2-256"]),
    row("sha384", Some("sha-384"), &["sha2-384"]),
    row("sha512", Some("sha-512"), &["sha2-512"]),
    row("sha512_224", Some("sha-512-224"), &["sha512-224", "sha2-512-224"]),
    row("sha512_256", Some("sha-512-256"), &["sha512-256", "sha2-512-256"]),
    row("sha3_224", Some("sha3-224"), &[]),
    row("sha3_256", Some("sha3-256"), &[]),
    row("sha3_384", Some("sha3-384"), &[]),
    row("sha3_512", Some("sha3-512"), &[]),
    row("md4", Some("md4"), &[]),
    row("sha", Some("sha-0"), &["sha0"]),
    row("ripemd", Some("ripemd"), &[]),
    row("ripemd160", Some("ripemd-160"), &[]),
];

// `SHA2-256` style: letters, optional revision digit, optional 3-4 digit size.
static HASH_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[a-z]+)-?(?P<rev>[0-9])?-?(?P<size>[0-9]{3,4})?$")
        .expect("hash name pattern is valid")
});

/// Normalized names for one digest algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashNames {
    /// Implementation name, e.g. `"sha256"`.
    pub name: String,
    /// Standardized name, e.g. `"sha-256"`.
    pub standard_name: Option<String>,
    /// Other recognized spellings.
    pub aliases: Vec<String>,
}

impl HashNames {
    fn synthesized(name: String, standard_name: String) -> Self {
        Self {
            name,
            standard_name: Some(standard_name),
            aliases: Vec::new(),
        }
    }

    /// Every non-empty name in this row, implementation name first.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.standard_name.as_deref())
            .chain(self.aliases.iter().map(String::as_str))
            .filter(|n| !n.is_empty())
    }
}

impl From<&KnownHash> for HashNames {
    fn from(row: &KnownHash) -> Self {
        Self {
            name: row.name.to_owned(),
            standard_name: row.standard.map(str::to_owned),
            aliases: row.aliases.iter().map(|a| (*a).to_owned()).collect(),
        }
    }
}

fn check_table(name: &str) -> Option<HashNames> {
    KNOWN_HASH_NAMES
        .iter()
        .find(|row| {
            row.name == name || row.standard == Some(name) || row.aliases.contains(&name)
        })
        .map(HashNames::from)
}

/// Trim, lowercase, unify separators and strip SCRAM decorations.
fn clean(raw: &str) -> String {
    let name: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if matches!(c, '_' | ' ' | '/') { '-' } else { c })
        .collect();
    match name.strip_prefix("scram-") {
        Some(rest) => rest.strip_suffix("-plus").unwrap_or(rest).to_owned(),
        None => name,
    }
}

/// Normalizes an arbitrary hash name.
///
/// Unknown names never fail: a name that merely looks like a hash identifier is
/// logged at info level, one that doesn't is logged as a warning, and a
/// best-effort row is returned in both cases.
pub fn hash_names(raw: &str) -> HashNames {
    let name = clean(raw);
    if let Some(known) = check_table(&name) {
        return known;
    }

    if let Some(caps) = HASH_SHAPE.captures(&name) {
        let rev = caps.name("rev").map(|m| m.as_str());
        let size = caps.name("size").map(|m| m.as_str());

        let mut standard = caps["name"].to_owned();
        if let Some(rev) = rev {
            standard.push_str(rev);
        }
        let mut implementation = standard.clone();
        if let Some(size) = size {
            standard.push('-');
            standard.push_str(size);
            if rev.is_some() {
                implementation.push('_');
            }
            implementation.push_str(size);
        }

        if let Some(known) = check_table(&standard) {
            return known;
        }
        info!(
            original = raw,
            name = %implementation,
            standard_name = %standard,
            "normalizing unrecognized hash name"
        );
        return HashNames::synthesized(implementation, standard);
    }

    let implementation = name.replace('-', "_");
    warn!(
        original = raw,
        name = %implementation,
        standard_name = %name,
        "normalizing unrecognized hash name and format"
    );
    HashNames::synthesized(implementation, name)
}
