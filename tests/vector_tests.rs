//! tests/vector_tests.rs
//! Published PBKDF2 vectors, run through every dispatch path

use std::path::PathBuf;

use digest_kdf::{pbkdf2_hmac, pbkdf2_hmac_with_backend, resolve, Backend, BackendSupport};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Pbkdf2Vector {
    source: String,
    digest: String,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    password_hex: Option<String>,
    #[serde(default)]
    salt: Option<String>,
    #[serde(default)]
    salt_hex: Option<String>,
    rounds: u32,
    keylen: usize,
    derived_hex: String,
}

impl Pbkdf2Vector {
    fn bytes(text: &Option<String>, hex_text: &Option<String>) -> Vec<u8> {
        match (text, hex_text) {
            (Some(text), _) => text.as_bytes().to_vec(),
            (None, Some(h)) => hex::decode(h).expect("vector hex is valid"),
            (None, None) => Vec::new(),
        }
    }

    fn password(&self) -> Vec<u8> {
        Self::bytes(&self.password, &self.password_hex)
    }

    fn salt(&self) -> Vec<u8> {
        Self::bytes(&self.salt, &self.salt_hex)
    }
}

fn load_json<T: for<'de> Deserialize<'de>>(name: &str) -> T {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/test_data")
        .join(name);
    let data = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_str(&data).unwrap_or_else(|e| panic!("bad JSON in {name}: {e}"))
}

#[test]
fn pbkdf2_vectors_default_dispatch() {
    let vectors: Vec<Pbkdf2Vector> = load_json("pbkdf2_vectors.json");
    assert!(!vectors.is_empty());
    for v in &vectors {
        let key = pbkdf2_hmac(v.digest.as_str(), v.password(), v.salt(), v.rounds, Some(v.keylen))
            .unwrap();
        assert_eq!(hex::encode(key), v.derived_hex, "{} {v:?}", v.source);
    }
}

#[test]
fn pbkdf2_vectors_builtin_backend() {
    let vectors: Vec<Pbkdf2Vector> = load_json("pbkdf2_vectors.json");
    for v in &vectors {
        let key = pbkdf2_hmac_with_backend(
            Backend::Builtin,
            v.digest.as_str(),
            v.password(),
            v.salt(),
            v.rounds,
            Some(v.keylen),
        )
        .unwrap();
        assert_eq!(hex::encode(key), v.derived_hex, "{} {v:?}", v.source);
    }
}

#[test]
fn pbkdf2_vectors_accelerated_backends() {
    let vectors: Vec<Pbkdf2Vector> = load_json("pbkdf2_vectors.json");
    for v in &vectors {
        let info = resolve(v.digest.as_str()).unwrap();
        for backend in Backend::ACCELERATED {
            if info.supported_by(backend) != BackendSupport::Supported {
                continue;
            }
            let key = pbkdf2_hmac_with_backend(
                backend,
                &info,
                v.password(),
                v.salt(),
                v.rounds,
                Some(v.keylen),
            )
            .unwrap();
            assert_eq!(
                hex::encode(key),
                v.derived_hex,
                "{} via {} {v:?}",
                v.source,
                backend.name()
            );
        }
    }
}
