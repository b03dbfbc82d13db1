//! tests/kdf_tests.rs
//! PBKDF1 / PBKDF2 parameter handling, backend agreement and odd digest sizes

mod common;

use common::{
    narrow_block_sha512, reference_pbkdf2, truncated_sha512, TEST_ITERATIONS,
    TEST_ITERATION_VALUES, TEST_PASSWORD, TEST_SALT,
};
use digest_kdf::{
    pbkdf1, pbkdf2_backends, pbkdf2_hmac, pbkdf2_hmac_with_backend, pbkdf2_speed_factor, resolve,
    Backend, BackendSupport, KdfError,
};
use sha1::{Digest, Sha1};

#[test]
fn pbkdf2_sha256_single_round() {
    let key = pbkdf2_hmac("sha256", TEST_PASSWORD, TEST_SALT, 1, Some(32)).unwrap();
    assert_eq!(
        hex::encode(key),
        "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
    );
}

#[test]
fn pbkdf2_defaults_keylen_to_digest_size() {
    for (digest, size) in [("md5", 16), ("sha1", 20), ("sha384", 48), ("sha512", 64)] {
        let key = pbkdf2_hmac(digest, TEST_PASSWORD, TEST_SALT, 1, None).unwrap();
        assert_eq!(key.len(), size, "{digest}");
    }
}

#[test]
fn pbkdf2_output_is_prefix_stable() {
    let long = pbkdf2_hmac("sha1", TEST_PASSWORD, TEST_SALT, 3, Some(50)).unwrap();
    for keylen in [1, 19, 20, 21, 40, 41] {
        let short = pbkdf2_hmac("sha1", TEST_PASSWORD, TEST_SALT, 3, Some(keylen)).unwrap();
        assert_eq!(short, long[..keylen], "keylen {keylen}");
    }
}

#[test]
fn pbkdf2_rejects_bad_parameters() {
    assert!(matches!(
        pbkdf2_hmac("sha256", "p", "s", 0, None),
        Err(KdfError::InvalidParameter(_))
    ));
    assert!(matches!(
        pbkdf2_hmac("sha256", "p", "s", 1, Some(0)),
        Err(KdfError::InvalidParameter(_))
    ));
    // rounds is checked before keylen
    assert!(matches!(
        pbkdf2_hmac("sha256", "p", "s", 0, Some(0)),
        Err(KdfError::InvalidParameter(msg)) if msg.contains("rounds")
    ));
    // resolution is checked before everything else
    assert!(matches!(
        pbkdf2_hmac("nosuchhash", "p", "s", 0, Some(0)),
        Err(KdfError::UnknownHash(_))
    ));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn pbkdf2_rejects_too_many_blocks() {
    let keylen = 20 * (u32::MAX as usize) + 1;
    assert_eq!(
        pbkdf2_hmac("sha1", "p", "s", 1, Some(keylen)).unwrap_err(),
        KdfError::KeyTooLong {
            keylen,
            digest_size: 20
        }
    );
}

#[test]
fn builtin_backend_matches_reference() {
    let cases: &[(&str, usize, usize)] = &[("md5", 64, 16), ("sha1", 64, 20), ("sha256", 64, 32)];
    for &(digest, block_size, size) in cases {
        let info = resolve(digest).unwrap();
        let constructor = info.constructor().unwrap();
        for &rounds in TEST_ITERATION_VALUES {
            let keylen = size * 2 + 3;
            let expected =
                reference_pbkdf2(constructor, block_size, b"secret", b"NaCl", rounds, keylen);
            let actual = pbkdf2_hmac_with_backend(
                Backend::Builtin,
                &info,
                "secret",
                "NaCl",
                rounds,
                Some(keylen),
            )
            .unwrap();
            assert_eq!(actual, expected, "{digest} rounds {rounds}");
        }
    }
}

#[test]
fn every_supported_backend_agrees() {
    for digest in ["md4", "md5", "sha1", "sha224", "sha256", "sha384", "sha512", "sha512_256"] {
        let info = resolve(digest).unwrap();
        let builtin = pbkdf2_hmac_with_backend(
            Backend::Builtin,
            &info,
            TEST_PASSWORD,
            TEST_SALT,
            TEST_ITERATIONS,
            Some(70),
        )
        .unwrap();
        assert_eq!(
            pbkdf2_hmac(&info, TEST_PASSWORD, TEST_SALT, TEST_ITERATIONS, Some(70)).unwrap(),
            builtin,
            "{digest} default dispatch"
        );
        for backend in Backend::ACCELERATED {
            if info.supported_by(backend) == BackendSupport::Supported {
                let accelerated = pbkdf2_hmac_with_backend(
                    backend,
                    &info,
                    TEST_PASSWORD,
                    TEST_SALT,
                    TEST_ITERATIONS,
                    Some(70),
                )
                .unwrap();
                assert_eq!(accelerated, builtin, "{digest} via {}", backend.name());
            }
        }
    }
}

#[test]
fn pinned_backend_must_support_digest() {
    let toy = truncated_sha512("toypinned", 32);
    for backend in Backend::ACCELERATED {
        assert!(matches!(
            pbkdf2_hmac_with_backend(backend, &toy, "p", "s", 1, None),
            Err(KdfError::InvalidParameter(_))
        ));
    }
}

#[test]
fn stand_in_constructor_never_uses_accelerated_backend() {
    let stand_in = truncated_sha512("sha256", 32);
    let info = resolve(&stand_in).unwrap();
    for backend in Backend::ACCELERATED {
        assert_ne!(info.supported_by(backend), BackendSupport::Supported);
    }
    let key = pbkdf2_hmac(&info, "p", "s", 2, None).unwrap();
    assert_eq!(key, reference_pbkdf2(&stand_in, 128, b"p", b"s", 2, 32));
    assert_ne!(key, pbkdf2_hmac("sha256", "p", "s", 2, None).unwrap());
}

#[test]
fn digest_sizes_outside_fixed_lanes() {
    // 36 and 24 bytes use the dynamic lane layout
    for (name, size) in [("toythirtysix", 36usize), ("toytwentyfour", 24)] {
        let toy = truncated_sha512(name, size);
        for rounds in [1, 2, 17] {
            let key = pbkdf2_hmac(&toy, "secret", "salt", rounds, Some(size + 5)).unwrap();
            let expected = reference_pbkdf2(&toy, 128, b"secret", b"salt", rounds, size + 5);
            assert_eq!(key, expected, "{name} rounds {rounds}");
        }
    }
}

#[test]
fn digest_size_must_be_word_aligned() {
    let toy = truncated_sha512("toyeighteen", 18);
    assert_eq!(
        pbkdf2_hmac(&toy, "p", "s", 1, None).unwrap_err(),
        KdfError::UnsupportedDigestSize(18)
    );
}

#[test]
fn zero_length_digest_is_rejected_at_resolution() {
    let empty = truncated_sha512("toyzero", 0);
    assert_eq!(
        resolve(&empty).unwrap_err(),
        KdfError::ConstructorSanityFailure {
            name: "toyzero".into(),
            declared: 0,
            actual: 0,
        }
    );
    assert!(matches!(
        pbkdf2_hmac(&empty, "p", "s", 1, Some(4)),
        Err(KdfError::ConstructorSanityFailure { declared: 0, .. })
    ));
    assert!(matches!(
        pbkdf1(&empty, "p", "s", 1, None),
        Err(KdfError::ConstructorSanityFailure { declared: 0, .. })
    ));
}

#[test]
fn long_password_with_digest_wider_than_block() {
    let narrow = narrow_block_sha512("toynarrowkdf", 32);
    let secret = [0x61u8; 40];
    let key = pbkdf2_hmac(&narrow, secret, "salt", 3, Some(70)).unwrap();
    assert_eq!(key, reference_pbkdf2(&narrow, 32, &secret, b"salt", 3, 70));
}

#[test]
fn backend_listing() {
    let names = pbkdf2_backends();
    assert_eq!(names.last(), Some(&"builtin-lanes"));
    assert!(names.iter().all(|n| ["fast-pbkdf2", "ring", "builtin-lanes"].contains(n)));
    assert!(pbkdf2_speed_factor() >= 1.0);
    assert!(Backend::Builtin.is_enabled());
}

#[test]
fn pbkdf1_matches_iterated_digest() {
    let mut block = [b"password".as_slice(), b"saltsalt".as_slice()].concat();
    for _ in 0..TEST_ITERATIONS {
        block = Sha1::digest(&block).to_vec();
    }
    let key = pbkdf1("sha1", "password", "saltsalt", TEST_ITERATIONS, None).unwrap();
    assert_eq!(key, block);

    let short = pbkdf1("SHA-1", "password", "saltsalt", TEST_ITERATIONS, Some(8)).unwrap();
    assert_eq!(short, block[..8]);
}

#[test]
fn pbkdf1_rejects_bad_parameters() {
    assert!(matches!(
        pbkdf1("md5", "p", "s", 1, Some(17)),
        Err(KdfError::InvalidParameter(_))
    ));
    assert!(matches!(
        pbkdf1("md5", "p", "s", 0, None),
        Err(KdfError::InvalidParameter(_))
    ));
    assert!(matches!(
        pbkdf1("nosuchhash", "p", "s", 1, None),
        Err(KdfError::UnknownHash(_))
    ));
}
