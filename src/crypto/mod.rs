// src/crypto/mod.rs

//! Keyed-MAC and KDF primitives.
//!
//! See crate root for re-exports (e.g. `compile_hmac`, `pbkdf2_hmac`).

pub mod hmac;
pub mod kdf;
