//! # Key Derivation Functions (KDF)
//!
//! Password-based key derivation built on the digest resolver.
//!
//! ## Modules
//!
//! - [`pbkdf1`] - PKCS#5 v1.5, direct iterated digest (legacy)
//! - [`pbkdf2`] - PKCS#5 v2.0 with HMAC, validated then dispatched to a backend
//! - [`backend`] - accelerated backend probing and the environment override
//! - [`accumulator`] - the builtin backend's lane-wise XOR loop

pub mod accumulator;
pub mod backend;
pub mod pbkdf1;
pub mod pbkdf2;
