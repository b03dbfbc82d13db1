//! Builders over the KDF entry points.

pub mod pbkdf2_builder;

pub use pbkdf2_builder::Pbkdf2Builder;
