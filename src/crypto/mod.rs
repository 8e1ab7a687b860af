//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - AES-256-GCM field encryption with an independent vault key (`encryption`)
//! - PBKDF2-HMAC-SHA256 master-password verifiers (`kdf`)
//! - Random password generation (`password`)

pub mod encryption;
pub mod kdf;
pub mod password;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{CredentialCipher, VaultKey, derive_verifier, ...};
pub use encryption::{CredentialCipher, VaultKey};
pub use kdf::{derive, derive_verifier, generate_salt, verifiers_match};
pub use password::generate_random_password;
