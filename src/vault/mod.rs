//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - `CredentialRecord` and `Credential` types (`record`)
//! - Vault directory layout and JSON document I/O (`format`)
//! - The document store (`store`), guarded by per-directory locks (`lock`)
//! - Persisted key material and master-password checks (`keys`, `auth`)
//! - High-level `Vault` handle for searching and saving logins (`handle`)

pub mod auth;
pub mod format;
pub mod handle;
pub mod keys;
pub mod lock;
pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use auth::MasterAuthenticator;
pub use format::{VaultDocument, VaultPaths};
pub use handle::Vault;
pub use keys::{KeyMaterial, ProvisionState};
pub use record::{Credential, CredentialRecord};
pub use store::{DocumentState, VaultStore};
