//! High-level vault operations used by CLI commands.
//!
//! `Vault` ties the key material, the cipher, and the document store
//! together so callers can write `vault.save_entry(...)` and
//! `vault.search_site(...)`.
//!
//! Reads always ask for the master password and re-verify it; writes
//! never do.

use zeroize::Zeroizing;

use super::format::{self, VaultPaths};
use super::keys::KeyMaterial;
use super::lock;
use super::record::{Credential, CredentialRecord};
use super::store::{validate_password, validate_site, DocumentState, VaultStore};
use crate::errors::{PassVaultError, Result};

/// An opened vault: persisted key material plus the document store.
pub struct Vault {
    paths: VaultPaths,
    keys: KeyMaterial,
    store: VaultStore,
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open a provisioned vault by loading its key material from disk.
    pub fn open(paths: VaultPaths) -> Result<Self> {
        let keys = KeyMaterial::load(&paths)?;
        Ok(Self::from_parts(paths, keys))
    }

    /// Build a `Vault` from key material already in memory (e.g. fresh
    /// from bootstrap).
    pub fn from_parts(paths: VaultPaths, keys: KeyMaterial) -> Self {
        let store = VaultStore::new(&paths.document, lock::for_dir(&paths.dir));
        Self { paths, keys, store }
    }

    // ------------------------------------------------------------------
    // Boundary operations
    // ------------------------------------------------------------------

    /// Look up and decrypt the login for `site`.
    ///
    /// Order of checks: site validity, document existence (the supplier
    /// is not called when nothing is stored yet), master password, site
    /// presence, then decryption of the email/password pair.
    pub fn search_site<F>(&self, site: &str, master_password: F) -> Result<Credential>
    where
        F: FnOnce() -> Result<Zeroizing<String>>,
    {
        validate_site(site)?;

        if self.store.state()? == DocumentState::NotInitialized {
            return Err(PassVaultError::VaultNotInitialized(
                self.store.path().to_path_buf(),
            ));
        }

        let candidate = master_password()?;
        if candidate.is_empty() {
            return Err(PassVaultError::InvalidInput(
                "master password cannot be empty".into(),
            ));
        }
        if !self.keys.authenticator().authenticate(&candidate) {
            return Err(PassVaultError::AuthenticationFailed);
        }

        let record = self.store.get(site)?;
        let cipher = self.keys.cipher()?;
        record.open(&cipher)
    }

    /// Encrypt and store a login, replacing any existing one for `site`.
    pub fn save_entry(&self, site: &str, email: &str, password: &str) -> Result<()> {
        validate_site(site)?;
        validate_password(password)?;

        let cipher = self.keys.cipher()?;
        let record = CredentialRecord::seal(&cipher, email, password)?;
        self.store.put(site, record)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Stored site identifiers, sorted. No decryption is performed.
    pub fn sites(&self) -> Result<Vec<String>> {
        self.store.sites()
    }

    /// The default username recorded at bootstrap, if any.
    pub fn default_username(&self) -> Result<Option<String>> {
        Ok(format::read_text_line(&self.paths.username)?.filter(|u| !u.is_empty()))
    }

    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }
}
