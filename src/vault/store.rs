//! The vault document store.
//!
//! `VaultStore` owns the path of the JSON document and serializes every
//! access to it behind the lock of its vault directory, shared by every
//! store on that directory.  `put` is a full read-modify-write: load
//! the whole document, upsert one site, rewrite the whole document via
//! temp-file + rename.

use std::path::{Path, PathBuf};
use std::sync::MutexGuard;

use super::format::{self, VaultDocument};
use super::lock::{self, DirLock};
use super::record::CredentialRecord;
use crate::errors::{PassVaultError, Result};

/// Whether the vault document has been written yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Initialized,
    NotInitialized,
}

pub struct VaultStore {
    /// Path to the JSON vault document.
    path: PathBuf,

    /// Guards the load/mutate/rewrite sequence across all handles on
    /// the same vault directory.
    lock: DirLock,
}

impl VaultStore {
    /// Store for the document at `path`, locked through `lock`.
    pub fn new(path: &Path, lock: DirLock) -> Self {
        Self {
            path: path.to_path_buf(),
            lock,
        }
    }

    /// Returns the path to the vault document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Report whether the document exists, without reading it.
    pub fn state(&self) -> Result<DocumentState> {
        let _guard = self.guard();
        if self.path.try_exists()? {
            Ok(DocumentState::Initialized)
        } else {
            Ok(DocumentState::NotInitialized)
        }
    }

    /// Fetch the encrypted record for `site`.
    ///
    /// A missing document is `VaultNotInitialized`; a document without
    /// the site is `SiteNotFound`.
    pub fn get(&self, site: &str) -> Result<CredentialRecord> {
        let _guard = self.guard();
        let mut document = format::read_document(&self.path)?
            .ok_or_else(|| PassVaultError::VaultNotInitialized(self.path.clone()))?;

        document
            .remove(site)
            .ok_or_else(|| PassVaultError::SiteNotFound(site.to_string()))
    }

    /// Insert or replace the record for `site` and rewrite the document.
    ///
    /// A missing document is treated as empty and created.
    pub fn put(&self, site: &str, record: CredentialRecord) -> Result<()> {
        validate_site(site)?;

        let _guard = self.guard();
        let mut document = format::read_document(&self.path)?.unwrap_or_default();
        let replaced = document.insert(site.to_string(), record).is_some();
        format::write_document(&self.path, &document)?;

        tracing::debug!(
            site,
            replaced,
            entries = document.len(),
            "vault document rewritten"
        );
        Ok(())
    }

    /// All stored site identifiers, sorted.
    pub fn sites(&self) -> Result<Vec<String>> {
        let _guard = self.guard();
        let document: VaultDocument = format::read_document(&self.path)?
            .ok_or_else(|| PassVaultError::VaultNotInitialized(self.path.clone()))?;
        Ok(document.into_keys().collect())
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        lock::acquire(&self.lock)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A site identifier must be longer than one character.
pub fn validate_site(site: &str) -> Result<()> {
    if site.chars().count() <= 1 {
        return Err(PassVaultError::InvalidInput(
            "site name must be longer than one character".into(),
        ));
    }
    Ok(())
}

/// A stored password must be longer than one character.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() <= 1 {
        return Err(PassVaultError::InvalidInput(
            "password must be longer than one character — try `passvault generate`".into(),
        ));
    }
    Ok(())
}
