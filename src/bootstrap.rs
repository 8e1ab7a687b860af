//! First-run provisioning.
//!
//! Creates the master salt, the vault cipher key, and the verifier
//! exactly once per installation. Later calls detect the existing
//! verifier and load the key material instead.

use zeroize::Zeroizing;

use crate::errors::{PassVaultError, Result};
use crate::vault::format::{self, VaultPaths};
use crate::vault::{lock, KeyMaterial, ProvisionState};

/// Result of `bootstrap_if_needed`.
#[derive(Debug)]
pub enum BootstrapOutcome {
    /// Key material was created by this call.
    Provisioned(KeyMaterial),
    /// Key material already existed and was loaded.
    AlreadyProvisioned(KeyMaterial),
}

impl BootstrapOutcome {
    pub fn is_new(&self) -> bool {
        matches!(self, Self::Provisioned(_))
    }

    pub fn into_keys(self) -> KeyMaterial {
        match self {
            Self::Provisioned(keys) | Self::AlreadyProvisioned(keys) => keys,
        }
    }
}

/// Provision the vault in `paths` unless it already is.
///
/// Neither supplier is called when the vault is already provisioned.
/// An empty master password is rejected before anything is written.
/// A blank default username is not stored.
///
/// Refuses to regenerate keys when a vault document exists but the
/// verifier is missing: new keys would orphan every stored record.
pub fn bootstrap_if_needed<P, U>(
    paths: &VaultPaths,
    master_password: P,
    default_username: U,
) -> Result<BootstrapOutcome>
where
    P: FnOnce() -> Result<Zeroizing<String>>,
    U: FnOnce() -> Result<Option<String>>,
{
    if ProvisionState::detect(paths)? == ProvisionState::Provisioned {
        tracing::debug!(dir = %paths.dir.display(), "vault already provisioned");
        return Ok(BootstrapOutcome::AlreadyProvisioned(KeyMaterial::load(
            paths,
        )?));
    }

    if paths.document.try_exists()? {
        return Err(PassVaultError::PartialProvisioning(format!(
            "{} exists but no master verifier was found; new keys would make it unreadable",
            paths.document.display()
        )));
    }

    if paths.salt.try_exists()? || paths.key.try_exists()? {
        tracing::warn!(
            dir = %paths.dir.display(),
            "discarding key files from an interrupted bootstrap"
        );
    }

    let password = master_password()?;
    if password.is_empty() {
        return Err(PassVaultError::InvalidInput(
            "master password cannot be empty".into(),
        ));
    }

    let username = default_username()?
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    // Suppliers may prompt, so the lock is only taken for the writes.
    // Another handle may have provisioned the directory in the meantime.
    let dir_lock = lock::for_dir(&paths.dir);
    let _guard = lock::acquire(&dir_lock);
    if ProvisionState::detect(paths)? == ProvisionState::Provisioned {
        tracing::debug!(dir = %paths.dir.display(), "vault provisioned concurrently");
        return Ok(BootstrapOutcome::AlreadyProvisioned(KeyMaterial::load(
            paths,
        )?));
    }
    if paths.document.try_exists()? {
        return Err(PassVaultError::PartialProvisioning(format!(
            "{} appeared before the master verifier",
            paths.document.display()
        )));
    }

    let keys = KeyMaterial::generate(&password);
    keys.persist(paths)?;

    if let Some(username) = username {
        format::write_atomic(&paths.username, username.as_bytes())?;
    }

    tracing::info!(dir = %paths.dir.display(), "vault provisioned");
    Ok(BootstrapOutcome::Provisioned(keys))
}
