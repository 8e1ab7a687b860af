//! Persisted key material: master salt, verifier, and vault cipher key.
//!
//! All three are write-once. `KeyMaterial` is the explicit context value
//! that the rest of the crate is handed; nothing is read from globals.

use std::fs;

use zeroize::Zeroizing;

use super::auth::MasterAuthenticator;
use super::format::{self, VaultPaths};
use crate::crypto::kdf::{derive_verifier, generate_salt, SALT_LEN};
use crate::crypto::{CredentialCipher, VaultKey};
use crate::errors::{PassVaultError, Result};

/// Whether an installation has finished bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionState {
    Uninitialized,
    Provisioned,
}

impl ProvisionState {
    /// The verifier is written last, so its presence marks completion.
    pub fn detect(paths: &VaultPaths) -> Result<Self> {
        if paths.verifier.try_exists()? {
            Ok(Self::Provisioned)
        } else {
            Ok(Self::Uninitialized)
        }
    }
}

/// Salt, verifier, and vault key for one installation.
pub struct KeyMaterial {
    salt: [u8; SALT_LEN],
    verifier: String,
    vault_key: VaultKey,
}

impl KeyMaterial {
    /// Create fresh key material for `master_password`.
    pub fn generate(master_password: &str) -> Self {
        let salt = generate_salt();
        let verifier = derive_verifier(master_password.as_bytes(), &salt);
        Self {
            salt,
            verifier,
            vault_key: VaultKey::generate(),
        }
    }

    /// Load previously persisted key material.
    pub fn load(paths: &VaultPaths) -> Result<Self> {
        if ProvisionState::detect(paths)? == ProvisionState::Uninitialized {
            return Err(PassVaultError::NotProvisioned(paths.dir.clone()));
        }

        let salt_bytes = fs::read(&paths.salt)?;
        let salt: [u8; SALT_LEN] = salt_bytes.as_slice().try_into().map_err(|_| {
            PassVaultError::InvalidKeyMaterial(format!(
                "salt must be exactly {SALT_LEN} bytes, got {}",
                salt_bytes.len()
            ))
        })?;

        let verifier = format::read_text_line(&paths.verifier)?
            .filter(|v| !v.is_empty())
            .ok_or_else(|| PassVaultError::InvalidKeyMaterial("verifier is empty".into()))?;

        let key_bytes = Zeroizing::new(fs::read(&paths.key)?);
        let vault_key = VaultKey::from_slice(&key_bytes)?;

        Ok(Self {
            salt,
            verifier,
            vault_key,
        })
    }

    /// Write salt, vault key, then verifier.
    pub fn persist(&self, paths: &VaultPaths) -> Result<()> {
        format::write_atomic(&paths.salt, &self.salt)?;
        format::write_atomic(&paths.key, self.vault_key.as_bytes())?;
        format::write_atomic(&paths.verifier, self.verifier.as_bytes())?;
        Ok(())
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// The verifier in its persisted base64 form.
    pub fn verifier(&self) -> &str {
        &self.verifier
    }

    pub fn vault_key(&self) -> &VaultKey {
        &self.vault_key
    }

    pub fn authenticator(&self) -> MasterAuthenticator<'_> {
        MasterAuthenticator::new(&self.salt, &self.verifier)
    }

    pub fn cipher(&self) -> Result<CredentialCipher> {
        CredentialCipher::new(&self.vault_key)
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial").finish_non_exhaustive()
    }
}
