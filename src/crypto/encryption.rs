//! AES-256-GCM authenticated encryption of individual text fields.
//!
//! Each call to `encrypt_field` generates a fresh random 12-byte nonce
//! and prepends it to the ciphertext.  The stored form is the standard
//! base64 encoding of:
//!
//! ```text
//! [ 12-byte nonce | ciphertext + 16-byte auth tag ]
//! ```

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{PassVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Length of the vault cipher key in bytes (AES-256).
pub const VAULT_KEY_LEN: usize = 32;

/// The independently generated key used for all field encryption.
///
/// Unrelated to the master password. Zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct VaultKey {
    bytes: [u8; VAULT_KEY_LEN],
}

impl VaultKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; VAULT_KEY_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Rebuild a key from its persisted bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; VAULT_KEY_LEN] = bytes.try_into().map_err(|_| {
            PassVaultError::InvalidKeyMaterial(format!(
                "vault key must be exactly {VAULT_KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; VAULT_KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VaultKey(..)")
    }
}

/// Encrypts and decrypts credential fields with a single `VaultKey`.
pub struct CredentialCipher {
    cipher: Aes256Gcm,
}

impl CredentialCipher {
    pub fn new(key: &VaultKey) -> Result<Self> {
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| PassVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;
        Ok(Self { cipher })
    }

    /// Encrypt one text field and return its self-describing base64 form.
    pub fn encrypt_field(&self, plaintext: &str) -> Result<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| PassVaultError::EncryptionFailed(format!("encryption error: {e}")))?;

        let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        output.extend_from_slice(&nonce);
        output.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(output))
    }

    /// Decrypt a field produced by `encrypt_field`.
    ///
    /// Any malformed encoding, truncation, tag mismatch, or non-UTF-8
    /// result yields `DecryptionFailed` and nothing else.
    pub fn decrypt_field(&self, encoded: &str) -> Result<String> {
        let blob = BASE64
            .decode(encoded)
            .map_err(|_| PassVaultError::DecryptionFailed)?;

        if blob.len() < NONCE_LEN {
            return Err(PassVaultError::DecryptionFailed);
        }

        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| PassVaultError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            PassVaultError::DecryptionFailed
        })
    }
}
