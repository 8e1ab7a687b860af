//! Credential types: the encrypted record stored per site and the
//! decrypted pair handed back to callers.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::CredentialCipher;
use crate::errors::Result;

/// One encrypted login, as stored in the vault document.
///
/// Both fields are self-describing ciphertext strings (nonce + tag
/// included) and are always present together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub email: String,
    pub password: String,
}

impl CredentialRecord {
    /// Encrypt an email/password pair into a record.
    pub fn seal(cipher: &CredentialCipher, email: &str, password: &str) -> Result<Self> {
        Ok(Self {
            email: cipher.encrypt_field(email)?,
            password: cipher.encrypt_field(password)?,
        })
    }

    /// Decrypt both fields. Either both succeed or the whole call fails.
    pub fn open(&self, cipher: &CredentialCipher) -> Result<Credential> {
        let email = cipher.decrypt_field(&self.email)?;
        let password = cipher.decrypt_field(&self.password)?;
        Ok(Credential { email, password })
    }
}

/// A decrypted login. Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
