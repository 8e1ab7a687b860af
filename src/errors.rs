use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum PassVaultError {
    // --- Input errors ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — stored data is corrupted or was encrypted with another key")]
    DecryptionFailed,

    #[error("Authentication failed — master password is incorrect")]
    AuthenticationFailed,

    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    // --- Vault errors ---
    #[error("No vault data exists yet at {0} — save some logins first")]
    VaultNotInitialized(PathBuf),

    #[error("Vault is not set up at {0} — run `passvault init` first")]
    NotProvisioned(PathBuf),

    #[error("Refusing to provision: {0}")]
    PartialProvisioning(String),

    #[error("No details for site '{0}' exist yet")]
    SiteNotFound(String),

    #[error("Invalid vault document: {0}")]
    InvalidVaultFormat(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Clipboard error: {0}")]
    ClipboardError(String),
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, PassVaultError>;
