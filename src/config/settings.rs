use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{PassVaultError, Result};
use crate::vault::VaultPaths;

/// Project-level configuration, loaded from `.passvault.toml`.
///
/// Every field has a sensible default so PassVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the working directory) holding the vault files.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    #[serde(default = "default_salt_file")]
    pub salt_file: String,

    #[serde(default = "default_verifier_file")]
    pub verifier_file: String,

    #[serde(default = "default_key_file")]
    pub key_file: String,

    /// File name of the JSON vault document.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// File name holding the default username offered by `add`.
    #[serde(default = "default_username_file")]
    pub username_file: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".passvault".to_string()
}

fn default_salt_file() -> String {
    VaultPaths::DEFAULT_SALT_FILE.to_string()
}

fn default_verifier_file() -> String {
    VaultPaths::DEFAULT_VERIFIER_FILE.to_string()
}

fn default_key_file() -> String {
    VaultPaths::DEFAULT_KEY_FILE.to_string()
}

fn default_vault_file() -> String {
    VaultPaths::DEFAULT_DOCUMENT_FILE.to_string()
}

fn default_username_file() -> String {
    VaultPaths::DEFAULT_USERNAME_FILE.to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            salt_file: default_salt_file(),
            verifier_file: default_verifier_file(),
            key_file: default_key_file(),
            vault_file: default_vault_file(),
            username_file: default_username_file(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    const FILE_NAME: &'static str = ".passvault.toml";

    /// Load settings from `<project_dir>/.passvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PassVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Build the full set of vault file paths.
    ///
    /// `dir_override` (from `--vault-dir`) replaces `vault_dir` when given.
    pub fn vault_paths(&self, project_dir: &Path, dir_override: Option<&str>) -> VaultPaths {
        let dir: PathBuf = project_dir.join(dir_override.unwrap_or(self.vault_dir.as_str()));
        VaultPaths {
            salt: dir.join(&self.salt_file),
            verifier: dir.join(&self.verifier_file),
            key: dir.join(&self.key_file),
            document: dir.join(&self.vault_file),
            username: dir.join(&self.username_file),
            dir,
        }
    }

    /// File names must be plain, non-empty, and distinct.
    fn validate(&self) -> Result<()> {
        let names = [
            ("salt_file", &self.salt_file),
            ("verifier_file", &self.verifier_file),
            ("key_file", &self.key_file),
            ("vault_file", &self.vault_file),
            ("username_file", &self.username_file),
        ];

        for (i, (field, name)) in names.iter().enumerate() {
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(PassVaultError::ConfigError(format!(
                    "{field} must be a plain file name (got '{name}')"
                )));
            }
            if names[..i].iter().any(|(_, other)| other == name) {
                return Err(PassVaultError::ConfigError(format!(
                    "{field} '{name}' is used for more than one vault file"
                )));
            }
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.vault_dir, ".passvault");
        assert_eq!(s.vault_file, "vault.json");
        assert_eq!(s.salt_file, "master.salt");
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, ".passvault");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
vault_dir = "secrets"
vault_file = "data.json"
username_file = "login.txt"
"#;
        fs::write(tmp.path().join(".passvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, "secrets");
        assert_eq!(settings.vault_file, "data.json");
        assert_eq!(settings.username_file, "login.txt");
        // Rest should be defaults
        assert_eq!(settings.key_file, "vault.key");
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".passvault.toml"), "not valid {{toml").unwrap();

        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn load_rejects_duplicate_file_names() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".passvault.toml"),
            "salt_file = \"vault.key\"\n",
        )
        .unwrap();

        assert!(matches!(
            Settings::load(tmp.path()),
            Err(PassVaultError::ConfigError(_))
        ));
    }

    #[test]
    fn load_rejects_nested_file_names() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".passvault.toml"),
            "vault_file = \"../vault.json\"\n",
        )
        .unwrap();

        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn vault_paths_builds_correct_paths() {
        let s = Settings::default();
        let project = Path::new("/home/user");
        let paths = s.vault_paths(project, None);
        assert_eq!(paths.dir, PathBuf::from("/home/user/.passvault"));
        assert_eq!(
            paths.document,
            PathBuf::from("/home/user/.passvault/vault.json")
        );
        assert_eq!(paths, VaultPaths::in_dir(&paths.dir));
    }

    #[test]
    fn vault_paths_respects_override() {
        let s = Settings::default();
        let paths = s.vault_paths(Path::new("/home/user"), Some("other"));
        assert_eq!(paths.verifier, PathBuf::from("/home/user/other/master.verifier"));
    }
}
