//! On-disk layout of a vault directory and the JSON vault document.
//!
//! A vault directory holds five files (names configurable):
//!
//! ```text
//! master.salt      32 raw bytes
//! master.verifier  base64 text of the PBKDF2 verifier
//! vault.key        32 raw bytes (AES-256 key)
//! vault.json       { "<site>": { "email": "<ct>", "password": "<ct>" }, ... }
//! username.txt     default username, one line
//! ```
//!
//! Every write goes through `write_atomic`: full write to a temp file in
//! the same directory, then rename over the target.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use rand::RngCore;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::record::CredentialRecord;
use crate::errors::{PassVaultError, Result};

/// In-memory form of the vault document.
pub type VaultDocument = BTreeMap<String, CredentialRecord>;

// ---------------------------------------------------------------------------
// VaultPaths
// ---------------------------------------------------------------------------

/// The set of files that make up one vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    pub dir: PathBuf,
    pub salt: PathBuf,
    pub verifier: PathBuf,
    pub key: PathBuf,
    pub document: PathBuf,
    pub username: PathBuf,
}

impl VaultPaths {
    pub const DEFAULT_SALT_FILE: &'static str = "master.salt";
    pub const DEFAULT_VERIFIER_FILE: &'static str = "master.verifier";
    pub const DEFAULT_KEY_FILE: &'static str = "vault.key";
    pub const DEFAULT_DOCUMENT_FILE: &'static str = "vault.json";
    pub const DEFAULT_USERNAME_FILE: &'static str = "username.txt";

    /// Default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            salt: dir.join(Self::DEFAULT_SALT_FILE),
            verifier: dir.join(Self::DEFAULT_VERIFIER_FILE),
            key: dir.join(Self::DEFAULT_KEY_FILE),
            document: dir.join(Self::DEFAULT_DOCUMENT_FILE),
            username: dir.join(Self::DEFAULT_USERNAME_FILE),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw file helpers
// ---------------------------------------------------------------------------

/// Write `data` to `path` atomically with owner-only permissions.
///
/// The temp file lives next to the target so the rename stays on one
/// filesystem, and gets a fresh random name so concurrent writers never
/// share it. A crash before the rename leaves the old file intact; any
/// failure removes the temp file.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent)?;
        restrict_permissions(parent, 0o700)?;
    }

    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let (tmp_path, file) = create_temp_file(parent, &file_name)?;

    let written = write_and_sync(file, data).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(())
}

fn write_and_sync(mut file: fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data)?;
    file.sync_all()
}

/// Create `.<name>.<random>.tmp` in `dir`, owner-only from the start.
fn create_temp_file(dir: &Path, name: &str) -> Result<(PathBuf, fs::File)> {
    const ATTEMPTS: usize = 8;

    let mut last_err = None;
    for _ in 0..ATTEMPTS {
        let tmp_path = dir.join(format!(".{name}.{:016x}.tmp", rand::rng().next_u64()));
        match open_new_private(&tmp_path) {
            Ok(file) => return Ok((tmp_path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => last_err = Some(e),
            Err(e) => return Err(e.into()),
        }
    }
    Err(last_err
        .unwrap_or_else(|| std::io::Error::from(ErrorKind::AlreadyExists))
        .into())
}

// Create the file with restrictive permissions atomically (no TOCTOU race).
#[cfg(unix)]
fn open_new_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_new_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Read a single-line text file, trimming the trailing newline.
///
/// Returns `None` when the file does not exist.
pub fn read_text_line(path: &Path) -> Result<Option<String>> {
    if !path.try_exists()? {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    Ok(Some(contents.trim_end_matches(['\r', '\n']).to_string()))
}

// ---------------------------------------------------------------------------
// Vault document
// ---------------------------------------------------------------------------

/// Load the vault document, or `None` if it has never been written.
pub fn read_document(path: &Path) -> Result<Option<VaultDocument>> {
    if !path.try_exists()? {
        return Ok(None);
    }

    let data = fs::read(path)?;
    let document: VaultDocument = serde_json::from_slice(&data)
        .map_err(|e| PassVaultError::InvalidVaultFormat(format!("{}: {e}", path.display())))?;

    Ok(Some(document))
}

/// Serialize the whole document (4-space indented JSON) and write it atomically.
pub fn write_document(path: &Path, document: &VaultDocument) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|e| PassVaultError::SerializationError(format!("vault document: {e}")))?;

    write_atomic(path, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(tag: &str) -> CredentialRecord {
        CredentialRecord {
            email: format!("email-{tag}"),
            password: format!("password-{tag}"),
        }
    }

    #[test]
    fn in_dir_uses_default_names() {
        let paths = VaultPaths::in_dir(Path::new("/tmp/pv"));
        assert_eq!(paths.salt, PathBuf::from("/tmp/pv/master.salt"));
        assert_eq!(paths.verifier, PathBuf::from("/tmp/pv/master.verifier"));
        assert_eq!(paths.key, PathBuf::from("/tmp/pv/vault.key"));
        assert_eq!(paths.document, PathBuf::from("/tmp/pv/vault.json"));
        assert_eq!(paths.username, PathBuf::from("/tmp/pv/username.txt"));
    }

    #[test]
    fn read_document_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let result = read_document(&dir.path().join("vault.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn document_uses_site_keyed_object_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.json");

        let mut doc = VaultDocument::new();
        doc.insert("example.com".into(), record("a"));
        write_document(&path, &doc).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["example.com"]["email"], "email-a");
        assert_eq!(value["example.com"]["password"], "password-a");
        assert!(text.contains("\n    \"example.com\""));

        let loaded = read_document(&path).unwrap().unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn read_document_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            read_document(&path),
            Err(PassVaultError::InvalidVaultFormat(_))
        ));
    }

    fn temp_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn write_atomic_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.key");
        write_atomic(&path, b"abc").unwrap();
        write_atomic(&path, b"def").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"def");
        assert!(temp_files(dir.path()).is_empty());
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let path = dir.path().join("vault.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), b"x").unwrap();

        assert!(matches!(
            write_atomic(&path, b"{}"),
            Err(PassVaultError::Io(_))
        ));
        assert!(temp_files(dir.path()).is_empty());
    }

    #[test]
    fn concurrent_writes_to_one_target_all_succeed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.json");

        std::thread::scope(|scope| {
            for t in 0..8u8 {
                let path = &path;
                scope.spawn(move || {
                    for _ in 0..20 {
                        write_atomic(path, &[t; 64]).unwrap();
                    }
                });
            }
        });

        let data = fs::read(&path).unwrap();
        assert_eq!(data.len(), 64);
        assert!(data.iter().all(|b| *b == data[0]));
        assert!(temp_files(dir.path()).is_empty());
    }

    #[test]
    fn write_atomic_creates_missing_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("master.salt");
        write_atomic(&path, &[1, 2, 3]).unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn write_atomic_sets_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.key");
        write_atomic(&path, b"secret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn temp_file_is_owner_only_before_any_write() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let (tmp_path, file) = create_temp_file(dir.path(), "vault.key").unwrap();
        drop(file);

        let mode = fs::metadata(&tmp_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(tmp_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(".vault.key."));
    }

    #[test]
    fn read_text_line_trims_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("username.txt");
        fs::write(&path, "me@example.com\n").unwrap();

        assert_eq!(
            read_text_line(&path).unwrap().as_deref(),
            Some("me@example.com")
        );
        assert!(read_text_line(&dir.path().join("missing")).unwrap().is_none());
    }
}
