//! Integration tests for bootstrap, search, and save.

use std::cell::Cell;
use std::fs;

use passvault::bootstrap::{bootstrap_if_needed, BootstrapOutcome};
use passvault::errors::{PassVaultError, Result};
use passvault::vault::{Vault, VaultDocument, VaultPaths};
use tempfile::TempDir;
use zeroize::Zeroizing;

const MASTER: &str = "correct horse battery";

fn pw(s: &str) -> impl FnOnce() -> Result<Zeroizing<String>> + '_ {
    move || Ok(Zeroizing::new(s.to_string()))
}

/// Helper: provision a vault inside a fresh temp dir.
fn provisioned() -> (TempDir, Vault) {
    let dir = TempDir::new().expect("create temp dir");
    let paths = VaultPaths::in_dir(&dir.path().join(".passvault"));
    let keys = bootstrap_if_needed(&paths, pw(MASTER), || Ok(Some("me@example.com".into())))
        .expect("bootstrap")
        .into_keys();
    (dir, Vault::from_parts(paths, keys))
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn save_then_search_end_to_end() {
    let (_dir, vault) = provisioned();

    vault
        .save_entry("example.com", "a@b.com", "Sw9!kq2Lp")
        .unwrap();

    let found = vault.search_site("example.com", pw(MASTER)).unwrap();
    assert_eq!(found.email, "a@b.com");
    assert_eq!(found.password, "Sw9!kq2Lp");
}

#[test]
fn roundtrip_survives_reopen_from_disk() {
    let (_dir, vault) = provisioned();
    vault.save_entry("github.com", "octo", "p@ss-w0rd").unwrap();

    let reopened = Vault::open(vault.paths().clone()).unwrap();
    let found = reopened.search_site("github.com", pw(MASTER)).unwrap();
    assert_eq!(found.email, "octo");
    assert_eq!(found.password, "p@ss-w0rd");
}

#[test]
fn email_may_be_empty_and_non_ascii_survives() {
    let (_dir, vault) = provisioned();
    vault.save_entry("bank.de", "", "Grüße-🔐").unwrap();

    let found = vault.search_site("bank.de", pw(MASTER)).unwrap();
    assert_eq!(found.email, "");
    assert_eq!(found.password, "Grüße-🔐");
}

#[test]
fn overwrite_keeps_only_latest() {
    let (_dir, vault) = provisioned();
    vault.save_entry("site", "a@b", "p1").unwrap();
    vault.save_entry("site", "a@b", "p2").unwrap();

    let found = vault.search_site("site", pw(MASTER)).unwrap();
    assert_eq!(found.email, "a@b");
    assert_eq!(found.password, "p2");
    assert_eq!(vault.sites().unwrap(), vec!["site"]);
}

#[test]
fn saving_keeps_other_sites() {
    let (_dir, vault) = provisioned();
    vault.save_entry("one.com", "1@x", "pw-one").unwrap();
    vault.save_entry("two.com", "2@x", "pw-two").unwrap();

    assert_eq!(
        vault.search_site("one.com", pw(MASTER)).unwrap().password,
        "pw-one"
    );
    assert_eq!(vault.sites().unwrap(), vec!["one.com", "two.com"]);
}

// ---------------------------------------------------------------------------
// Error outcomes
// ---------------------------------------------------------------------------

#[test]
fn search_without_document_is_not_initialized_and_does_not_prompt() {
    let (_dir, vault) = provisioned();
    let asked = Cell::new(false);

    let result = vault.search_site("example.com", || {
        asked.set(true);
        Ok(Zeroizing::new(MASTER.to_string()))
    });

    assert!(matches!(result, Err(PassVaultError::VaultNotInitialized(_))));
    assert!(!asked.get());
}

#[test]
fn unknown_site_is_site_not_found_without_decrypting() {
    let (_dir, vault) = provisioned();
    vault.save_entry("example.com", "a@b.com", "pw-123").unwrap();

    // Corrupt every stored ciphertext: a lookup that decrypted would fail
    // with DecryptionFailed instead of SiteNotFound.
    let path = &vault.paths().document;
    let mut doc: VaultDocument = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
    for record in doc.values_mut() {
        record.email = "garbage".into();
        record.password = "garbage".into();
    }
    fs::write(path, serde_json::to_vec(&doc).unwrap()).unwrap();

    let result = vault.search_site("unknown.example", pw(MASTER));
    assert!(matches!(result, Err(PassVaultError::SiteNotFound(_))));
}

#[test]
fn wrong_master_password_fails_for_every_site() {
    let (_dir, vault) = provisioned();
    vault.save_entry("example.com", "a@b.com", "pw-123").unwrap();

    for site in ["example.com", "unknown.example"] {
        let result = vault.search_site(site, pw("not the password"));
        assert!(
            matches!(result, Err(PassVaultError::AuthenticationFailed)),
            "site {site}"
        );
    }
}

#[test]
fn empty_master_password_is_invalid_input() {
    let (_dir, vault) = provisioned();
    vault.save_entry("example.com", "a@b.com", "pw-123").unwrap();

    let result = vault.search_site("example.com", pw(""));
    assert!(matches!(result, Err(PassVaultError::InvalidInput(_))));
}

#[test]
fn tampered_record_fails_decryption() {
    let (_dir, vault) = provisioned();
    vault.save_entry("example.com", "a@b.com", "pw-123").unwrap();

    let path = &vault.paths().document;
    let mut doc: VaultDocument = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
    let record = doc.get_mut("example.com").unwrap();
    let mut chars: Vec<char> = record.password.chars().collect();
    chars[20] = if chars[20] == 'A' { 'B' } else { 'A' };
    record.password = chars.into_iter().collect();
    fs::write(path, serde_json::to_vec(&doc).unwrap()).unwrap();

    let result = vault.search_site("example.com", pw(MASTER));
    assert!(matches!(result, Err(PassVaultError::DecryptionFailed)));
}

#[test]
fn validation_runs_before_storage_access() {
    let (_dir, vault) = provisioned();

    assert!(matches!(
        vault.save_entry("x", "a@b.com", "pw-123"),
        Err(PassVaultError::InvalidInput(_))
    ));
    assert!(matches!(
        vault.save_entry("example.com", "a@b.com", "p"),
        Err(PassVaultError::InvalidInput(_))
    ));
    assert!(!vault.paths().document.exists());

    let asked = Cell::new(false);
    let result = vault.search_site("", || {
        asked.set(true);
        Ok(Zeroizing::new(MASTER.to_string()))
    });
    assert!(matches!(result, Err(PassVaultError::InvalidInput(_))));
    assert!(!asked.get());
}

// ---------------------------------------------------------------------------
// Persistence format and key material
// ---------------------------------------------------------------------------

#[test]
fn document_stores_only_ciphertext() {
    let (_dir, vault) = provisioned();
    vault
        .save_entry("example.com", "a@b.com", "Sw9!kq2Lp")
        .unwrap();

    let text = fs::read_to_string(&vault.paths().document).unwrap();
    assert!(!text.contains("a@b.com"));
    assert!(!text.contains("Sw9!kq2Lp"));

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let entry = &value["example.com"];
    assert!(entry["email"].is_string());
    assert!(entry["password"].is_string());
}

#[test]
fn lost_vault_key_makes_data_unrecoverable() {
    let (_dir, vault) = provisioned();
    vault.save_entry("example.com", "a@b.com", "pw-123").unwrap();

    fs::write(&vault.paths().key, [0u8; 32]).unwrap();
    let reopened = Vault::open(vault.paths().clone()).unwrap();

    let result = reopened.search_site("example.com", pw(MASTER));
    assert!(matches!(result, Err(PassVaultError::DecryptionFailed)));
}

#[test]
fn bootstrap_is_write_once() {
    let (_dir, vault) = provisioned();
    vault.save_entry("example.com", "a@b.com", "pw-123").unwrap();
    let salt_before = fs::read(&vault.paths().salt).unwrap();
    let key_before = fs::read(&vault.paths().key).unwrap();

    let outcome = bootstrap_if_needed(vault.paths(), pw("different"), || Ok(None)).unwrap();
    assert!(matches!(outcome, BootstrapOutcome::AlreadyProvisioned(_)));

    assert_eq!(fs::read(&vault.paths().salt).unwrap(), salt_before);
    assert_eq!(fs::read(&vault.paths().key).unwrap(), key_before);
    assert!(vault.search_site("example.com", pw(MASTER)).is_ok());
}

#[test]
fn default_username_is_available_after_bootstrap() {
    let (_dir, vault) = provisioned();
    assert_eq!(
        vault.default_username().unwrap().as_deref(),
        Some("me@example.com")
    );
}

#[test]
fn open_unprovisioned_vault_fails() {
    let dir = TempDir::new().unwrap();
    let result = Vault::open(VaultPaths::in_dir(dir.path()));
    assert!(matches!(result, Err(PassVaultError::NotProvisioned(_))));
}

#[test]
fn vault_handle_can_be_shared_across_threads() {
    let (_dir, vault) = provisioned();
    let vault = std::sync::Arc::new(vault);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let vault = std::sync::Arc::clone(&vault);
            std::thread::spawn(move || {
                vault
                    .save_entry(&format!("site-{i}.com"), "t@x", &format!("pw-{i}"))
                    .unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(vault.sites().unwrap().len(), 4);
}

#[test]
fn separate_handles_on_one_vault_do_not_lose_saves() {
    let (_dir, vault) = provisioned();
    let paths = vault.paths().clone();

    for round in 0..10 {
        std::thread::scope(|scope| {
            for prefix in ["a", "b"] {
                let handle = Vault::open(paths.clone()).unwrap();
                scope.spawn(move || {
                    handle
                        .save_entry(&format!("{prefix}-{round}.com"), "t@x", "pw-shared")
                        .unwrap();
                });
            }
        });

        let sites = vault.sites().unwrap();
        assert!(sites.contains(&format!("a-{round}.com")), "round {round}");
        assert!(sites.contains(&format!("b-{round}.com")), "round {round}");
    }

    assert_eq!(vault.sites().unwrap().len(), 20);
    let found = vault.search_site("b-9.com", pw(MASTER)).unwrap();
    assert_eq!(found.password, "pw-shared");
}
