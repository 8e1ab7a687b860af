//! Process-wide locks keyed by vault directory.
//!
//! Every `Vault` handle opened on the same directory shares one mutex, so
//! the document read-modify-write and bootstrap never interleave within
//! a process, however many handles exist.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Shared lock for one vault directory.
pub type DirLock = Arc<Mutex<()>>;

static LOCKS: OnceLock<Mutex<HashMap<PathBuf, DirLock>>> = OnceLock::new();

/// Return the lock shared by every handle on `dir`.
pub fn for_dir(dir: &Path) -> DirLock {
    let key = lock_key(dir);
    let mut locks = LOCKS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(locks.entry(key).or_default())
}

/// Acquire `lock`, recovering from poisoning.
///
/// The guarded data is `()`, so a poisoned lock carries no broken state.
pub fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Canonical form of `dir`, so `./v`, `v/` and an absolute path all map
/// to one lock. The directory may not exist yet before bootstrap: then
/// the nearest existing ancestor is canonicalized and the rest appended.
fn lock_key(dir: &Path) -> PathBuf {
    if let Ok(canonical) = dir.canonicalize() {
        return canonical;
    }

    let absolute = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
    let mut existing = absolute.as_path();
    let mut rest = Vec::new();
    while let Some(parent) = existing.parent() {
        if let Some(name) = existing.file_name() {
            rest.push(name.to_os_string());
        }
        existing = parent;
        if let Ok(canonical) = existing.canonicalize() {
            return rest.iter().rev().fold(canonical, |acc, part| acc.join(part));
        }
    }
    absolute
}
