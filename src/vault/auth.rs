//! Master-password verification.
//!
//! There is no unlocked session: every read constructs a fresh check
//! from the persisted salt and verifier, and nothing is remembered
//! between calls. Attempts are not counted or throttled.

use crate::crypto::kdf::{derive_verifier, verifiers_match};

/// Checks candidate master passwords against a stored verifier.
pub struct MasterAuthenticator<'a> {
    salt: &'a [u8],
    verifier: &'a str,
}

impl<'a> MasterAuthenticator<'a> {
    pub fn new(salt: &'a [u8], verifier: &'a str) -> Self {
        Self { salt, verifier }
    }

    /// Returns `true` only if `candidate` derives the stored verifier exactly.
    pub fn authenticate(&self, candidate: &str) -> bool {
        let derived = derive_verifier(candidate.as_bytes(), self.salt);
        let ok = verifiers_match(&derived, self.verifier);
        tracing::debug!(success = ok, "master password verification");
        ok
    }
}
