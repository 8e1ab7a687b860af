//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The derived bytes are only ever used as a *verifier*: they are stored
//! as standard base64 text and every comparison happens on that text.
//! Field encryption uses an independent random key (see `encryption`).

use std::num::NonZeroU32;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use ring::pbkdf2;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Length of the master salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the derived key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Fixed PBKDF2 iteration count. Changing it invalidates every stored verifier.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

const ITERATIONS: NonZeroU32 = match NonZeroU32::new(PBKDF2_ITERATIONS) {
    Some(n) => n,
    None => panic!("PBKDF2_ITERATIONS must be non-zero"),
};

/// Derive 32 bytes from a master password and salt.
///
/// The same password + salt always produce the same output. Callers
/// must reject an empty password before calling; no validation happens
/// here.
pub fn derive(password: &[u8], salt: &[u8]) -> [u8; KEY_LEN] {
    let mut out = [0u8; KEY_LEN];
    pbkdf2::derive(PBKDF2_ALG, ITERATIONS, salt, password, &mut out);
    out
}

/// Derive and encode a verifier in its canonical persisted form.
pub fn derive_verifier(password: &[u8], salt: &[u8]) -> String {
    let mut raw = derive(password, salt);
    let encoded = BASE64.encode(raw);
    raw.zeroize();
    encoded
}

/// Compare two encoded verifiers in constant time.
pub fn verifiers_match(candidate: &str, stored: &str) -> bool {
    candidate.as_bytes().ct_eq(stored.as_bytes()).into()
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
