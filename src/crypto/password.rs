//! Random password generation.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

/// Bytes of entropy in a generated password.
const PASSWORD_ENTROPY_BYTES: usize = 20;

/// Generate a random URL-safe password token.
///
/// 20 random bytes encoded as unpadded URL-safe base64 (27 characters).
pub fn generate_random_password() -> String {
    let mut bytes = [0u8; PASSWORD_ENTROPY_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
