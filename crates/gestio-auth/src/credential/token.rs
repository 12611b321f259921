//! Opaque token generation for reset and verification links.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;

/// Number of random bytes behind each opaque token.
const TOKEN_BYTES: usize = 32;

/// Generates a cryptographically random, URL-safe opaque token.
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
