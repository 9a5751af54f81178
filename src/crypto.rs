//! Self-describing string encryption under a user password.
//!
//! Layout of the base64-decoded payload: `salt(32) || nonce(12) || ciphertext`.
//! Key derivation is PBKDF2-HMAC-SHA256 with 10,000 iterations over the
//! password and salt; the cipher is AES-256-GCM. These parameters are part
//! of the persistent format and must not change silently.
//!
//! Grounded in `examples/original_source/src/common/encryption.go`, ported
//! to RustCrypto's `aes-gcm`/`pbkdf2`/`hmac`/`sha2` crates.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce};
use base64::Engine as _;
use hmac::Hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{CellarError, Result};

const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const PBKDF2_ITERATIONS: u32 = 10_000;
const KEY_LEN: usize = 32;

fn derive_key(password: &str, salt: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut *key)
        .expect("PBKDF2 output length is fixed and always valid");
    key
}

/// Encrypt `plaintext` under `password`, returning a base64-standard string
/// that carries its own salt and nonce.
pub fn encrypt(plaintext: &str, password: &str) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    getrandom_fill(&mut salt);

    let key_bytes = derive_key(password, &salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key_bytes));

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|_| CellarError::Internal("encryption failed".into()))?;

    let mut out = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(nonce.as_slice());
    out.extend_from_slice(&ciphertext);

    Ok(base64::engine::general_purpose::STANDARD.encode(out))
}

/// Decrypt a value produced by [`encrypt`]. Any failure (bad base64, wrong
/// length, tag mismatch) is reported uniformly as [`CellarError::Authentication`]
/// ("wrong password") so a timing or error-shape oracle can't distinguish
/// failure causes.
pub fn decrypt(encoded: &str, password: &str) -> Result<String> {
    let data = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| CellarError::Authentication)?;

    if data.len() < SALT_LEN + NONCE_LEN {
        return Err(CellarError::Authentication);
    }

    let (salt, rest) = data.split_at(SALT_LEN);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

    let key_bytes = derive_key(password, salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key_bytes));
    let nonce = Nonce::from_slice(nonce_bytes);

    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CellarError::Authentication)?;

    String::from_utf8(plaintext).map_err(|_| CellarError::Authentication)
}

fn getrandom_fill(buf: &mut [u8]) {
    use aes_gcm::aead::rand_core::RngCore;
    OsRng.fill_bytes(buf);
}
