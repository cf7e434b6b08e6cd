//! AES-256-GCM encryption/decryption
//!
//! Every file is sealed into a single textual token so it can sit in the
//! archive as a JSON string. Each encryption operation generates a unique
//! nonce, so encrypting the same bytes twice never yields the same token.
//!
//! Token layout (before base64): `version (1) || nonce (12) || ciphertext+tag`

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{PeridotError, PeridotResult};

use super::ArchiveKey;

/// Size of the AES-GCM nonce in bytes (96 bits)
const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes
const TAG_SIZE: usize = 16;

/// Current token format version
const TOKEN_VERSION: u8 = 1;

/// Encrypt plaintext bytes into a base64 token
///
/// Generates a random nonce for each encryption operation.
pub fn encrypt(plaintext: &[u8], key: &ArchiveKey) -> PeridotResult<String> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| PeridotError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| PeridotError::Encryption(format!("Encryption failed: {}", e)))?;

    let mut token = Vec::with_capacity(1 + NONCE_SIZE + ciphertext.len());
    token.push(TOKEN_VERSION);
    token.extend_from_slice(&nonce_bytes);
    token.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(token))
}

/// Decrypt a base64 token produced by [`encrypt`]
pub fn decrypt(token: &str, key: &ArchiveKey) -> PeridotResult<Vec<u8>> {
    let raw = STANDARD
        .decode(token)
        .map_err(|e| PeridotError::Encryption(format!("Invalid ciphertext encoding: {}", e)))?;

    if raw.len() < 1 + NONCE_SIZE + TAG_SIZE {
        return Err(PeridotError::Encryption(format!(
            "Ciphertext too short: {} bytes",
            raw.len()
        )));
    }

    let (version, rest) = raw.split_at(1);
    if version[0] != TOKEN_VERSION {
        return Err(PeridotError::Encryption(format!(
            "Unsupported encryption version: {}",
            version[0]
        )));
    }

    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| PeridotError::Encryption(format!("Failed to create cipher: {}", e)))?;

    cipher.decrypt(nonce, ciphertext).map_err(|_| {
        PeridotError::Encryption("Decryption failed: invalid key or corrupted data".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt() {
        let key = ArchiveKey::generate();
        let plaintext = b"export EDITOR=vim\n";

        let token = encrypt(plaintext, &key).unwrap();
        let decrypted = decrypt(&token, &key).unwrap();

        assert_eq!(plaintext, decrypted.as_slice());
    }

    #[test]
    fn test_different_nonces() {
        let key = ArchiveKey::generate();
        let plaintext = b"Hello, World!";

        let first = encrypt(plaintext, &key).unwrap();
        let second = encrypt(plaintext, &key).unwrap();

        // Same plaintext should produce different tokens (different nonces)
        assert_ne!(first, second);
        assert_eq!(decrypt(&first, &key).unwrap(), plaintext);
        assert_eq!(decrypt(&second, &key).unwrap(), plaintext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let key1 = ArchiveKey::generate();
        let key2 = ArchiveKey::generate();

        let token = encrypt(b"secret", &key1).unwrap();

        let result = decrypt(&token, &key2);
        assert!(matches!(result, Err(PeridotError::Encryption(_))));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = ArchiveKey::generate();
        let token = encrypt(b"Hello, World!", &key).unwrap();

        let mut raw = STANDARD.decode(&token).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        let tampered = STANDARD.encode(&raw);

        assert!(decrypt(&tampered, &key).is_err());
    }

    #[test]
    fn test_truncated_token_fails() {
        let key = ArchiveKey::generate();
        let token = encrypt(b"0123456789", &key).unwrap();

        let truncated = &token[..token.len() / 2];
        assert!(decrypt(truncated, &key).is_err());
        assert!(decrypt("", &key).is_err());
    }

    #[test]
    fn test_unknown_version_rejected() {
        let key = ArchiveKey::generate();
        let token = encrypt(b"data", &key).unwrap();

        let mut raw = STANDARD.decode(&token).unwrap();
        raw[0] = 9;
        let err = decrypt(&STANDARD.encode(&raw), &key).unwrap_err();
        assert!(err.to_string().contains("Unsupported encryption version"));
    }

    #[test]
    fn test_empty_plaintext() {
        let key = ArchiveKey::generate();

        let token = encrypt(b"", &key).unwrap();
        let decrypted = decrypt(&token, &key).unwrap();

        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_large_plaintext() {
        let key = ArchiveKey::generate();
        let plaintext: Vec<u8> = (0..10000).map(|i| (i % 256) as u8).collect();

        let token = encrypt(&plaintext, &key).unwrap();
        let decrypted = decrypt(&token, &key).unwrap();

        assert_eq!(plaintext, decrypted);
    }
}
