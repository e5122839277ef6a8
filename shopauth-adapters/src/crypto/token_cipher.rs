use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// AES-256-GCM key length in bytes.
pub const CIPHER_KEY_LEN: usize = 32;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum TokenCipherError {
    #[error("Cipher key must be {CIPHER_KEY_LEN} bytes")]
    InvalidKeyLength,
    #[error("Encryption failed")]
    EncryptionFailed,
    /// Wrong key, corrupted ciphertext, or a flipped IV bit - the
    /// authentication tag rejects all of them before any plaintext is
    /// released.
    #[error("Token envelope failed authentication")]
    Tampered,
}

/// The serialized form of one authenticated encryption: fresh IV,
/// ciphertext, and the GCM authentication tag, hex-encoded for
/// transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub iv: String,
    pub ciphertext: String,
    #[serde(rename = "authTag")]
    pub auth_tag: String,
}

/// Authenticated symmetric encryption for opaque token payloads.
#[derive(Clone)]
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl TokenCipher {
    pub fn new(key_bytes: &[u8]) -> Result<Self, TokenCipherError> {
        if key_bytes.len() != CIPHER_KEY_LEN {
            return Err(TokenCipherError::InvalidKeyLength);
        }

        Ok(Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key_bytes)),
        })
    }

    /// Encrypt under a fresh random IV. IVs are never reused under the
    /// same key; reuse would break both confidentiality and integrity
    /// of the GCM mode.
    pub fn encrypt(&self, plaintext: &str) -> Result<Envelope, TokenCipherError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let mut sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| TokenCipherError::EncryptionFailed)?;

        let auth_tag = sealed.split_off(sealed.len() - TAG_LEN);

        Ok(Envelope {
            iv: hex::encode(nonce),
            ciphertext: hex::encode(&sealed),
            auth_tag: hex::encode(&auth_tag),
        })
    }

    pub fn decrypt(&self, envelope: &Envelope) -> Result<String, TokenCipherError> {
        let iv = hex::decode(&envelope.iv).map_err(|_| TokenCipherError::Tampered)?;
        if iv.len() != NONCE_LEN {
            return Err(TokenCipherError::Tampered);
        }

        let mut sealed = hex::decode(&envelope.ciphertext).map_err(|_| TokenCipherError::Tampered)?;
        let auth_tag = hex::decode(&envelope.auth_tag).map_err(|_| TokenCipherError::Tampered)?;
        sealed.extend_from_slice(&auth_tag);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&iv), sealed.as_slice())
            .map_err(|_| TokenCipherError::Tampered)?;

        String::from_utf8(plaintext).map_err(|_| TokenCipherError::Tampered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> TokenCipher {
        TokenCipher::new(&[7u8; CIPHER_KEY_LEN]).unwrap()
    }

    fn flip_first_bit(field: &str) -> String {
        let mut bytes = hex::decode(field).unwrap();
        bytes[0] ^= 0x01;
        hex::encode(bytes)
    }

    #[test]
    fn test_round_trip() {
        let cipher = test_cipher();
        let envelope = cipher.encrypt("signed claims go here").unwrap();
        assert_eq!(cipher.decrypt(&envelope).unwrap(), "signed claims go here");
    }

    #[test]
    fn test_rejects_short_key() {
        assert!(matches!(
            TokenCipher::new(&[0u8; 16]),
            Err(TokenCipherError::InvalidKeyLength)
        ));
    }

    #[test]
    fn test_fresh_iv_per_call() {
        let cipher = test_cipher();
        let first = cipher.encrypt("same input").unwrap();
        let second = cipher.encrypt("same input").unwrap();
        assert_ne!(first.iv, second.iv);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn test_flipped_ciphertext_bit_fails() {
        let cipher = test_cipher();
        let mut envelope = cipher.encrypt("payload").unwrap();
        envelope.ciphertext = flip_first_bit(&envelope.ciphertext);
        assert!(matches!(
            cipher.decrypt(&envelope),
            Err(TokenCipherError::Tampered)
        ));
    }

    #[test]
    fn test_flipped_auth_tag_bit_fails() {
        let cipher = test_cipher();
        let mut envelope = cipher.encrypt("payload").unwrap();
        envelope.auth_tag = flip_first_bit(&envelope.auth_tag);
        assert!(matches!(
            cipher.decrypt(&envelope),
            Err(TokenCipherError::Tampered)
        ));
    }

    #[test]
    fn test_flipped_iv_bit_fails() {
        let cipher = test_cipher();
        let mut envelope = cipher.encrypt("payload").unwrap();
        envelope.iv = flip_first_bit(&envelope.iv);
        assert!(matches!(
            cipher.decrypt(&envelope),
            Err(TokenCipherError::Tampered)
        ));
    }

    #[test]
    fn test_wrong_key_fails() {
        let envelope = test_cipher().encrypt("payload").unwrap();
        let other = TokenCipher::new(&[8u8; CIPHER_KEY_LEN]).unwrap();
        assert!(matches!(
            other.decrypt(&envelope),
            Err(TokenCipherError::Tampered)
        ));
    }

    #[test]
    fn test_garbage_fields_fail() {
        let cipher = test_cipher();
        let envelope = Envelope {
            iv: "not hex".to_string(),
            ciphertext: String::new(),
            auth_tag: String::new(),
        };
        assert!(matches!(
            cipher.decrypt(&envelope),
            Err(TokenCipherError::Tampered)
        ));
    }

    #[test]
    fn test_envelope_wire_field_names() {
        let envelope = test_cipher().encrypt("payload").unwrap();
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("iv").is_some());
        assert!(json.get("ciphertext").is_some());
        assert!(json.get("authTag").is_some());
    }
}
