use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Key, Nonce,
};
use hkdf::Hkdf;
use sha2::Sha256;

use crate::{
    error::GroupModelError,
    groups::avatar::{validate_avatar_data, validate_encrypted_avatar_len},
};

use super::{master_key::GroupMasterKey, rng::random_bytes};

const NONCE_LENGTH: usize = 12;
const TAG_LENGTH: usize = 16;

/// Bytes added to an avatar by [`AvatarCipher::encrypt`].
pub const AVATAR_CIPHER_OVERHEAD: usize = NONCE_LENGTH + TAG_LENGTH;

const AVATAR_KEY_INFO: &[u8] = b"rosa_group_avatar_v1";

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum AvatarCipherError {
    #[error("Avatar rejected: {0}")]
    InvalidAvatar(#[from] GroupModelError),
    #[error("Encrypted avatar is too short to hold a nonce and tag")]
    Truncated,
    #[error("Avatar could not be encrypted or authenticated")]
    Aead,
}

/// Encrypts avatars of V2 groups for upload, and decrypts downloaded ones.
///
/// The ceilings are checked at both ends: raw bytes before encryption and
/// after decryption, encrypted bytes after encryption and before decryption.
pub struct AvatarCipher {
    cipher: Aes256Gcm,
}

impl AvatarCipher {
    pub fn new(master_key: &GroupMasterKey) -> Self {
        // Deterministic: every member derives the same avatar key.
        let hk = Hkdf::<Sha256>::new(None, master_key.as_bytes());
        let mut key = [0u8; 32];
        hk.expand(AVATAR_KEY_INFO, &mut key)
            .expect("32 is a valid length for Sha256 to output");

        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key)),
        }
    }

    /// Returns `nonce || ciphertext || tag`.
    pub fn encrypt(&self, avatar: &[u8]) -> Result<Vec<u8>, AvatarCipherError> {
        validate_avatar_data(avatar)?;

        let nonce_bytes = random_bytes::<NONCE_LENGTH>();
        let ciphertext = self
            .cipher
            .encrypt(
                Nonce::from_slice(&nonce_bytes),
                Payload {
                    msg: avatar,
                    aad: AVATAR_KEY_INFO,
                },
            )
            .map_err(|_| AvatarCipherError::Aead)?;

        let mut out = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);

        validate_encrypted_avatar_len(out.len())?;

        Ok(out)
    }

    pub fn decrypt(&self, encrypted: &[u8]) -> Result<Vec<u8>, AvatarCipherError> {
        validate_encrypted_avatar_len(encrypted.len())?;

        if encrypted.len() < AVATAR_CIPHER_OVERHEAD {
            return Err(AvatarCipherError::Truncated);
        }

        let (nonce, ciphertext) = encrypted.split_at(NONCE_LENGTH);
        let avatar = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: AVATAR_KEY_INFO,
                },
            )
            .map_err(|_| AvatarCipherError::Aead)?;

        validate_avatar_data(&avatar)?;

        Ok(avatar)
    }
}
