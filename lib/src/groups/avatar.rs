//! Avatar validation and representation.
//!
//! Raw avatar bytes are capped by [`MAX_AVATAR_SIZE`] before encryption;
//! encrypted avatars in transit are capped by [`MAX_ENCRYPTED_AVATAR_SIZE`].
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    constants::{MAX_AVATAR_SIZE, MAX_ENCRYPTED_AVATAR_SIZE},
    error::GroupModelError,
};

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

/// Sniffs the container format from the leading bytes.
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(PNG_SIGNATURE) {
        Some(ImageFormat::Png)
    } else if bytes.starts_with(JPEG_SIGNATURE) {
        Some(ImageFormat::Jpeg)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(ImageFormat::Gif)
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some(ImageFormat::Webp)
    } else {
        None
    }
}

/// Checks raw (unencrypted) avatar bytes: size first, then format.
pub fn validate_avatar_data(bytes: &[u8]) -> Result<ImageFormat, GroupModelError> {
    if bytes.len() > MAX_AVATAR_SIZE {
        return Err(GroupModelError::AvatarTooLarge {
            size: bytes.len(),
            max: MAX_AVATAR_SIZE,
        });
    }

    detect_image_format(bytes).ok_or(GroupModelError::InvalidAvatarFormat)
}

/// Checks the length of an encrypted avatar, before decryption or after
/// encryption.
pub fn validate_encrypted_avatar_len(len: usize) -> Result<(), GroupModelError> {
    if len > MAX_ENCRYPTED_AVATAR_SIZE {
        Err(GroupModelError::AvatarTooLarge {
            size: len,
            max: MAX_ENCRYPTED_AVATAR_SIZE,
        })
    } else {
        Ok(())
    }
}

/// Lowercase hex SHA-256 of the avatar bytes. The bytes themselves are kept
/// outside the group record, keyed by this hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct AvatarHash(String);

impl AvatarHash {
    pub fn of(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    pub fn parse(value: impl Into<String>) -> Result<Self, GroupModelError> {
        let value = value.into();

        if value.len() == 64
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            Ok(Self(value))
        } else {
            Err(GroupModelError::DecodeError(format!(
                "invalid avatar hash {value:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AvatarHash {
    type Error = GroupModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Display for AvatarHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The group's avatar: nothing, raw legacy bytes, or a hash of bytes stored
/// elsewhere. Exactly one representation is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupAvatar {
    #[default]
    None,
    Legacy(Vec<u8>),
    Hash(AvatarHash),
}

impl GroupAvatar {
    pub fn legacy_data(&self) -> Option<&[u8]> {
        match self {
            GroupAvatar::Legacy(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn hash(&self) -> Option<&AvatarHash> {
        match self {
            GroupAvatar::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, GroupAvatar::None)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A PNG signature padded with zeroes to `size` bytes.
    pub(crate) fn png_of_size(size: usize) -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.resize(size.max(PNG_SIGNATURE.len()), 0);
        bytes
    }

    #[test]
    fn avatar_at_the_ceiling_is_accepted() {
        assert_eq!(
            validate_avatar_data(&png_of_size(MAX_AVATAR_SIZE)),
            Ok(ImageFormat::Png),
            "exactly at the ceiling"
        );
    }

    #[test]
    fn avatar_over_the_ceiling_is_rejected() {
        assert_eq!(
            validate_avatar_data(&png_of_size(MAX_AVATAR_SIZE + 1)),
            Err(GroupModelError::AvatarTooLarge {
                size: MAX_AVATAR_SIZE + 1,
                max: MAX_AVATAR_SIZE
            }),
            "one byte over"
        );
    }

    #[test]
    fn encrypted_ceiling_is_separate_and_larger() {
        assert_eq!(
            validate_encrypted_avatar_len(MAX_ENCRYPTED_AVATAR_SIZE),
            Ok(()),
            "exactly at the encrypted ceiling"
        );
        assert!(
            validate_encrypted_avatar_len(MAX_AVATAR_SIZE + 1).is_ok(),
            "too big raw is still fine encrypted"
        );
        assert_eq!(
            validate_encrypted_avatar_len(MAX_ENCRYPTED_AVATAR_SIZE + 1),
            Err(GroupModelError::AvatarTooLarge {
                size: MAX_ENCRYPTED_AVATAR_SIZE + 1,
                max: MAX_ENCRYPTED_AVATAR_SIZE
            }),
            "one byte over the encrypted ceiling"
        );
    }

    #[test]
    fn image_formats_are_sniffed() {
        assert_eq!(
            detect_image_format(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg),
            "JPEG start of image"
        );
        assert_eq!(
            detect_image_format(b"GIF89a...."),
            Some(ImageFormat::Gif),
            "GIF89a header"
        );
        assert_eq!(
            detect_image_format(b"RIFF\0\0\0\0WEBPVP8 "),
            Some(ImageFormat::Webp),
            "RIFF container with a WebP form type"
        );
        assert_eq!(detect_image_format(b"RIFF\0\0\0\0WAVE"), None, "RIFF but not WebP");
        assert_eq!(
            validate_avatar_data(b"hello"),
            Err(GroupModelError::InvalidAvatarFormat),
            "text is not an image"
        );
        assert_eq!(
            validate_avatar_data(&[]),
            Err(GroupModelError::InvalidAvatarFormat),
            "empty data is not an image"
        );
    }

    #[test]
    fn avatar_hash_is_sha256_hex() {
        let hash = AvatarHash::of(b"abc");

        assert_eq!(
            hash.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
            "SHA-256 test vector"
        );
        assert_eq!(
            AvatarHash::parse(hash.as_str()),
            Ok(hash.clone()),
            "own output parses"
        );
        assert!(
            AvatarHash::parse("BA7816BF").is_err(),
            "short or uppercase hashes are rejected"
        );
    }

    #[test]
    fn avatar_serializes_as_a_tagged_union() {
        let avatar = GroupAvatar::Hash(AvatarHash::of(b"abc"));

        let json = serde_json::to_value(&avatar).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "Hash": "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
            }),
            "one variant, never both representations"
        );

        let back: GroupAvatar = serde_json::from_value(json).expect("deserializes");
        assert_eq!(back, avatar, "same variant after a trip through JSON");
    }

    #[test]
    fn malformed_hash_is_rejected_when_deserialized() {
        assert!(
            serde_json::from_str::<AvatarHash>("\"not-a-hash\"").is_err(),
            "hash must be 64 lowercase hex characters"
        );
        assert!(
            serde_json::from_str::<GroupAvatar>("{\"Hash\":\"ABCDEF\"}").is_err(),
            "same check inside the avatar"
        );
    }
}
