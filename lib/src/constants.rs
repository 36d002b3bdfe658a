//! Protocol constants shared with the wire layer. Changing any of these
//! makes stored records and peers' group identifiers unreadable.

/// Length in bytes of a legacy (V1) group identifier.
pub const GROUP_ID_LENGTH_V1: usize = 16;

/// Length in bytes of a V2 group identifier.
pub const GROUP_ID_LENGTH_V2: usize = 32;

/// Length in bytes of a V2 group master key.
pub const GROUP_MASTER_KEY_LENGTH: usize = 32;

/// Maximum size of avatar bytes before encryption.
pub const MAX_AVATAR_SIZE: usize = 3_000_000;

/// Maximum size of avatar bytes after encryption (nonce and tag included).
pub const MAX_ENCRYPTED_AVATAR_SIZE: usize = 3 * 1024 * 1024;

/// Shown in place of a missing or blank group name.
pub const DEFAULT_GROUP_NAME: &str = "New Group";

const _: () = assert!(
    MAX_ENCRYPTED_AVATAR_SIZE
        >= MAX_AVATAR_SIZE + crate::crypto::avatar_cipher::AVATAR_CIPHER_OVERHEAD,
    "encrypted ceiling leaves room for the cipher overhead"
);
