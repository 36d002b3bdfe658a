use crate::identifiers::IdentifierError;

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
#[error("The protobuf could not be deserialized (invalid data or unexpected output).")]
pub struct ProtoError;

/// Errors produced while building or decoding a [`crate::groups::GroupModel`].
///
/// Construction errors never leave a partially built model behind.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum GroupModelError {
    #[error("Invalid group identifier: {0}")]
    InvalidGroupIdentifier(#[from] IdentifierError),
    #[error("Invalid group membership: {0}")]
    InvalidMembership(String),
    #[error("Avatar is {size} bytes, the maximum is {max}")]
    AvatarTooLarge { size: usize, max: usize },
    #[error("Avatar data is not a supported image format")]
    InvalidAvatarFormat,
    #[error("Malformed group record: {0}")]
    DecodeError(String),
}

impl From<ProtoError> for GroupModelError {
    fn from(value: ProtoError) -> Self {
        GroupModelError::DecodeError(value.to_string())
    }
}

impl From<prost::DecodeError> for GroupModelError {
    fn from(value: prost::DecodeError) -> Self {
        GroupModelError::DecodeError(value.to_string())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Group model error: {0}")]
    GroupModel(#[from] GroupModelError),
    #[error("V1 groups have no encrypted avatars")]
    NotAV2Group,
    #[error("Avatar encryption error: {0}")]
    AvatarCipher(#[from] crate::crypto::avatar_cipher::AvatarCipherError),
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        std::io::Error::new::<Error>(std::io::ErrorKind::Other, value)
    }
}
