use serde::{Deserialize, Serialize};

use crate::{constants::GROUP_MASTER_KEY_LENGTH, error::ProtoError};

use super::rng::random_bytes;

/// The secret every member of a V2 group shares. Keys for group
/// resources (such as the avatar) are derived from it.
#[derive(PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Hash)]
pub struct GroupMasterKey([u8; GROUP_MASTER_KEY_LENGTH]);

impl GroupMasterKey {
    pub fn generate() -> Self {
        Self(random_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; GROUP_MASTER_KEY_LENGTH] {
        &self.0
    }
}

impl From<[u8; GROUP_MASTER_KEY_LENGTH]> for GroupMasterKey {
    fn from(value: [u8; GROUP_MASTER_KEY_LENGTH]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for GroupMasterKey {
    type Error = ProtoError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(value.try_into().map_err(|_| ProtoError)?))
    }
}

// Keeps the key out of logs
impl std::fmt::Debug for GroupMasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GroupMasterKey(..)")
    }
}
