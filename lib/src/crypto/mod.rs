pub mod avatar_cipher;
pub mod master_key;
pub mod rng;

pub use {avatar_cipher::AvatarCipher, master_key::GroupMasterKey};
