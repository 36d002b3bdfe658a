pub mod access;
pub mod avatar;
pub mod codec;
pub mod membership;
pub mod model;

pub use {
    access::{AccessRequired, GroupAccess},
    avatar::{AvatarHash, GroupAvatar},
    membership::{GroupMembership, Role},
    model::{GroupModel, GroupModelBuilder, GroupV2Properties, GroupVersionData},
};
