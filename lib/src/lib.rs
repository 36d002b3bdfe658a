pub mod api;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod groups;
pub mod identifiers;
pub mod messages;
pub mod util;
