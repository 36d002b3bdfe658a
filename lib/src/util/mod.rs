pub mod base64;
pub mod context;
pub mod stack;
pub mod uuid;
