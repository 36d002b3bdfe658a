mod groups;
pub mod utils;
