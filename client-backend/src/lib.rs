pub mod database;
pub mod manager;
#[cfg(test)]
pub mod tests;
/// Structs for UI elements
pub mod ui;
