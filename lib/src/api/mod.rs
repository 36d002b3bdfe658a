//! Persisted record shapes shared between the model and the storage layer.
pub mod proto;
