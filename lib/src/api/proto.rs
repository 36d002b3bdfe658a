//! Protobuf records for everything we persist.
//!
//! `protos/records.proto` is the schema. The Rust side is checked in under
//! `src/generated/` and rebuilt with the `regenerate-protos` feature.

pub use prost::Message as ProstMessage;

#[allow(warnings)]
mod records {
    include!("../generated/records.rs");
}

pub use records::*;
