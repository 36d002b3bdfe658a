use std::fmt::Display;

use base64ct::{Base64UrlUnpadded, Encoding};

/// Unpadded URL-safe base64, used wherever raw identifiers are shown to
/// humans (logs, debug output).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64String(String);

impl Display for Base64String {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Base64String {
    pub fn inner_str(&self) -> &str {
        &self.0
    }

    pub fn from_bytes<Bytes: AsRef<[u8]>>(bytes: Bytes) -> Self {
        Base64String(Base64UrlUnpadded::encode_string(bytes.as_ref()))
    }
}
