//! Password digest for the `X-password` header.
//!
//! The Bookshare API expects the uppercase hex MD5 of the account password.
//! MD5 is kept only for wire compatibility with that legacy header; do not
//! reuse these helpers for anything security sensitive.

use md5::{Digest, Md5};

use crate::error::ApiError;

/// Uppercase hex MD5 of `secret`'s UTF-8 bytes. Always 32 characters.
pub fn digest(secret: &str) -> String {
    hex::encode_upper(Md5::digest(secret.as_bytes()))
}

/// Like [`digest`], for bytes that have not been checked for UTF-8 yet.
pub fn digest_utf8(secret: &[u8]) -> Result<String, ApiError> {
    let secret = std::str::from_utf8(secret).map_err(|e| ApiError::Encoding(e.to_string()))?;
    Ok(digest(secret))
}
