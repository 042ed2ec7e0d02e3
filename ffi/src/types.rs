//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Strings cross the boundary as heap `*mut c_char` owned by the caller until
//! handed back to `bookshare_free_string` / `bookshare_free_result`. Errors
//! are flattened into one result envelope with a numeric code per
//! `ApiError` variant plus the two conditions only the FFI layer can hit.

use std::ffi::CString;
use std::os::raw::c_char;

use bookshare_core::ApiError;

/// Opaque handle to a `WebserviceClient`.
pub struct FfiClient {
    pub(crate) inner: bookshare_core::WebserviceClient,
}

/// Error codes returned in `FfiFetchResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    UriSyntax = 1,
    Network = 2,
    Encoding = 3,
    Read = 4,
    Panic = 5,
    NullArg = 6,
}

/// Result of `bookshare_fetch_string`.
///
/// On success `error_code` is `Ok`, `error_message` is null, `body` holds the
/// trimmed response text and `http_status` the response status (which may be
/// 4xx/5xx). On failure `body` is null and `error_message` explains why.
#[repr(C)]
pub struct FfiFetchResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub body: *mut c_char,
}

impl FfiFetchResult {
    pub(crate) fn ok(status: u16, body: String) -> *mut Self {
        Box::into_raw(Box::new(FfiFetchResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: status,
            body: into_c_string(body),
        }))
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let code = match &err {
            ApiError::UriSyntax { .. } => FfiErrorCode::UriSyntax,
            ApiError::Network(_) => FfiErrorCode::Network,
            ApiError::Encoding(_) => FfiErrorCode::Encoding,
            ApiError::Read(_) => FfiErrorCode::Read,
        };
        Self::failure(code, err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    fn failure(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiFetchResult {
            error_code,
            error_message: into_c_string(msg),
            http_status: 0,
            body: std::ptr::null_mut(),
        }))
    }
}

/// Move `s` into a C string, dropping interior NUL bytes.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let c = CString::new(s).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|&b| b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    c.into_raw()
}
