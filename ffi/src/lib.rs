//! C-ABI wrapper around `bookshare-core`.
//!
//! # Overview
//! Exposes client construction, the password digest and `fetch_string`
//! through `extern "C"` functions, so a host without Rust can call the
//! Bookshare API with the same header and body handling.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Fetch results come back in one `FfiFetchResult` envelope carrying the
//!   HTTP status, the body text or an error code and message.
//! - The C caller owns all returned pointers and must call the matching
//!   `bookshare_*_free` / `bookshare_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use bookshare_core::{ApiError, ClientConfig, WebserviceClient};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `host`, or to `api.bookshare.org` when `host` is
/// null.
///
/// Returns null if `host` is not valid UTF-8 or if an internal panic occurs.
/// The caller must free the returned pointer with `bookshare_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn bookshare_client_new(host: *const c_char) -> *mut FfiClient {
    catch_unwind(|| {
        let client = if host.is_null() {
            WebserviceClient::new()
        } else {
            match unsafe { CStr::from_ptr(host) }.to_str() {
                Ok(h) => WebserviceClient::with_host(h),
                Err(_) => return std::ptr::null_mut(),
            }
        };
        Box::into_raw(Box::new(FfiClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a client from a JSON `ClientConfig` document, e.g.
/// `{"host":"api.bookshare.org","timeout_secs":30,"read_mode":"strict"}`.
///
/// Returns null if `config_json` is null or does not parse.
#[unsafe(no_mangle)]
pub extern "C" fn bookshare_client_new_from_json(config_json: *const c_char) -> *mut FfiClient {
    catch_unwind(|| {
        if config_json.is_null() {
            return std::ptr::null_mut();
        }
        let raw = match unsafe { CStr::from_ptr(config_json) }.to_str() {
            Ok(raw) => raw,
            Err(_) => return std::ptr::null_mut(),
        };
        match ClientConfig::from_json(raw) {
            Ok(config) => Box::into_raw(Box::new(FfiClient {
                inner: WebserviceClient::with_config(config),
            })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `bookshare_client_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bookshare_client_free(client: *mut FfiClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Digest
// ---------------------------------------------------------------------------

/// Uppercase hex MD5 of `secret`, as sent in the `X-password` header.
///
/// Returns null if `secret` is null or not valid UTF-8.
/// The caller must free the returned string with `bookshare_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn bookshare_digest(secret: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        if secret.is_null() {
            return std::ptr::null_mut();
        }
        let bytes = unsafe { CStr::from_ptr(secret) }.to_bytes();
        match bookshare_core::digest_utf8(bytes) {
            Ok(hex) => into_c_string(hex),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// GET `request_uri` from the client's host and return the trimmed body.
///
/// `password` may be null, in which case no `X-password` header is sent.
/// HTTP error statuses are not failures: check `http_status`.
/// The caller must free the result with `bookshare_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn bookshare_fetch_string(
    client: *const FfiClient,
    password: *const c_char,
    request_uri: *const c_char,
) -> *mut FfiFetchResult {
    // `ureq::Agent` holds trait objects that are not `RefUnwindSafe`.
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiFetchResult::null_arg("client");
        }
        if request_uri.is_null() {
            return FfiFetchResult::null_arg("request_uri");
        }
        let client = unsafe { &*client };
        match fetch(&client.inner, password, request_uri) {
            Ok((status, body)) => FfiFetchResult::ok(status, body),
            Err(e) => FfiFetchResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiFetchResult::panic("panic in bookshare_fetch_string"))
}

fn fetch(
    client: &WebserviceClient,
    password: *const c_char,
    request_uri: *const c_char,
) -> Result<(u16, String), ApiError> {
    let uri_bytes = unsafe { CStr::from_ptr(request_uri) }.to_bytes();
    let uri = std::str::from_utf8(uri_bytes).map_err(|e| ApiError::UriSyntax {
        uri: String::from_utf8_lossy(uri_bytes).into_owned(),
        message: e.to_string(),
    })?;
    let password = if password.is_null() {
        None
    } else {
        let bytes = unsafe { CStr::from_ptr(password) }.to_bytes();
        Some(std::str::from_utf8(bytes).map_err(|e| ApiError::Encoding(e.to_string()))?)
    };

    let stream = client.fetch_stream(password, uri)?;
    let status = stream.status();
    let body = stream.into_string(client.config().read_mode)?;
    Ok((status, body))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiFetchResult` returned by `bookshare_fetch_string`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bookshare_free_result(result: *mut FfiFetchResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.body.is_null() {
            drop(unsafe { CString::from_raw(result.body) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bookshare_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn read_c(ptr: *const c_char) -> String {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
    }

    #[test]
    fn client_new_and_free() {
        let host = CString::new("api.bookshare.org").unwrap();
        let client = bookshare_client_new(host.as_ptr());
        assert!(!client.is_null());
        assert_eq!(unsafe { &*client }.inner.host(), "api.bookshare.org");
        bookshare_client_free(client);
    }

    #[test]
    fn client_new_null_uses_default_host() {
        let client = bookshare_client_new(std::ptr::null());
        assert!(!client.is_null());
        assert_eq!(unsafe { &*client }.inner.host(), "api.bookshare.org");
        bookshare_client_free(client);
    }

    #[test]
    fn client_new_non_utf8_host_returns_null() {
        let host = CString::new(vec![0x61, 0xff]).unwrap();
        assert!(bookshare_client_new(host.as_ptr()).is_null());
    }

    #[test]
    fn client_from_json() {
        let json = CString::new(r#"{"host":"localhost:3000","read_mode":"strict"}"#).unwrap();
        let client = bookshare_client_new_from_json(json.as_ptr());
        assert!(!client.is_null());
        let inner = &unsafe { &*client }.inner;
        assert_eq!(inner.host(), "localhost:3000");
        assert_eq!(inner.config().read_mode, bookshare_core::ReadMode::Strict);
        bookshare_client_free(client);
    }

    #[test]
    fn client_from_bad_json_returns_null() {
        let json = CString::new("{not json").unwrap();
        assert!(bookshare_client_new_from_json(json.as_ptr()).is_null());
        assert!(bookshare_client_new_from_json(std::ptr::null()).is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        bookshare_client_free(std::ptr::null_mut());
    }

    #[test]
    fn digest_matches_fixture() {
        let secret = CString::new("test-string-for-md5").unwrap();
        let out = bookshare_digest(secret.as_ptr());
        assert!(!out.is_null());
        assert_eq!(read_c(out), "DC5627ED84AB50D93A30DE90B88DE94E");
        bookshare_free_string(out);
    }

    #[test]
    fn digest_non_utf8_returns_null() {
        let secret = CString::new(vec![0xc3, 0x28]).unwrap();
        assert!(bookshare_digest(secret.as_ptr()).is_null());
        assert!(bookshare_digest(std::ptr::null()).is_null());
    }

    #[test]
    fn fetch_null_client_is_null_arg() {
        let uri = CString::new("/v2/book/id/1").unwrap();
        let result = bookshare_fetch_string(std::ptr::null(), std::ptr::null(), uri.as_ptr());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);
        assert_eq!(read_c(r.error_message), "null argument: client");
        assert!(r.body.is_null());
        bookshare_free_result(result);
    }

    #[test]
    fn fetch_null_uri_is_null_arg() {
        let client = bookshare_client_new(std::ptr::null());
        let result = bookshare_fetch_string(client, std::ptr::null(), std::ptr::null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        bookshare_free_result(result);
        bookshare_client_free(client);
    }

    #[test]
    fn fetch_malformed_uri_is_uri_syntax() {
        let client = bookshare_client_new(std::ptr::null());
        let uri = CString::new("not a uri").unwrap();
        let result = bookshare_fetch_string(client, std::ptr::null(), uri.as_ptr());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::UriSyntax);
        assert!(read_c(r.error_message).contains("not a uri"));
        bookshare_free_result(result);
        bookshare_client_free(client);
    }

    #[test]
    fn fetch_non_utf8_password_is_encoding_error() {
        let client = bookshare_client_new(std::ptr::null());
        let uri = CString::new("/v2/user/info").unwrap();
        let password = CString::new(vec![0xff, 0xfe]).unwrap();
        let result = bookshare_fetch_string(client, password.as_ptr(), uri.as_ptr());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::Encoding);
        bookshare_free_result(result);
        bookshare_client_free(client);
    }

    #[test]
    fn free_result_null_is_safe() {
        bookshare_free_result(std::ptr::null_mut());
    }

    #[test]
    fn free_string_null_is_safe() {
        bookshare_free_string(std::ptr::null_mut());
    }
}
