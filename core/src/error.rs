//! Error type shared by every fallible executor call.
//!
//! # Design
//! Configuration rejection and transport failure surface through the same
//! `TransferError` shape; only the call that returned it tells them apart.
//! Messages always use the `curl_errno : <code> curl_error_message : <text>`
//! layout.

use std::fmt;

/// `CURLE_BAD_FUNCTION_ARGUMENT`, used when an option set is rejected before
/// it ever reaches libcurl.
pub const BAD_FUNCTION_ARGUMENT: i32 = 43;

/// A libcurl error code together with its formatted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferError {
    code: i32,
    message: String,
}

impl TransferError {
    /// Build an error from a native code and the raw libcurl error text.
    pub fn new(code: i32, detail: &str) -> Self {
        Self {
            code,
            message: format!("curl_errno : {code} curl_error_message : {detail}"),
        }
    }

    /// Shorthand for an option value that failed validation.
    pub fn bad_argument(detail: &str) -> Self {
        Self::new(BAD_FUNCTION_ARGUMENT, detail)
    }

    /// The native libcurl error code (`CURLcode`).
    pub fn code(&self) -> i32 {
        self.code
    }

    /// The formatted message, including the code.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TransferError {}

impl From<curl::Error> for TransferError {
    fn from(err: curl::Error) -> Self {
        // libcurl's error buffer is more specific than the static description
        // when it has been filled in.
        let detail = err.extra_description().unwrap_or_else(|| err.description());
        Self::new(err.code() as i32, detail)
    }
}
