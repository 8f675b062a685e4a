//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! The executor itself stays opaque; C callers only hold a pointer to
//! `FfiExecutor`. Results travel in one tagged envelope, `FfiTransferResult`,
//! whose `data_tag` tells `transfer_free_result` what `data` points to.

use std::ffi::CString;
use std::os::raw::c_char;

use transfer_core::{RequestExecutor, ResponseBody, TransferError};

/// Opaque handle to a `RequestExecutor`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiExecutor {
    pub(crate) inner: RequestExecutor,
}

/// Error codes returned in `FfiTransferResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    /// libcurl rejected the options or the transfer failed; see `curl_code`.
    Transfer = 1,
    Panic = 2,
    NullArg = 3,
    InvalidUtf8 = 4,
}

/// Tag that tells `transfer_free_result` what `FfiTransferResult::data`
/// points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    /// `data` is an `FfiBytes`.
    Body = 1,
    /// `data` is a NUL-terminated JSON object.
    DetailsJson = 2,
}

/// A response body exposed to C. Not NUL-terminated; may contain NUL bytes.
#[repr(C)]
pub struct FfiBytes {
    pub data: *mut u8,
    pub len: usize,
}

/// Result envelope for every fallible operation.
///
/// On success `error_code` is `Ok`, `curl_code` is 0, `error_message` is null
/// and `data` points to the payload tagged by `data_tag`.
/// On failure `error_message` holds the formatted message and `data` is null.
#[repr(C)]
pub struct FfiTransferResult {
    pub error_code: FfiErrorCode,
    pub curl_code: i32,
    pub error_message: *mut c_char,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiTransferResult {
    fn boxed(
        error_code: FfiErrorCode,
        curl_code: i32,
        message: Option<&str>,
        data_tag: FfiDataTag,
        data: *mut std::ffi::c_void,
    ) -> *mut Self {
        let error_message = match message {
            Some(msg) => c_string(msg).into_raw(),
            None => std::ptr::null_mut(),
        };
        Box::into_raw(Box::new(FfiTransferResult {
            error_code,
            curl_code,
            error_message,
            data_tag,
            data,
        }))
    }

    /// Build a success result with no payload (e.g. set options).
    pub(crate) fn ok_empty() -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, 0, None, FfiDataTag::None, std::ptr::null_mut())
    }

    /// Build a success result carrying the response body.
    pub(crate) fn ok_body(body: ResponseBody) -> *mut Self {
        let mut bytes = body.into_bytes().into_boxed_slice();
        let len = bytes.len();
        let data = if len == 0 {
            std::ptr::null_mut()
        } else {
            let ptr = bytes.as_mut_ptr();
            std::mem::forget(bytes);
            ptr
        };
        let ffi_bytes = Box::new(FfiBytes { data, len });
        Self::boxed(
            FfiErrorCode::Ok,
            0,
            None,
            FfiDataTag::Body,
            Box::into_raw(ffi_bytes) as *mut std::ffi::c_void,
        )
    }

    /// Build a success result carrying a JSON document.
    pub(crate) fn ok_json(json: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Ok,
            0,
            None,
            FfiDataTag::DetailsJson,
            c_string(json).into_raw() as *mut std::ffi::c_void,
        )
    }

    /// Build an error result from a `TransferError`.
    pub(crate) fn from_error(err: &TransferError) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Transfer,
            err.code(),
            Some(err.message()),
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        let msg = format!("null argument: {name}");
        Self::boxed(FfiErrorCode::NullArg, 0, Some(&msg), FfiDataTag::None, std::ptr::null_mut())
    }

    /// Build an error result for a string argument that is not UTF-8.
    pub(crate) fn invalid_utf8(name: &str) -> *mut Self {
        let msg = format!("argument is not valid UTF-8: {name}");
        Self::boxed(FfiErrorCode::InvalidUtf8, 0, Some(&msg), FfiDataTag::None, std::ptr::null_mut())
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, 0, Some(msg), FfiDataTag::None, std::ptr::null_mut())
    }
}

/// `CString::new` with interior NULs stripped instead of failing.
pub(crate) fn c_string(s: &str) -> CString {
    CString::new(s.replace('\0', "")).unwrap_or_default()
}
