//! C-ABI wrapper around `transfer-core`.
//!
//! # Overview
//! Exposes `RequestExecutor` through `extern "C"` functions so any language
//! with a C FFI can configure and run libcurl transfers. Option sets cross
//! the boundary as JSON in the same shape `OptionSet` deserializes from.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A single `FfiTransferResult` envelope with `FfiDataTag` + `void* data`
//!   conveys payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `transfer_free_*` function to release them.
//! - An executor must not be used from two threads at once.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use transfer_core::{OptionSet, RequestExecutor};

use types::*;

// ---------------------------------------------------------------------------
// Executor lifecycle
// ---------------------------------------------------------------------------

/// Create a new executor with its own libcurl handle.
///
/// Returns null if an internal panic occurs (e.g. libcurl could not allocate
/// a handle). The caller must free the returned pointer with
/// `transfer_executor_free`.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_executor_new() -> *mut FfiExecutor {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiExecutor {
            inner: RequestExecutor::new(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free an executor created by `transfer_executor_new`, releasing its handle.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_executor_free(executor: *mut FfiExecutor) {
    if !executor.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(executor) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Replace the executor's options with the JSON option set `options_json`.
///
/// Returns a result with `data_tag = None` on success. Unknown keys and
/// invalid values fail with `error_code = Transfer`, `curl_code = 43`.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_set_options(
    executor: *mut FfiExecutor,
    options_json: *const c_char,
) -> *mut FfiTransferResult {
    catch_unwind(AssertUnwindSafe(|| {
        if executor.is_null() {
            return FfiTransferResult::null_arg("executor");
        }
        if options_json.is_null() {
            return FfiTransferResult::null_arg("options_json");
        }
        let executor = unsafe { &mut *executor };
        let json = match unsafe { CStr::from_ptr(options_json) }.to_str() {
            Ok(s) => s,
            Err(_) => return FfiTransferResult::invalid_utf8("options_json"),
        };
        let applied = OptionSet::from_json(json).and_then(|options| executor.inner.set_options(options));
        match applied {
            Ok(()) => FfiTransferResult::ok_empty(),
            Err(e) => FfiTransferResult::from_error(&e),
        }
    }))
    .unwrap_or_else(|_| FfiTransferResult::panic("panic in transfer_set_options"))
}

/// Run one blocking transfer.
///
/// Returns a result with `data_tag = Body` on success.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_execute(executor: *mut FfiExecutor) -> *mut FfiTransferResult {
    catch_unwind(AssertUnwindSafe(|| {
        if executor.is_null() {
            return FfiTransferResult::null_arg("executor");
        }
        let executor = unsafe { &mut *executor };
        match executor.inner.execute() {
            Ok(body) => FfiTransferResult::ok_body(body),
            Err(e) => FfiTransferResult::from_error(&e),
        }
    }))
    .unwrap_or_else(|_| FfiTransferResult::panic("panic in transfer_execute"))
}

/// Status code of the last successful transfer, or -1 if there is none (or
/// `executor` is null).
#[unsafe(no_mangle)]
pub extern "C" fn transfer_response_code(executor: *const FfiExecutor) -> i64 {
    if executor.is_null() {
        return -1;
    }
    catch_unwind(AssertUnwindSafe(|| {
        let executor = unsafe { &*executor };
        executor.inner.response_code().map_or(-1, i64::from)
    }))
    .unwrap_or(-1)
}

/// Transfer info of the most recent transfer as a JSON object.
///
/// Returns a result with `data_tag = DetailsJson` on success.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_response_details(executor: *mut FfiExecutor) -> *mut FfiTransferResult {
    catch_unwind(AssertUnwindSafe(|| {
        if executor.is_null() {
            return FfiTransferResult::null_arg("executor");
        }
        let executor = unsafe { &mut *executor };
        match executor.inner.response_details() {
            Ok(details) => {
                let json = serde_json::to_string(&details).unwrap_or_else(|_| "{}".to_string());
                FfiTransferResult::ok_json(&json)
            }
            Err(e) => FfiTransferResult::from_error(&e),
        }
    }))
    .unwrap_or_else(|_| FfiTransferResult::panic("panic in transfer_response_details"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiTransferResult` returned by any `transfer_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_free_result(result: *mut FfiTransferResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data.is_null() {
            match result.data_tag {
                FfiDataTag::Body => {
                    let bytes = unsafe { Box::from_raw(result.data as *mut FfiBytes) };
                    if !bytes.data.is_null() && bytes.len > 0 {
                        let slice = std::ptr::slice_from_raw_parts_mut(bytes.data, bytes.len);
                        drop(unsafe { Box::from_raw(slice) });
                    }
                }
                FfiDataTag::DetailsJson => {
                    drop(unsafe { CString::from_raw(result.data as *mut c_char) });
                }
                FfiDataTag::None => {}
            }
        }
    }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn transfer_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { CString::from_raw(s) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
