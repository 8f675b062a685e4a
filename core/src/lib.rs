//! Blocking HTTP request executor over a libcurl easy handle.
//!
//! # Overview
//! A `RequestExecutor` owns one transfer handle. Callers hand it an
//! `OptionSet`, run `execute`, then read the body, the response code or the
//! full transfer info. DNS, TLS, redirects, timeouts and connection reuse are
//! all libcurl's business; this crate only forwards options and reports
//! results.
//!
//! # Design
//! - `OptionSet` is a closed, typed set of options. `resolve` turns it into the
//!   configuration actually applied: body capture forced on, 30 s default
//!   timeout, header values validated.
//! - `Transfer` is the seam to the native handle; `CurlTransfer` is the
//!   libcurl implementation.
//! - Every fallible call returns `TransferError`, which carries the native
//!   error code and a `curl_errno : .. curl_error_message : ..` message.

pub mod error;
pub mod executor;
pub mod http;
pub mod options;
pub mod transfer;

pub use error::TransferError;
pub use executor::RequestExecutor;
pub use http::{HttpMethod, ResponseBody, ResponseDetails};
pub use options::{OptionSet, ResolvedOptions, DEFAULT_TIMEOUT};
pub use transfer::{CurlTransfer, Transfer};
