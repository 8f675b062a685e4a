//! Synchronous request executor over a single transfer handle.
//!
//! # Design
//! `RequestExecutor` owns exactly one `Transfer` for its whole life and
//! releases it when dropped. Each `set_options` call starts from a reset
//! handle, so nothing leaks from one configuration into the next. A rejected
//! configuration resets the handle again before the error is returned.
//!
//! The last response code is only kept while it describes the most recent
//! `execute`: a transport failure clears it.

use crate::error::TransferError;
use crate::http::{ResponseBody, ResponseDetails};
use crate::options::OptionSet;
use crate::transfer::{CurlTransfer, Transfer};

/// Runs blocking transfers with caller-supplied options.
///
/// Methods take `&mut self`; one executor serves one thread at a time.
pub struct RequestExecutor<T: Transfer = CurlTransfer> {
    transfer: T,
    last_response_code: Option<u32>,
}

impl RequestExecutor<CurlTransfer> {
    /// Create an executor backed by a new libcurl handle.
    pub fn new() -> Self {
        Self::with_transfer(CurlTransfer::new())
    }
}

impl Default for RequestExecutor<CurlTransfer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transfer> RequestExecutor<T> {
    pub fn with_transfer(transfer: T) -> Self {
        Self {
            transfer,
            last_response_code: None,
        }
    }

    /// Replace the handle's configuration with `options`.
    pub fn set_options(&mut self, options: OptionSet) -> Result<(), TransferError> {
        self.transfer.reset();
        let resolved = options.resolve()?;
        tracing::debug!(
            url = resolved.options().url.as_deref().unwrap_or(""),
            method = resolved.options().method.as_str(),
            timeout_secs = resolved.timeout().as_secs(),
            "configuring transfer"
        );
        if let Err(err) = self.transfer.apply(&resolved) {
            self.transfer.reset();
            tracing::debug!(code = err.code(), "transfer options rejected");
            return Err(err);
        }
        Ok(())
    }

    /// Run one blocking transfer with the current configuration.
    pub fn execute(&mut self) -> Result<ResponseBody, TransferError> {
        let outcome = self
            .transfer
            .perform()
            .and_then(|body| Ok((self.transfer.response_code()?, body)));

        match outcome {
            Ok((status, body)) => {
                tracing::debug!(status, bytes = body.len(), "transfer complete");
                self.last_response_code = Some(status);
                Ok(ResponseBody::new(body))
            }
            Err(err) => {
                tracing::warn!(code = err.code(), "{err}");
                self.last_response_code = None;
                Err(err)
            }
        }
    }

    /// Status code of the last successful `execute`, if any.
    pub fn response_code(&self) -> Option<u32> {
        self.last_response_code
    }

    /// Transfer info for the most recent transfer.
    pub fn response_details(&mut self) -> Result<ResponseDetails, TransferError> {
        self.transfer.details()
    }
}

impl<T: Transfer> Drop for RequestExecutor<T> {
    fn drop(&mut self) {
        tracing::trace!("releasing transfer handle");
    }
}
