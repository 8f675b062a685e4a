//! The native transfer handle behind a `RequestExecutor`.
//!
//! # Design
//! `Transfer` is the seam between the executor and libcurl. `CurlTransfer`
//! is the production implementation over `curl::easy::Easy2`; tests plug in
//! doubles that record resets, applied options and releases.
//!
//! The handle is never exposed: callers only see the values a transfer
//! produces.

use std::time::Duration;

use curl::easy::{Easy2, Handler, List, WriteError};

use crate::error::TransferError;
use crate::http::{HttpMethod, ResponseDetails};
use crate::options::ResolvedOptions;

/// One native transfer handle.
pub trait Transfer {
    /// Clear every option previously applied to the handle.
    fn reset(&mut self);

    /// Apply a resolved configuration to a freshly reset handle.
    fn apply(&mut self, options: &ResolvedOptions) -> Result<(), TransferError>;

    /// Run one blocking transfer and return the captured body.
    fn perform(&mut self) -> Result<Vec<u8>, TransferError>;

    /// Status code of the last transfer.
    fn response_code(&mut self) -> Result<u32, TransferError>;

    /// Transfer info of the last transfer.
    fn details(&mut self) -> Result<ResponseDetails, TransferError>;
}

/// Write handler that buffers the response body in memory.
#[derive(Debug, Default)]
pub struct Collector {
    capture: bool,
    body: Vec<u8>,
}

impl Handler for Collector {
    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        if self.capture {
            self.body.extend_from_slice(data);
        }
        Ok(data.len())
    }
}

/// libcurl easy handle with an in-memory body collector.
pub struct CurlTransfer {
    easy: Easy2<Collector>,
}

impl CurlTransfer {
    /// Allocate a new easy handle.
    ///
    /// # Panics
    /// If libcurl cannot allocate a handle.
    pub fn new() -> Self {
        Self {
            easy: Easy2::new(Collector::default()),
        }
    }

    fn configure(&mut self, resolved: &ResolvedOptions) -> Result<(), curl::Error> {
        let options = resolved.options();
        let easy = &mut self.easy;

        easy.get_mut().capture = resolved.returns_transfer();

        if let Some(url) = &options.url {
            easy.url(url)?;
        }

        match options.method {
            HttpMethod::Get => easy.get(true)?,
            HttpMethod::Head => easy.nobody(true)?,
            HttpMethod::Post => easy.post(true)?,
            other => easy.custom_request(other.as_str())?,
        }

        if let Some(body) = &options.body {
            easy.post_fields_copy(body)?;
        }

        if !options.headers.is_empty() {
            let mut list = List::new();
            for line in resolved.header_lines() {
                list.append(&line)?;
            }
            easy.http_headers(list)?;
        }

        easy.timeout(resolved.timeout())?;
        if let Some(timeout) = options.connect_timeout {
            easy.connect_timeout(timeout)?;
        }
        if let Some(follow) = options.follow_location {
            easy.follow_location(follow)?;
        }
        if let Some(max) = options.max_redirects {
            easy.max_redirections(max)?;
        }
        if let Some(agent) = &options.user_agent {
            easy.useragent(agent)?;
        }
        if let Some(referer) = &options.referer {
            easy.referer(referer)?;
        }
        if let Some(verify) = options.verify_peer {
            easy.ssl_verify_peer(verify)?;
        }
        if let Some(verify) = options.verify_host {
            easy.ssl_verify_host(verify)?;
        }
        if let Some(path) = &options.ca_info {
            easy.cainfo(path)?;
        }
        if let Some(proxy) = &options.proxy {
            easy.proxy(proxy)?;
        }
        if let Some(encoding) = &options.accept_encoding {
            easy.accept_encoding(encoding)?;
        }
        Ok(())
    }
}

impl Default for CurlTransfer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transfer for CurlTransfer {
    fn reset(&mut self) {
        self.easy.reset();
        let collector = self.easy.get_mut();
        collector.capture = false;
        collector.body.clear();
    }

    fn apply(&mut self, options: &ResolvedOptions) -> Result<(), TransferError> {
        self.configure(options).map_err(TransferError::from)
    }

    fn perform(&mut self) -> Result<Vec<u8>, TransferError> {
        self.easy.get_mut().body.clear();
        self.easy.perform()?;
        Ok(std::mem::take(&mut self.easy.get_mut().body))
    }

    fn response_code(&mut self) -> Result<u32, TransferError> {
        Ok(self.easy.response_code()?)
    }

    fn details(&mut self) -> Result<ResponseDetails, TransferError> {
        let easy = &mut self.easy;
        Ok(ResponseDetails {
            url: easy.effective_url()?.map(str::to_string),
            content_type: easy.content_type()?.map(str::to_string),
            http_code: easy.response_code()?,
            header_size: easy.header_size()?,
            request_size: easy.request_size()?,
            filetime: easy.filetime()?,
            redirect_count: easy.redirect_count()?,
            total_time: secs(easy.total_time()?),
            namelookup_time: secs(easy.namelookup_time()?),
            connect_time: secs(easy.connect_time()?),
            pretransfer_time: secs(easy.pretransfer_time()?),
            starttransfer_time: secs(easy.starttransfer_time()?),
            redirect_time: secs(easy.redirect_time()?),
            size_upload: easy.upload_size()?,
            size_download: easy.download_size()?,
            download_content_length: easy.content_length_download()?,
            redirect_url: easy.redirect_url()?.map(str::to_string),
            primary_ip: easy.primary_ip()?.map(str::to_string),
            primary_port: easy.primary_port()?,
            local_ip: easy.local_ip()?.map(str::to_string),
            local_port: easy.local_port()?,
        })
    }
}

fn secs(d: Duration) -> f64 {
    d.as_secs_f64()
}
