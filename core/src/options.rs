//! Caller-supplied transfer options and their resolved, applied form.
//!
//! # Design
//! `OptionSet` is what a caller hands to `RequestExecutor::set_options`. It is
//! a closed struct rather than an open key/value map, so unknown keys are
//! rejected at the boundary (at compile time for Rust callers, by
//! `deny_unknown_fields` for JSON callers).
//!
//! `ResolvedOptions` is the only thing a `Transfer` ever applies. It can only
//! be produced by `OptionSet::resolve`, which forces body capture on, fills
//! in the default timeout and validates header values.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TransferError;
use crate::http::HttpMethod;

/// Timeout applied when the caller does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for a single transfer. Every field is optional; unset fields keep
/// libcurl's defaults, except `timeout` and `return_transfer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionSet {
    pub url: Option<String>,
    pub method: HttpMethod,
    /// Request headers as `(name, value)` pairs, sent in order.
    pub headers: Vec<(String, String)>,
    /// Request body. In JSON either a string or an array of byte values.
    #[serde(with = "bytes", skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<u8>>,
    /// Whole-transfer timeout. Encoded as integer seconds in JSON.
    #[serde(with = "secs", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
    #[serde(with = "secs", skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<Duration>,
    pub follow_location: Option<bool>,
    pub max_redirects: Option<u32>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub verify_peer: Option<bool>,
    pub verify_host: Option<bool>,
    pub ca_info: Option<PathBuf>,
    pub proxy: Option<String>,
    pub accept_encoding: Option<String>,
    /// Accepted for compatibility; always overridden to `true`.
    pub return_transfer: Option<bool>,
}

impl OptionSet {
    /// A `GET` of `url` with every other option left unset.
    pub fn get(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::default()
        }
    }

    /// Parse an option set from JSON, rejecting unknown keys.
    pub fn from_json(json: &str) -> Result<Self, TransferError> {
        serde_json::from_str(json).map_err(|e| TransferError::bad_argument(&e.to_string()))
    }

    /// Produce the configuration that will actually be applied.
    pub fn resolve(mut self) -> Result<ResolvedOptions, TransferError> {
        for (name, value) in &self.headers {
            validate_header(name, value)?;
        }
        if self.body.is_some() && matches!(self.method, HttpMethod::Get | HttpMethod::Head) {
            return Err(TransferError::bad_argument(&format!(
                "a request body cannot be sent with {}",
                self.method.as_str()
            )));
        }
        self.return_transfer = Some(true);
        self.timeout.get_or_insert(DEFAULT_TIMEOUT);
        Ok(ResolvedOptions { options: self })
    }
}

fn validate_header(name: &str, value: &str) -> Result<(), TransferError> {
    if name.trim().is_empty() {
        return Err(TransferError::bad_argument("empty header name"));
    }
    if name.contains([':', '\r', '\n']) {
        return Err(TransferError::bad_argument(&format!(
            "invalid header name: {name:?}"
        )));
    }
    if value.contains(['\r', '\n']) {
        return Err(TransferError::bad_argument(&format!(
            "invalid value for header {name}"
        )));
    }
    Ok(())
}

/// The effective configuration applied to a transfer handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    options: OptionSet,
}

impl ResolvedOptions {
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn timeout(&self) -> Duration {
        self.options.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Whether the response body is captured into memory. Always `true`.
    pub fn returns_transfer(&self) -> bool {
        self.options.return_transfer.unwrap_or(true)
    }

    /// Headers rendered as `Name: value` lines.
    pub fn header_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.options
            .headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
    }
}

/// Serde adapter for `Option<Duration>` as whole seconds.
mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}

/// Serde adapter for `Option<Vec<u8>>`: UTF-8 bodies travel as strings,
/// anything else as an array of bytes.
mod bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Body {
        Text(String),
        Raw(Vec<u8>),
    }

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(raw) => match std::str::from_utf8(raw) {
                Ok(text) => s.serialize_some(text),
                Err(_) => s.serialize_some(raw),
            },
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        Ok(Option::<Body>::deserialize(d)?.map(|body| match body {
            Body::Text(text) => text.into_bytes(),
            Body::Raw(raw) => raw,
        }))
    }
}
