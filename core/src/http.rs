//! HTTP-facing value types: request method, captured body, transfer info.
//!
//! # Design
//! These are plain owned data so they can be handed across the FFI crate
//! without lifetime concerns. `ResponseDetails` mirrors libcurl's transfer
//! info using the familiar `curl_getinfo` key names (`http_code`,
//! `total_time`, ...), which is also the key set `to_map` produces.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

/// HTTP method for a transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

/// The response body captured in memory by a transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBody(Vec<u8>);

impl ResponseBody {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// The body as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Snapshot of libcurl's transfer info for the most recent transfer.
///
/// Times are in seconds. Sizes are in bytes; `download_content_length` is
/// `-1.0` when the peer did not announce a length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseDetails {
    pub url: Option<String>,
    pub content_type: Option<String>,
    pub http_code: u32,
    pub header_size: u64,
    pub request_size: u64,
    pub filetime: Option<i64>,
    pub redirect_count: u32,
    pub total_time: f64,
    pub namelookup_time: f64,
    pub connect_time: f64,
    pub pretransfer_time: f64,
    pub starttransfer_time: f64,
    pub redirect_time: f64,
    pub size_upload: f64,
    pub size_download: f64,
    pub download_content_length: f64,
    pub redirect_url: Option<String>,
    pub primary_ip: Option<String>,
    pub primary_port: u16,
    pub local_ip: Option<String>,
    pub local_port: u16,
}

impl ResponseDetails {
    /// Key/value view of the snapshot, keyed by field name.
    pub fn to_map(&self) -> BTreeMap<String, serde_json::Value> {
        self.clone().into()
    }
}

impl From<ResponseDetails> for BTreeMap<String, serde_json::Value> {
    fn from(details: ResponseDetails) -> Self {
        // Built field by field so the key set is fixed at compile time.
        let ResponseDetails {
            url,
            content_type,
            http_code,
            header_size,
            request_size,
            filetime,
            redirect_count,
            total_time,
            namelookup_time,
            connect_time,
            pretransfer_time,
            starttransfer_time,
            redirect_time,
            size_upload,
            size_download,
            download_content_length,
            redirect_url,
            primary_ip,
            primary_port,
            local_ip,
            local_port,
        } = details;

        let mut map = BTreeMap::new();
        map.insert("url".to_string(), json!(url));
        map.insert("content_type".to_string(), json!(content_type));
        map.insert("http_code".to_string(), json!(http_code));
        map.insert("header_size".to_string(), json!(header_size));
        map.insert("request_size".to_string(), json!(request_size));
        map.insert("filetime".to_string(), json!(filetime));
        map.insert("redirect_count".to_string(), json!(redirect_count));
        map.insert("total_time".to_string(), json!(total_time));
        map.insert("namelookup_time".to_string(), json!(namelookup_time));
        map.insert("connect_time".to_string(), json!(connect_time));
        map.insert("pretransfer_time".to_string(), json!(pretransfer_time));
        map.insert("starttransfer_time".to_string(), json!(starttransfer_time));
        map.insert("redirect_time".to_string(), json!(redirect_time));
        map.insert("size_upload".to_string(), json!(size_upload));
        map.insert("size_download".to_string(), json!(size_download));
        map.insert("download_content_length".to_string(), json!(download_content_length));
        map.insert("redirect_url".to_string(), json!(redirect_url));
        map.insert("primary_ip".to_string(), json!(primary_ip));
        map.insert("primary_port".to_string(), json!(primary_port));
        map.insert("local_ip".to_string(), json!(local_ip));
        map.insert("local_port".to_string(), json!(local_port));
        map
    }
}
