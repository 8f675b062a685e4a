//! End-to-end transfers against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives a real
//! `RequestExecutor` (libcurl underneath) against it. Covers configuration,
//! execution, response codes and transfer info over actual HTTP.

use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

use mock_server::Echo;
use transfer_core::{HttpMethod, OptionSet, RequestExecutor};

/// Start the mock server once for the whole test binary.
fn server() -> SocketAddr {
    static ADDR: OnceLock<SocketAddr> = OnceLock::new();
    *ADDR.get_or_init(|| {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run(listener).await
            })
            .unwrap();
        });
        addr
    })
}

fn url(path: &str) -> String {
    format!("http://{}{path}", server())
}

fn echo(exec: &mut RequestExecutor, options: OptionSet) -> Echo {
    exec.set_options(options).unwrap();
    let body = exec.execute().unwrap();
    serde_json::from_slice(body.as_bytes()).unwrap()
}

#[test]
fn get_returns_status_and_body() {
    let mut exec = RequestExecutor::new();
    assert_eq!(exec.response_code(), None);

    exec.set_options(OptionSet::get(&url("/"))).unwrap();
    let body = exec.execute().unwrap();

    assert_eq!(exec.response_code(), Some(200));
    assert_eq!(body.text(), "ok");
}

#[test]
fn error_status_is_not_a_transport_failure() {
    let mut exec = RequestExecutor::new();
    exec.set_options(OptionSet::get(&url("/status/404"))).unwrap();
    let body = exec.execute().unwrap();

    assert_eq!(exec.response_code(), Some(404));
    assert_eq!(body.text(), "status 404");
}

#[test]
fn closed_port_fails_with_curl_errno() {
    let mut exec = RequestExecutor::new();
    exec.set_options(OptionSet::get(&url("/"))).unwrap();
    exec.execute().unwrap();
    assert_eq!(exec.response_code(), Some(200));

    exec.set_options(OptionSet::get("http://127.0.0.1:1/")).unwrap();
    let err = exec.execute().unwrap_err();

    assert_ne!(err.code(), 0);
    let prefix = format!("curl_errno : {} curl_error_message : ", err.code());
    assert!(err.message().starts_with(&prefix), "{}", err.message());
    assert!(err.message().len() > prefix.len());
    assert_eq!(exec.response_code(), None);
}

#[test]
fn second_configuration_drops_first_headers() {
    let mut exec = RequestExecutor::new();
    let first = OptionSet {
        headers: vec![("X-First".to_string(), "1".to_string())],
        ..OptionSet::get(&url("/echo"))
    };
    let seen = echo(&mut exec, first);
    assert_eq!(seen.headers.get("x-first").map(String::as_str), Some("1"));

    let seen = echo(&mut exec, OptionSet::get(&url("/echo")));
    assert!(!seen.headers.contains_key("x-first"));
}

#[test]
fn post_sends_body() {
    let mut exec = RequestExecutor::new();
    let options = OptionSet {
        method: HttpMethod::Post,
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body: Some(br#"{"k":"v"}"#.to_vec()),
        ..OptionSet::get(&url("/echo"))
    };
    let seen = echo(&mut exec, options);

    assert_eq!(seen.method, "POST");
    assert_eq!(seen.body, r#"{"k":"v"}"#);
    assert_eq!(seen.headers["content-type"], "application/json");
}

#[test]
fn custom_methods_are_forwarded() {
    let mut exec = RequestExecutor::new();
    for method in [HttpMethod::Put, HttpMethod::Patch, HttpMethod::Delete] {
        let options = OptionSet {
            method,
            body: Some(b"x".to_vec()),
            ..OptionSet::get(&url("/echo"))
        };
        let seen = echo(&mut exec, options);
        assert_eq!(seen.method, method.as_str());
        assert_eq!(seen.body, "x");
    }
}

#[test]
fn get_with_body_is_refused_before_sending() {
    let mut exec = RequestExecutor::new();
    let options = OptionSet {
        body: Some(b"x".to_vec()),
        ..OptionSet::get(&url("/echo"))
    };
    let err = exec.set_options(options).unwrap_err();
    assert_eq!(err.code(), 43);

    // The handle was reset, so the next configuration starts clean.
    let seen = echo(&mut exec, OptionSet::get(&url("/echo")));
    assert_eq!(seen.method, "GET");
    assert!(seen.body.is_empty());
}

#[test]
fn binary_body_is_sent_unchanged() {
    let mut exec = RequestExecutor::new();
    let options = OptionSet {
        method: HttpMethod::Post,
        body: Some(vec![b'a', 0, b'b']),
        ..OptionSet::get(&url("/echo"))
    };
    let seen = echo(&mut exec, options);
    assert_eq!(seen.body.as_bytes(), b"a\0b");
}

#[test]
fn head_returns_empty_body() {
    let mut exec = RequestExecutor::new();
    let options = OptionSet {
        method: HttpMethod::Head,
        ..OptionSet::get(&url("/"))
    };
    exec.set_options(options).unwrap();
    let body = exec.execute().unwrap();

    assert_eq!(exec.response_code(), Some(200));
    assert!(body.is_empty());
}

#[test]
fn user_agent_is_forwarded() {
    let mut exec = RequestExecutor::new();
    let options = OptionSet {
        user_agent: Some("transfer-core-test".to_string()),
        ..OptionSet::get(&url("/echo"))
    };
    let seen = echo(&mut exec, options);
    assert_eq!(seen.headers["user-agent"], "transfer-core-test");
}

#[test]
fn short_timeout_aborts_transfer() {
    let mut exec = RequestExecutor::new();
    let options = OptionSet {
        timeout: Some(Duration::from_secs(1)),
        ..OptionSet::get(&url("/delay/3000"))
    };
    exec.set_options(options).unwrap();
    let err = exec.execute().unwrap_err();

    // CURLE_OPERATION_TIMEDOUT
    assert_eq!(err.code(), 28);
    assert_eq!(exec.response_code(), None);
}

#[test]
fn redirects_are_followed_only_when_asked() {
    let mut exec = RequestExecutor::new();
    exec.set_options(OptionSet::get(&url("/redirect"))).unwrap();
    exec.execute().unwrap();
    assert!(exec.response_code().is_some_and(|code| (300..400).contains(&code)));

    let options = OptionSet {
        follow_location: Some(true),
        ..OptionSet::get(&url("/redirect"))
    };
    exec.set_options(options).unwrap();
    let body = exec.execute().unwrap();
    assert_eq!(exec.response_code(), Some(200));
    assert_eq!(body.text(), "status 200");

    let details = exec.response_details().unwrap();
    assert_eq!(details.redirect_count, 1);
    assert_eq!(details.url.as_deref(), Some(url("/status/200").as_str()));
}

#[test]
fn details_describe_last_transfer() {
    let mut exec = RequestExecutor::new();
    exec.set_options(OptionSet::get(&url("/delay/10"))).unwrap();
    let body = exec.execute().unwrap();

    let details = exec.response_details().unwrap();
    assert_eq!(details.http_code, 200);
    assert_eq!(details.url.as_deref(), Some(url("/delay/10").as_str()));
    assert_eq!(details.content_type.as_deref(), Some("text/plain"));
    assert_eq!(details.size_download, body.len() as f64);
    assert_eq!(details.primary_ip.as_deref(), Some("127.0.0.1"));
    assert_eq!(details.primary_port, server().port());
    assert!(details.total_time > 0.0);
    assert!(details.header_size > 0);

    let map = details.to_map();
    assert_eq!(map["http_code"], 200);
}

#[test]
fn details_before_any_transfer_are_empty() {
    let mut exec = RequestExecutor::new();
    let details = exec.response_details().unwrap();
    assert_eq!(details.http_code, 0);
    assert_eq!(details.redirect_count, 0);
}
