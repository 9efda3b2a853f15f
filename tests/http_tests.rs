use rvolunteer::api::http::HttpApi;
use rvolunteer::api::{ActivityApi, Session};
use rvolunteer::core::checkin::{CheckInFailure, classify_error};
use rvolunteer::errors::AppError;
use rvolunteer::models::application::{ApplicationStatus, ReviewAction};
use rvolunteer::models::role::Role;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Local backend answering exactly one request with a canned response.
/// The join handle yields the raw request it received.
async fn backend(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let task = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        request
    });

    (base_url, task)
}

/// Read the head, then as many body bytes as `content-length` announces.
async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending a request");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
    let body_len = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + body_len {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn api(base_url: &str, token: Option<&str>) -> HttpApi {
    let session = Session::new(base_url, token.map(str::to_string), Role::Student, None);
    HttpApi::new(session, Duration::from_secs(5))
}

#[tokio::test]
async fn test_checkin_posts_code_with_bearer_token() {
    let (url, server) = backend(
        "200 OK",
        r#"{"message":"Check-in successful.","checked_in_at":"2025-03-01T10:00:00Z"}"#,
    )
    .await;

    let receipt = api(&url, Some("tok")).checkin(3, "AB1234").await.unwrap();
    assert_eq!(receipt.message.as_deref(), Some("Check-in successful."));
    assert!(receipt.checked_in_at.is_some());

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/activities/3/checkin/ HTTP/1.1\r\n"));
    let lower = request.to_lowercase();
    assert!(lower.contains("authorization: bearer tok\r\n"));
    assert!(lower.contains("content-type: application/json\r\n"));
    assert!(request.ends_with(r#"{"code":"AB1234"}"#));
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let (url, server) = backend("200 OK", "[]").await;

    let apps = api(&url, None).my_applications().await.unwrap();
    assert!(apps.is_empty());

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/activities/applications/ HTTP/1.1\r\n"));
    assert!(!request.to_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn test_rejected_checkin_carries_backend_detail() {
    let (url, server) = backend(
        "400 Bad Request",
        r#"{"detail":["You have already checked in."]}"#,
    )
    .await;

    let err = api(&url, Some("tok")).checkin(3, "AB1234").await.unwrap_err();
    server.await.unwrap();

    match &err {
        AppError::Api { status, message } => {
            assert_eq!(*status, 400);
            assert_eq!(message, "You have already checked in.");
            assert_eq!(classify_error(message), CheckInFailure::AlreadyCheckedIn);
        }
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_without_body_uses_generic_message() {
    let (url, server) = backend("500 Internal Server Error", "").await;

    let err = api(&url, Some("tok")).activity(1).await.unwrap_err();
    server.await.unwrap();

    assert_eq!(
        err.api_message(),
        Some("Server error. Please try again later.")
    );
}

#[tokio::test]
async fn test_checkin_status_null_means_no_record() {
    let (url, server) = backend("200 OK", "null").await;

    let record = api(&url, Some("tok")).checkin_status(1).await.unwrap();
    assert!(record.is_none());

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/activities/1/checkin-status/ HTTP/1.1\r\n"));
}

#[tokio::test]
async fn test_checkin_status_not_found_means_no_record() {
    let (url, server) = backend("404 Not Found", r#"{"detail":"Not found."}"#).await;

    let record = api(&url, Some("tok")).checkin_status(1).await.unwrap();
    server.await.unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn test_checkin_status_record_is_parsed() {
    let (url, server) = backend(
        "200 OK",
        r#"{"id":5,"student":7,"activity":1,"attendance_status":"present","checked_in_at":"2025-03-01T09:15:00Z"}"#,
    )
    .await;

    let record = api(&url, Some("tok")).checkin_status(1).await.unwrap();
    server.await.unwrap();

    let record = record.expect("a present record");
    assert!(record.is_present());
    assert_eq!(record.student, 7);
}

#[tokio::test]
async fn test_paginated_list_is_unwrapped() {
    let (url, server) = backend(
        "200 OK",
        r#"{"count":1,"next":null,"previous":null,"results":[{"id":4,"activity":1,"studentid":7,"status":"approved"}]}"#,
    )
    .await;

    let apps = api(&url, Some("tok")).my_applications().await.unwrap();
    server.await.unwrap();

    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].id, 4);
    assert_eq!(apps[0].status, ApplicationStatus::Approved);
}

#[tokio::test]
async fn test_bare_array_list() {
    let (url, server) = backend(
        "200 OK",
        r#"[{"id":1,"activity":2,"studentid":7,"status":"pending"},{"id":2,"activity":2,"studentid":8,"status":"rejected"}]"#,
    )
    .await;

    let apps = api(&url, Some("tok")).activity_applications(2).await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("GET /api/activities/2/applications/ HTTP/1.1\r\n"));
    assert_eq!(apps.len(), 2);
    assert_eq!(apps[1].status, ApplicationStatus::Rejected);
}

#[tokio::test]
async fn test_review_sends_action_and_reason() {
    let (url, server) = backend(
        "200 OK",
        r#"{"id":9,"activity":1,"studentid":7,"status":"rejected","notes":"Full"}"#,
    )
    .await;

    let app = api(&url, Some("tok"))
        .review_application(9, ReviewAction::Reject, Some("Full".to_string()))
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert_eq!(app.status, ApplicationStatus::Rejected);
    assert!(request.starts_with("POST /api/activities/applications/9/review/ HTTP/1.1\r\n"));
    assert!(request.ends_with(r#"{"action":"reject","reason":"Full"}"#));
}

#[tokio::test]
async fn test_checkin_code_reads_code_field() {
    let (url, server) = backend("200 OK", r#"{"code":"XY9876"}"#).await;

    let code = api(&url, Some("tok")).checkin_code(1).await.unwrap();
    server.await.unwrap();
    assert_eq!(code, "XY9876");
}
