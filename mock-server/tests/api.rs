use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo, UploadedPart, SERVER_NAME};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

const BOUNDARY: &str = "-----------------------------28947758029299";

fn multipart_request(body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(body.to_string())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_method_query_and_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/echo?a=1&b=two")
                .header("x-trace", "abc")
                .body("<doc/>".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::SERVER], SERVER_NAME);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.path, "/echo");
    assert_eq!(echo.query.as_deref(), Some("a=1&b=two"));
    assert_eq!(echo.header("X-Trace"), Some("abc"));
    assert_eq!(echo.body, "<doc/>");
}

#[tokio::test]
async fn echo_accepts_options() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/echo")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "OPTIONS");
    assert!(echo.query.is_none());
}

// --- upload ---

#[tokio::test]
async fn upload_parses_file_and_field_parts() {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"a.txt\"; filename=\"a.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         hi\r\n\
         --{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"note\"\r\n\r\n\
         hello\r\n\
         --{BOUNDARY}--\r\n"
    );
    let resp = app().oneshot(multipart_request(&body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let parts: Vec<UploadedPart> = body_json(resp).await;
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].name.as_deref(), Some("a.txt"));
    assert_eq!(parts[0].file_name.as_deref(), Some("a.txt"));
    assert_eq!(parts[0].content_type.as_deref(), Some("text/plain"));
    assert_eq!(parts[0].data, "hi");
    assert_eq!(parts[1].name.as_deref(), Some("note"));
    assert!(parts[1].file_name.is_none());
    assert_eq!(parts[1].data, "hello");
}

#[tokio::test]
async fn upload_rejects_non_multipart() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload")
                .header(http::header::CONTENT_TYPE, "text/xml")
                .body("<doc/>".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
}

// --- status ---

#[tokio::test]
async fn status_answers_requested_code() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/status/418")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(body_bytes(resp).await, "status 418");
}

#[tokio::test]
async fn status_rejects_out_of_range_code() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/status/42")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- redirect ---

#[tokio::test]
async fn redirect_points_at_echo() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/redirect")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers()[http::header::LOCATION], "/echo?redirected=true");
}
