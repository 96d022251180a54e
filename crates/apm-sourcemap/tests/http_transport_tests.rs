//! Wire-level checks of `HttpTransport` against a local axum server.

mod helpers;

use apm_sourcemap::{ApmSourceMapPlugin, HttpTransport, PluginOptions, UploadError};
use axum::Router;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use helpers::{SOURCE_MAP, mock_options, single_chunk};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct ReceivedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

#[derive(Debug, Clone)]
struct ReceivedRequest {
    authorization: Option<String>,
    content_type: Option<String>,
    fields: Vec<ReceivedField>,
}

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

async fn receive(
    State(state): State<ServerState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, &'static str) {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap().to_vec();
        fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            data,
        });
    }

    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    state.received.lock().await.push(ReceivedRequest {
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        fields,
    });

    let body = if state.status.is_success() {
        "{}"
    } else {
        "invalid sourcemap"
    };
    (state.status, body)
}

/// Start a server on an ephemeral port; returns its upload URL
async fn spawn_server(status: StatusCode) -> (String, Arc<Mutex<Vec<ReceivedRequest>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/assets/v1/sourcemaps", post(receive))
        .with_state(ServerState {
            status,
            received: received.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/assets/v1/sourcemaps", addr), received)
}

fn plugin(url: String, secret: Option<&str>) -> ApmSourceMapPlugin {
    let options = PluginOptions {
        server_url: Some(url),
        secret: secret.map(str::to_string),
        ..mock_options()
    };
    ApmSourceMapPlugin::new(options)
        .unwrap()
        .with_transport(Arc::new(HttpTransport::new()))
}

#[tokio::test]
async fn test_multipart_body_on_the_wire() {
    let (url, received) = spawn_server(StatusCode::ACCEPTED).await;

    plugin(url, None)
        .upload_sourcemaps(&single_chunk())
        .await
        .unwrap();

    let received = received.lock().await;
    assert_eq!(received.len(), 1);
    let request = &received[0];

    assert_eq!(request.authorization, None);
    assert!(
        request
            .content_type
            .as_deref()
            .unwrap()
            .starts_with("multipart/form-data; boundary=")
    );

    let names: Vec<_> = request.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["sourcemap", "service_version", "bundle_filepath", "service_name"]
    );

    let sourcemap = &request.fields[0];
    assert_eq!(sourcemap.file_name.as_deref(), Some("app.js.map"));
    assert_eq!(sourcemap.content_type.as_deref(), Some("application/json"));
    assert_eq!(sourcemap.data, SOURCE_MAP.as_bytes());

    assert_eq!(request.fields[1].data, b"mock-version");
    assert_eq!(request.fields[2].data, b"/mock-folder/app.js");
    assert_eq!(request.fields[3].data, b"mock-service");
}

#[tokio::test]
async fn test_bearer_token_on_the_wire() {
    let (url, received) = spawn_server(StatusCode::OK).await;

    plugin(url, Some("mock-secret"))
        .upload_sourcemaps(&single_chunk())
        .await
        .unwrap();

    let received = received.lock().await;
    assert_eq!(
        received[0].authorization.as_deref(),
        Some("Bearer mock-secret")
    );
}

#[tokio::test]
async fn test_rejection_status() {
    let (url, received) = spawn_server(StatusCode::BAD_REQUEST).await;

    let err = plugin(url, None)
        .upload_sourcemaps(&single_chunk())
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::Rejected { status: 400, .. }));
    assert_eq!(received.lock().await.len(), 1);
}

#[tokio::test]
async fn test_retries_rebuild_the_body() {
    let (url, received) = spawn_server(StatusCode::INTERNAL_SERVER_ERROR).await;
    let options = PluginOptions {
        server_url: Some(url),
        retry_count: Some(2),
        ..mock_options()
    };
    let plugin = ApmSourceMapPlugin::new(options).unwrap();

    let err = plugin.upload_sourcemaps(&single_chunk()).await.unwrap_err();
    assert!(matches!(err, UploadError::Rejected { status: 500, .. }));

    let received = received.lock().await;
    assert_eq!(received.len(), 3);
    for request in received.iter() {
        assert_eq!(request.fields.len(), 4);
        assert_eq!(request.fields[0].data, SOURCE_MAP.as_bytes());
    }
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // Bind then drop a listener so the port is closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = plugin(format!("http://{}/assets/v1/sourcemaps", addr), None)
        .upload_sourcemaps(&single_chunk())
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Transport(_)));
}
