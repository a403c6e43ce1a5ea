use std::sync::{Arc, Mutex};

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use ollama_chat::api::client::ClientSettings;
use ollama_chat::api::{ApiClient, ApiError, ChatApi, ChatRequest, ErrorKind};
use ollama_chat::core::controller::{Controller, Session, RESPONSE_FAILED};
use ollama_chat::core::message::{Message, Role};

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(ClientSettings::new(base_url)).expect("client builds")
}

fn models_body(ids: &[&str]) -> Value {
    json!({
        "object": "list",
        "data": ids
            .iter()
            .map(|id| json!({"id": id, "object": "model", "created": 1700000000, "owned_by": "ollama"}))
            .collect::<Vec<_>>(),
    })
}

fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-abc123",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "llama3",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ],
        "usage": {"prompt_tokens": 9, "completion_tokens": 4, "total_tokens": 13}
    })
}

/// A completions route that records every request body it receives.
fn recording_completions(reply: &'static str) -> (Router, Arc<Mutex<Vec<Value>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let router = Router::new().route(
        "/v1/chat/completions",
        post(move |Json(body): Json<Value>| {
            let recorder = Arc::clone(&recorder);
            async move {
                recorder.lock().unwrap().push(body);
                Json(completion_body(reply))
            }
        }),
    );
    (router, seen)
}

#[tokio::test]
async fn list_models_preserves_server_order_and_duplicates() {
    let app = Router::new().route(
        "/v1/models",
        get(|| async { Json(models_body(&["zephyr", "llama3", "zephyr"])) }),
    );
    let base_url = spawn_server(app).await;

    let models = client(&base_url).list_models().await.unwrap();
    let ids: Vec<_> = models.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["zephyr", "llama3", "zephyr"]);
    assert_eq!(models[0].owned_by.as_deref(), Some("ollama"));
    assert_eq!(models[0].created, Some(1_700_000_000));
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let app = Router::new().route(
        "/v1/models",
        get(|| async { Json(models_body(&["llama3"])) }),
    );
    let base_url = spawn_server(app).await;

    let models = client(&format!("{base_url}/")).list_models().await.unwrap();
    assert_eq!(models.len(), 1);
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let app = Router::new().route(
        "/v1/models",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "Internal server error: ollama unreachable"})),
            )
        }),
    );
    let base_url = spawn_server(app).await;

    let err = client(&base_url).list_models().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    match err {
        ApiError::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 500);
            assert!(body.contains("ollama unreachable"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_listing_is_a_parse_error() {
    let app = Router::new().route(
        "/v1/models",
        get(|| async { Json(json!({"object": "list", "models": []})) }),
    );
    let base_url = spawn_server(app).await;

    let err = client(&base_url).list_models().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn completion_returns_first_choice_and_usage() {
    let (app, seen) = recording_completions("hello");
    let base_url = spawn_server(app).await;

    let request = ChatRequest {
        model: "llama3".to_string(),
        messages: vec![
            Message::system("You are a helpful assistant."),
            Message::user("hi"),
        ],
        temperature: None,
        max_tokens: Some(64),
    };
    let completion = client(&base_url).create_completion(&request).await.unwrap();

    assert_eq!(completion.message, Message::assistant("hello"));
    assert_eq!(completion.finish_reason.as_deref(), Some("stop"));
    assert_eq!(completion.usage.map(|u| u.total_tokens), Some(13));

    let bodies = seen.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({
            "model": "llama3",
            "messages": [
                {"role": "system", "content": "You are a helpful assistant."},
                {"role": "user", "content": "hi"}
            ],
            "max_tokens": 64
        })
    );
}

#[tokio::test]
async fn completion_without_choices_is_a_parse_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({"id": "x", "choices": [], "usage": null})) }),
    );
    let base_url = spawn_server(app).await;

    let request = ChatRequest {
        model: "llama3".to_string(),
        messages: vec![Message::user("hi")],
        temperature: None,
        max_tokens: None,
    };
    let err = client(&base_url)
        .create_completion(&request)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn health_reports_status_and_version() {
    let app = Router::new().route(
        "/health",
        get(|| async { Json(json!({"status": "ok", "version": "1.0.0"})) }),
    );
    let base_url = spawn_server(app).await;

    let health = client(&base_url).health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, "1.0.0");
}

#[tokio::test]
async fn conversation_over_http_sends_one_system_prompt_per_request() {
    let (completions, seen) = recording_completions("hello");
    let app = completions.route(
        "/v1/models",
        get(|| async { Json(models_body(&["llama3", "mistral"])) }),
    );
    let base_url = spawn_server(app).await;

    let mut controller = Controller::new(Arc::new(client(&base_url)), Session::default());
    controller.initialize().await;
    assert_eq!(controller.session().selected_model(), Some("llama3"));

    controller.send_message("hi").await.unwrap();
    controller.send_message("and again").await.unwrap();

    let visible: Vec<_> = controller.session().visible_messages().cloned().collect();
    assert_eq!(
        visible,
        vec![
            Message::user("hi"),
            Message::assistant("hello"),
            Message::user("and again"),
            Message::assistant("hello"),
        ]
    );

    let bodies = seen.lock().unwrap();
    assert_eq!(bodies.len(), 2);
    for body in bodies.iter() {
        let messages = body["messages"].as_array().unwrap();
        let system_count = messages
            .iter()
            .filter(|m| m["role"] == Role::System.as_str())
            .count();
        assert_eq!(system_count, 1);
        assert_eq!(messages[0]["content"], "You are a helpful assistant.");
    }
    assert_eq!(bodies[1]["messages"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn failed_completion_over_http_keeps_the_user_turn() {
    let app = Router::new()
        .route(
            "/v1/models",
            get(|| async { Json(models_body(&["llama3"])) }),
        )
        .route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream timeout") }),
        );
    let base_url = spawn_server(app).await;

    let mut controller = Controller::new(Arc::new(client(&base_url)), Session::default());
    controller.initialize().await;
    controller.send_message("hi").await.unwrap();

    assert_eq!(controller.session().conversation().len(), 2);
    assert_eq!(controller.session().last_error(), Some(RESPONSE_FAILED));
    assert!(!controller.session().is_pending());
}
