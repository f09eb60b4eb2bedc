//! Integration test: drive an axum router whose handler takes a `WebhookRequest` and returns a
//! `WebhookResponse`, the way an embedding fulfillment service would wire it.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    routing::post,
    Router,
};
use cx_webhook::{
    Event, MergeBehavior, ResponseMessage, RichContent, RichContents, WebhookRequest,
    WebhookResponse,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const REQUEST: &str = include_str!("fixtures/request.json");

async fn fulfill(req: WebhookRequest) -> WebhookResponse {
    match req.tag() {
        "greet" => {
            let who = req.session_id().unwrap_or("stranger");
            WebhookResponse::builder()
                .message(ResponseMessage::text([format!("Hello {}", who)]))
                .merge_behavior(MergeBehavior::Append)
                .build()
        }
        "cards" => {
            let mut contents = RichContents::new();
            contents.add_content(
                RichContent::new("button", "Hours", "See opening hours")
                    .with_event(Event::new("show-hours", req.language_code.clone())),
            );
            WebhookResponse::builder().message(contents).build()
        }
        _ => WebhookResponse::default(),
    }
}

fn app() -> Router {
    Router::new().route("/webhook", post(fulfill))
}

async fn call(body: impl Into<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .expect("build request"),
        )
        .await
        .expect("router call");
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, content_type, bytes.to_vec())
}

#[tokio::test]
async fn recorded_request_gets_text_reply() {
    let (status, content_type, body) = call(REQUEST).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let v: Value = serde_json::from_slice(&body).expect("parse JSON");
    assert_eq!(
        v,
        json!({"fulfillmentResponse": {
            "messages": [{"text": {"text": ["Hello caller-42"]}}],
            "mergeBehavior": "APPEND"
        }})
    );
}

#[tokio::test]
async fn rich_content_reply_shape() {
    let (status, _, body) =
        call(r#"{"fulfillmentInfo": {"tag": "cards"}, "languageCode": "en"}"#).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).expect("parse JSON");
    assert_eq!(
        v["fulfillmentResponse"]["messages"][0]["payload"]["richContent"][0][0],
        json!({
            "type": "button",
            "title": "Hours",
            "text": "See opening hours",
            "event": {"name": "show-hours", "languageCode": "en"}
        })
    );
}

#[tokio::test]
async fn empty_body_is_accepted() {
    let (status, _, body) = call(Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).expect("parse JSON");
    assert_eq!(v, json!({}));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let (status, _, body) = call(r#"{"text": "#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let msg = String::from_utf8(body).expect("utf8");
    assert!(msg.starts_with("decoding webhook payload"), "got {}", msg);
}

#[tokio::test]
async fn short_session_falls_back() {
    let (status, _, body) = call(
        r#"{"fulfillmentInfo": {"tag": "greet"}, "sessionInfo": {"session": "too/short/path"}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).expect("parse JSON");
    assert_eq!(
        v["fulfillmentResponse"]["messages"][0]["text"]["text"],
        json!(["Hello stranger"])
    );
}
