//! axum glue: `WebhookRequest` as a body extractor, `WebhookResponse` as a JSON response.

use crate::error::WebhookError;
use crate::request::WebhookRequest;
use crate::response::WebhookResponse;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

#[async_trait]
impl<S> FromRequest<S> for WebhookRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    /// Buffer the body and decode it. An empty body is the zero request.
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        WebhookRequest::from_slice(&body).map_err(|e| {
            log::warn!("rejecting webhook call: {}", e);
            e.into_response()
        })
    }
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        match self.to_vec() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(e) => e.into_response(),
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, self.to_string()).into_response()
    }
}
