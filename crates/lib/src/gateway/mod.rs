//! Gateway: the HTTP boundary between the platform and the fulfillment model.
//!
//! The transport itself (server, routes, TLS) belongs to the embedding service. This module
//! only lets an axum handler take a [`WebhookRequest`](crate::WebhookRequest) as its body
//! extractor and return a [`WebhookResponse`](crate::WebhookResponse) directly.

mod adapters;
