//! Webhook contract for a conversational-agent platform: typed detect-intent requests,
//! typed fulfillment responses, and the helpers used to build them.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod gateway;
pub mod request;
pub mod response;
pub mod rich_content;
pub mod session;

pub use error::{Result, WebhookError};
pub use request::{
    FormInfo, FulfillmentInfo, IntentInfo, Messages, PageInfo, ParameterInfo, SessionInfo,
    WebhookRequest, WebhookRequests,
};
pub use response::{
    AudioSource, FulfillmentResponse, MergeBehavior, OutputAudioText, ResponseBuilder,
    ResponseMessage, Text, WebhookResponse,
};
pub use rich_content::{Event, Icon, RichContent, RichContents};
pub use session::{extract_session_id, SessionPath};
