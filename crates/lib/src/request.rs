//! Inbound webhook call: the detect-intent request the platform POSTs to the fulfillment service.
//!
//! Every field is optional on the wire. Missing fields decode to their zero value and zero
//! values are omitted again on encode, so a decoded request re-encodes to an equivalent object.

use crate::error::{Result, WebhookError};
use crate::response::Text;
use crate::session;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{Cursor, Read};

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}

pub(crate) fn is_zero(f: &f64) -> bool {
    *f == 0.0
}

/// Wire request: `{ "detectIntentResponseId", "intentInfo", "pageInfo", "sessionInfo", ... }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detect_intent_response_id: String,
    #[serde(skip_serializing_if = "IntentInfo::is_empty")]
    pub intent_info: IntentInfo,
    #[serde(skip_serializing_if = "PageInfo::is_empty")]
    pub page_info: PageInfo,
    #[serde(skip_serializing_if = "SessionInfo::is_empty")]
    pub session_info: SessionInfo,
    #[serde(skip_serializing_if = "FulfillmentInfo::is_empty")]
    pub fulfillment_info: FulfillmentInfo,
    /// Turns the platform already rendered before calling the webhook.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Messages>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub payload: Map<String, Value>,
    /// Raw end-user input for this turn.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub language_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntentInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_matched_intent: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub current_page: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(skip_serializing_if = "FormInfo::is_empty")]
    pub form_info: FormInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormInfo {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameter_info: Vec<ParameterInfo>,
}

/// One form slot on the current page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    /// Free label on the wire (e.g. "EMPTY", "INVALID", "FILLED"); not a closed set.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Value was captured during the current turn.
    #[serde(skip_serializing_if = "is_false")]
    pub just_collected: bool,
}

/// Session path plus the conversation-scoped parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionInfo {
    /// `projects/P/locations/L/agents/A/sessions/S`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub session: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FulfillmentInfo {
    /// Routing key selecting the fulfillment branch.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag: String,
}

/// A conversational turn the platform already queued or spoke.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Messages {
    #[serde(skip_serializing_if = "Text::is_empty")]
    pub text: Text,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub response_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
}

macro_rules! zero_check {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $ty {
                /// True when every field holds its zero value.
                pub fn is_empty(&self) -> bool {
                    *self == Self::default()
                }
            }
        )*
    };
}

zero_check!(IntentInfo, PageInfo, FormInfo, SessionInfo, FulfillmentInfo, Messages);

impl SessionInfo {
    /// Session identifier (segment 7 of the session path).
    pub fn session_id(&self) -> Result<&str> {
        session::extract_session_id(&self.session)
    }
}

impl WebhookRequest {
    /// Decode the first JSON value from `reader`. A stream with no value at all (no bytes or
    /// only whitespace) is an empty call and yields the zero request.
    pub fn decode<R: Read>(reader: R) -> Result<Self> {
        match serde_json::Deserializer::from_reader(reader)
            .into_iter::<Self>()
            .next()
        {
            Some(Ok(req)) => Ok(req),
            Some(Err(e)) => Err(WebhookError::Decode(e)),
            None => {
                log::debug!("webhook request body empty, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Decode an in-memory body with the same contract as [`WebhookRequest::decode`].
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Self::decode(body)
    }

    /// Fulfillment tag the platform attached to this call (empty when absent).
    pub fn tag(&self) -> &str {
        &self.fulfillment_info.tag
    }

    /// Session-scoped parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.session_info.parameters.get(name)
    }

    /// Form parameter on the current page by display name.
    pub fn form_parameter(&self, display_name: &str) -> Option<&ParameterInfo> {
        self.page_info
            .form_info
            .parameter_info
            .iter()
            .find(|p| p.display_name == display_name)
    }

    pub fn session_id(&self) -> Result<&str> {
        self.session_info.session_id()
    }
}

/// A recorded batch of webhook calls (JSON array), used for replay and fixture generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebhookRequests(pub Vec<WebhookRequest>);

impl WebhookRequests {
    pub fn decode<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(WebhookError::Decode)
    }

    /// Re-encode each request into its own byte stream, e.g. to feed as request bodies in tests.
    pub fn to_readers(&self) -> Result<Vec<Cursor<Vec<u8>>>> {
        log::debug!("splitting batch of {} webhook request(s)", self.0.len());
        self.0
            .iter()
            .map(|req| {
                let mut buf = serde_json::to_vec(req).map_err(WebhookError::Encode)?;
                buf.push(b'\n');
                Ok(Cursor::new(buf))
            })
            .collect()
    }

    /// Decode a batch and split it into per-request byte streams in one step.
    pub fn decode_to_readers<R: Read>(reader: R) -> Result<(Self, Vec<Cursor<Vec<u8>>>)> {
        let batch = Self::decode(reader)?;
        let readers = batch.to_readers()?;
        Ok((batch, readers))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WebhookRequest> {
        self.0.iter()
    }
}

impl IntoIterator for WebhookRequests {
    type Item = WebhookRequest;
    type IntoIter = std::vec::IntoIter<WebhookRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
