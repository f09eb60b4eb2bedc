//! Outbound webhook response and the family of fulfillment messages it carries.
//!
//! Wire shape: `{ "fulfillmentResponse": { "messages": [...], "mergeBehavior" }, "pageInfo",
//! "sessionInfo", "payload" }`. Each message is an object with exactly one known key
//! (`text`, `outputAudioText` or `payload`); there is no discriminant field.

use crate::error::{Result, WebhookError};
use crate::request::{is_false, PageInfo, SessionInfo};
use crate::rich_content::{RichContent, RichContents};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Text lines of a message, shared by inbound turns and outbound text messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Text {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub redacted_text: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub allow_playback_interruption: bool,
}

impl Text {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Let the end user barge in while this message plays.
    pub fn interruptible(mut self) -> Self {
        self.allow_playback_interruption = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Where synthesized speech comes from: `{"text": ...}` or `{"ssml": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioSource {
    Text(String),
    Ssml(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputAudioText {
    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_playback_interruption: bool,
    pub source: AudioSource,
}

impl OutputAudioText {
    pub fn ssml(markup: impl Into<String>) -> Self {
        Self {
            allow_playback_interruption: false,
            source: AudioSource::Ssml(markup.into()),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            allow_playback_interruption: false,
            source: AudioSource::Text(text.into()),
        }
    }

    pub fn interruptible(mut self) -> Self {
        self.allow_playback_interruption = true;
        self
    }
}

/// One renderable entry of `fulfillmentResponse.messages`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseMessage {
    /// `{"text": {...}}`
    Text(Text),
    /// `{"outputAudioText": {...}}`
    OutputAudioText(OutputAudioText),
    /// `{"payload": {...}}` with arbitrary custom JSON.
    Payload(Map<String, Value>),
    /// `{"payload": {"richContent": [[...]]}}`
    RichContents(RichContents),
}

impl ResponseMessage {
    pub fn text<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Text(Text::new(lines))
    }

    pub fn ssml(markup: impl Into<String>) -> Self {
        Self::OutputAudioText(OutputAudioText::ssml(markup))
    }

    pub fn payload(payload: Map<String, Value>) -> Self {
        Self::Payload(payload)
    }

    /// Rich-content message. Without a card the payload holds one empty row; with a card,
    /// the card is the first entry of that row.
    pub fn rich_contents(card: Option<RichContent>) -> Self {
        let mut contents = RichContents::new();
        if let Some(card) = card {
            contents.add_content(card);
        }
        Self::RichContents(contents)
    }
}

impl From<Text> for ResponseMessage {
    fn from(t: Text) -> Self {
        Self::Text(t)
    }
}

impl From<OutputAudioText> for ResponseMessage {
    fn from(o: OutputAudioText) -> Self {
        Self::OutputAudioText(o)
    }
}

impl From<RichContents> for ResponseMessage {
    fn from(r: RichContents) -> Self {
        Self::RichContents(r)
    }
}

impl Serialize for ResponseMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Text(t) => map.serialize_entry("text", t)?,
            Self::OutputAudioText(o) => map.serialize_entry("outputAudioText", o)?,
            Self::Payload(p) => map.serialize_entry("payload", p)?,
            Self::RichContents(r) => map.serialize_entry("payload", r)?,
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    text: Option<Text>,
    output_audio_text: Option<OutputAudioText>,
    payload: Option<Map<String, Value>>,
}

/// Typed rich contents when `payload` is exactly `{"richContent": [[card, ...]]}` and the cards
/// carry no fields beyond the typed ones; anything else stays a raw payload.
fn typed_rich_contents(payload: &Map<String, Value>) -> Option<RichContents> {
    if payload.len() != 1 || !payload.get("richContent").is_some_and(Value::is_array) {
        return None;
    }
    let raw = Value::Object(payload.clone());
    let contents: RichContents = serde_json::from_value(raw.clone()).ok()?;
    match serde_json::to_value(&contents) {
        Ok(v) if v == raw => Some(contents),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for ResponseMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = WireMessage::deserialize(deserializer)?;
        let present = [
            wire.text.is_some(),
            wire.output_audio_text.is_some(),
            wire.payload.is_some(),
        ]
        .iter()
        .filter(|k| **k)
        .count();
        if present > 1 {
            return Err(de::Error::custom(
                "message carries more than one of text, outputAudioText, payload",
            ));
        }
        if let Some(t) = wire.text {
            return Ok(Self::Text(t));
        }
        if let Some(o) = wire.output_audio_text {
            return Ok(Self::OutputAudioText(o));
        }
        match wire.payload {
            Some(p) => Ok(typed_rich_contents(&p)
                .map(Self::RichContents)
                .unwrap_or(Self::Payload(p))),
            None => Err(de::Error::custom(
                "message has none of text, outputAudioText, payload",
            )),
        }
    }
}

/// Whether returned messages replace or append to the ones the platform already queued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeBehavior {
    #[default]
    #[serde(rename = "MERGE_BEHAVIOR_UNSPECIFIED")]
    Unspecified,
    Append,
    Replace,
}

impl MergeBehavior {
    pub fn is_unspecified(&self) -> bool {
        *self == Self::Unspecified
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FulfillmentResponse {
    /// Render order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<ResponseMessage>,
    #[serde(skip_serializing_if = "MergeBehavior::is_unspecified")]
    pub merge_behavior: MergeBehavior,
}

impl FulfillmentResponse {
    pub fn push(&mut self, message: impl Into<ResponseMessage>) {
        self.messages.push(message.into());
    }
}

/// Wire response returned to the platform for one webhook call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_response: Option<FulfillmentResponse>,
    /// Page state the platform should persist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
    /// Session state the platform should persist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_info: Option<SessionInfo>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub payload: BTreeMap<String, String>,
}

impl WebhookResponse {
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::default()
    }

    /// Response with a single text message built from `lines`.
    pub fn text<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder().message(ResponseMessage::text(lines)).build()
    }

    /// Response with a single synthesized-speech message sourced from SSML.
    pub fn ssml(markup: impl Into<String>) -> Self {
        Self::builder().message(ResponseMessage::ssml(markup)).build()
    }

    /// Append a message in render order, creating the fulfillment response on first use.
    pub fn push_message(&mut self, message: impl Into<ResponseMessage>) -> &mut Self {
        self.fulfillment_response
            .get_or_insert_with(FulfillmentResponse::default)
            .push(message);
        self
    }

    pub fn messages(&self) -> &[ResponseMessage] {
        self.fulfillment_response
            .as_ref()
            .map(|f| f.messages.as_slice())
            .unwrap_or(&[])
    }

    /// Write compact JSON followed by a newline.
    pub fn encode<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer(&mut writer, self).map_err(WebhookError::Encode)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn encode_pretty<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(WebhookError::Encode)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(WebhookError::Encode)
    }

    pub fn decode<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(WebhookError::Decode)
    }

    /// Replace the fulfillment response with one interruptible text message.
    pub fn set_text_reply<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fulfillment_response = Some(FulfillmentResponse {
            messages: vec![Text::new(lines).interruptible().into()],
            merge_behavior: MergeBehavior::Unspecified,
        });
        self
    }

    /// Replace the fulfillment response with one interruptible SSML audio message.
    pub fn set_ssml_reply(&mut self, markup: impl Into<String>) -> &mut Self {
        self.fulfillment_response = Some(FulfillmentResponse {
            messages: vec![OutputAudioText::ssml(markup).interruptible().into()],
            merge_behavior: MergeBehavior::Unspecified,
        });
        self
    }

    /// [`set_text_reply`](Self::set_text_reply) and encode immediately. Terminal: further
    /// appends are not part of what was written.
    pub fn text_response<W, I, S>(&mut self, writer: W, lines: I) -> Result<()>
    where
        W: Write,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_text_reply(lines).encode(writer)
    }

    /// [`set_ssml_reply`](Self::set_ssml_reply) and encode immediately.
    pub fn ssml_response<W: Write>(&mut self, writer: W, markup: impl Into<String>) -> Result<()> {
        self.set_ssml_reply(markup).encode(writer)
    }
}

/// Owned builder, finalized once into a [`WebhookResponse`].
#[derive(Debug, Default)]
#[must_use]
pub struct ResponseBuilder {
    fulfillment: Option<FulfillmentResponse>,
    page_info: Option<PageInfo>,
    session_info: Option<SessionInfo>,
    payload: BTreeMap<String, String>,
}

impl ResponseBuilder {
    pub fn message(mut self, message: impl Into<ResponseMessage>) -> Self {
        self.fulfillment
            .get_or_insert_with(FulfillmentResponse::default)
            .push(message);
        self
    }

    pub fn messages<I>(self, messages: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ResponseMessage>,
    {
        messages.into_iter().fold(self, |b, m| b.message(m))
    }

    pub fn merge_behavior(mut self, merge: MergeBehavior) -> Self {
        self.fulfillment
            .get_or_insert_with(FulfillmentResponse::default)
            .merge_behavior = merge;
        self
    }

    pub fn page_info(mut self, page: PageInfo) -> Self {
        self.page_info = Some(page);
        self
    }

    pub fn session_info(mut self, session: SessionInfo) -> Self {
        self.session_info = Some(session);
        self
    }

    /// Set one session parameter for the platform to persist.
    pub fn session_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.session_info
            .get_or_insert_with(SessionInfo::default)
            .parameters
            .insert(name.into(), value.into());
        self
    }

    pub fn payload(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> WebhookResponse {
        WebhookResponse {
            fulfillment_response: self.fulfillment,
            page_info: self.page_info,
            session_info: self.session_info,
            payload: self.payload,
        }
    }
}
