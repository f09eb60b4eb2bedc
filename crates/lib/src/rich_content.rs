//! Rich-content cards: rows of cards rendered by the platform's messenger integration.
//!
//! `RichContents` always owns at least one row once constructed through [`RichContents::new`],
//! so [`RichContents::add_content`] never writes to a missing row.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `{"richContent": [[card, ...], ...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichContents {
    rich_content: Vec<Vec<RichContent>>,
}

impl Default for RichContents {
    fn default() -> Self {
        Self::new()
    }
}

impl RichContents {
    /// One empty row, ready for cards.
    pub fn new() -> Self {
        Self {
            rich_content: vec![Vec::new()],
        }
    }

    /// Append a card to the first row.
    pub fn add_content(&mut self, card: RichContent) -> &mut Self {
        // decoded payloads may carry `"richContent": []`
        if self.rich_content.is_empty() {
            self.rich_content.push(Vec::new());
        }
        self.rich_content[0].push(card);
        self
    }

    /// Start a new row holding `cards`.
    pub fn push_row(&mut self, cards: Vec<RichContent>) -> &mut Self {
        self.rich_content.push(cards);
        self
    }

    pub fn rows(&self) -> &[Vec<RichContent>] {
        &self.rich_content
    }

    /// Total number of cards across all rows.
    pub fn card_count(&self) -> usize {
        self.rich_content.iter().map(Vec::len).sum()
    }
}

/// One card. `type`, `title` and `text` are always present on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichContent {
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    /// Event the platform raises when the card is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link: String,
}

impl RichContent {
    pub fn new(typ: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            typ: typ.into(),
            title: title.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.event = Some(event);
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,
    #[serde(rename = "type")]
    pub typ: String,
}

impl Icon {
    pub fn new(typ: impl Into<String>) -> Self {
        Self {
            color: String::new(),
            typ: typ.into(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
    pub name: String,
    #[serde(default)]
    pub language_code: String,
}

impl Event {
    pub fn new(name: impl Into<String>, language_code: impl Into<String>) -> Self {
        Self {
            parameters: BTreeMap::new(),
            name: name.into(),
            language_code: language_code.into(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}
