//! Session path parsing: `projects/P/locations/L/agents/A/sessions/S`.
//!
//! Only the segment count is checked. The literal tokens ("projects", "locations", ...) are
//! not validated, so any 8+ segment path yields segment 7 as the session id.

use crate::error::{Result, WebhookError};

const SESSION_SEGMENTS: usize = 8;

/// Return the session id (segment 7) of a session path.
pub fn extract_session_id(path: &str) -> Result<&str> {
    SessionPath::parse(path).map(|p| p.session)
}

/// Borrowed view over the resource ids in a session path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPath<'a> {
    pub project: &'a str,
    pub location: &'a str,
    pub agent: &'a str,
    pub session: &'a str,
}

impl<'a> SessionPath<'a> {
    pub fn parse(path: &'a str) -> Result<Self> {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() < SESSION_SEGMENTS {
            return Err(WebhookError::MalformedSession {
                segments: parts.len(),
            });
        }
        Ok(Self {
            project: parts[1],
            location: parts[3],
            agent: parts[5],
            session: parts[7],
        })
    }
}
