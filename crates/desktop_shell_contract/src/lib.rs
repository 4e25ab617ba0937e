//! Shared contract types between the desktop shell and the content documents it hosts.
//!
//! Hosted programs run in isolated frames and talk to the shell only through the small tagged
//! message protocol defined here: [`FrameMessage`] flows from content to shell and
//! [`ShellMessage`] flows back. Both are plain JSON objects discriminated by a `type` field.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Maximum accepted length of a program identifier.
pub const MAX_PROGRAM_ID_LEN: usize = 64;

/// Suffix appended to a program identifier to form its window identifier.
pub const WINDOW_ID_SUFFIX: &str = "-window";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Validation failures for [`ProgramId`].
pub enum ProgramIdError {
    /// The identifier was empty.
    #[error("program id must not be empty")]
    Empty,
    /// The identifier exceeded [`MAX_PROGRAM_ID_LEN`].
    #[error("program id `{0}` is longer than {MAX_PROGRAM_ID_LEN} characters")]
    TooLong(String),
    /// The identifier contained characters outside `[a-z0-9-]` or had a bad first/last char.
    #[error("invalid program id `{0}`; expected lowercase kebab-case")]
    Malformed(String),
}

/// Stable identifier of a program in the shell catalog (for example `notepad`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProgramId(String);

impl ProgramId {
    /// Returns a program identifier when `raw` is lowercase kebab-case.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramIdError`] when `raw` is empty, too long, or malformed.
    pub fn new(raw: impl Into<String>) -> Result<Self, ProgramIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ProgramIdError::Empty);
        }
        if raw.len() > MAX_PROGRAM_ID_LEN {
            return Err(ProgramIdError::TooLong(raw));
        }
        if !is_valid_program_id(&raw) {
            return Err(ProgramIdError::Malformed(raw));
        }
        Ok(Self(raw))
    }

    /// Creates an id without validation for trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier of the single window this program may own.
    pub fn window_key(&self) -> String {
        format!("{}{WINDOW_ID_SUFFIX}", self.0)
    }
}

impl std::fmt::Display for ProgramId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ProgramId {
    type Error = ProgramIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProgramId> for String {
    fn from(value: ProgramId) -> Self {
        value.0
    }
}

fn is_valid_program_id(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if !bytes[0].is_ascii_lowercase() || raw.ends_with('-') {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
/// Requests a hosted content document sends to the shell.
pub enum FrameMessage {
    /// Minimize the hosting window.
    #[serde(rename = "minimize-window")]
    MinimizeWindow,
    /// Close the hosting window.
    #[serde(rename = "close-window")]
    CloseWindow,
    /// Replace the hosting window's status line.
    #[serde(rename = "updateStatusBar")]
    UpdateStatusBar {
        /// New status text.
        text: String,
    },
    /// Open (or focus) another program.
    #[serde(rename = "open-app")]
    OpenApp {
        /// Program to open.
        app: ProgramId,
    },
    /// The content finished loading; the shell can drop its loading placeholder.
    #[serde(rename = "content-ready")]
    ContentReady,
    /// Any tag this shell does not understand. Always ignored.
    #[serde(other)]
    Unrecognized,
}

impl FrameMessage {
    /// Decodes a raw message payload.
    ///
    /// Payloads that are not objects, carry an unknown tag, or miss a required field decode to
    /// [`FrameMessage::Unrecognized`].
    pub fn from_value(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or(Self::Unrecognized)
    }

    /// Returns the wire tag, or `None` for [`FrameMessage::Unrecognized`].
    pub const fn tag(&self) -> Option<&'static str> {
        match self {
            Self::MinimizeWindow => Some("minimize-window"),
            Self::CloseWindow => Some("close-window"),
            Self::UpdateStatusBar { .. } => Some("updateStatusBar"),
            Self::OpenApp { .. } => Some("open-app"),
            Self::ContentReady => Some("content-ready"),
            Self::Unrecognized => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
/// Notifications the shell posts into a hosted content document.
pub enum ShellMessage {
    /// The hosting window now fills the desktop.
    #[serde(rename = "window:maximized")]
    WindowMaximized,
    /// The hosting window returned to its previous size.
    #[serde(rename = "window:unmaximized")]
    WindowUnmaximized,
}

impl ShellMessage {
    /// Returns the JSON payload posted to the content document.
    pub fn to_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
