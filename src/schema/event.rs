//! Interaction event schema
//!
//! Events arrive from the capture layer as a chronologically ordered stream of
//! typed, timestamped records. Kind tags accept both snake_case names and the
//! single-letter codes emitted by the browser tracker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed alphabet of interaction symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Pointer movement (throttled by the tracker)
    #[serde(alias = "M", alias = "mouse_move")]
    Move,
    /// Answer selection, by pointer or keyboard
    #[serde(alias = "C")]
    Click,
    #[serde(alias = "H")]
    Hover,
    #[serde(alias = "S")]
    Scroll,
    /// Page lost visibility
    #[serde(alias = "T")]
    TabAway,
    /// Page regained visibility
    #[serde(alias = "R")]
    TabReturn,
    #[serde(alias = "SUBMIT")]
    Submit,
    #[serde(alias = "CLEAR")]
    Clear,
    /// Focus moved with Tab / arrow keys
    #[serde(alias = "K")]
    KeyboardNav,
    /// Any tag outside the alphabet; ignored by every metric
    #[serde(other)]
    Unknown,
}

impl EventKind {
    /// Symbols counted by the repetition metric (pointer-move noise excluded)
    pub fn is_meaningful(self) -> bool {
        matches!(
            self,
            EventKind::Click
                | EventKind::Hover
                | EventKind::Scroll
                | EventKind::TabAway
                | EventKind::TabReturn
        )
    }

    /// Symbols counted by the compression metric
    pub fn is_compressible(self) -> bool {
        matches!(self, EventKind::Click | EventKind::Hover | EventKind::Scroll)
    }

    pub fn is_recognized(self) -> bool {
        self != EventKind::Unknown
    }

    /// Short code used by the capture layer
    pub fn code(self) -> &'static str {
        match self {
            EventKind::Move => "M",
            EventKind::Click => "C",
            EventKind::Hover => "H",
            EventKind::Scroll => "S",
            EventKind::TabAway => "T",
            EventKind::TabReturn => "R",
            EventKind::Submit => "SUBMIT",
            EventKind::Clear => "CLEAR",
            EventKind::KeyboardNav => "K",
            EventKind::Unknown => "?",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How a click was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickMethod {
    #[serde(alias = "mouse", alias = "touch")]
    Pointer,
    Keyboard,
    #[serde(other)]
    Other,
}

/// A single captured interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Event symbol
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Capture time in epoch milliseconds
    pub timestamp: i64,
    /// Pointer x relative to the quiz area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Pointer y relative to the quiz area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Vertical scroll offset (scroll events)
    #[serde(
        default,
        alias = "scrollY",
        skip_serializing_if = "Option::is_none"
    )]
    pub scroll_y: Option<f64>,
    /// Trigger method (click events)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<ClickMethod>,
}

impl InteractionEvent {
    pub fn new(kind: EventKind, timestamp: i64) -> Self {
        Self {
            kind,
            timestamp,
            x: None,
            y: None,
            scroll_y: None,
            method: None,
        }
    }

    pub fn click(timestamp: i64) -> Self {
        Self::new(EventKind::Click, timestamp)
    }

    pub fn with_method(mut self, method: ClickMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn is_keyboard_click(&self) -> bool {
        self.kind == EventKind::Click && self.method == Some(ClickMethod::Keyboard)
    }
}

/// A completed quiz submission handed over by the quiz UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    /// Opaque session identifier
    #[serde(default)]
    pub session_id: String,
    /// Number of correct answers
    pub score: u32,
    /// Number of questions in the quiz
    pub total_questions: u32,
    /// Session start in epoch milliseconds
    pub started_at_ms: i64,
    /// Submission time in epoch milliseconds; "now" when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at_ms: Option<i64>,
    /// Frozen event stream
    #[serde(default)]
    pub events: Vec<InteractionEvent>,
}
