use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

use crate::error::{Error, Result};

pub type ToolCallId = String;

/// Lifecycle of a tool invocation. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Pending,
    Running,
    Success,
    Error,
}

impl ToolStatus {
    fn rank(self) -> u8 {
        match self {
            ToolStatus::Pending => 0,
            ToolStatus::Running => 1,
            ToolStatus::Success | ToolStatus::Error => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ToolStatus::Success | ToolStatus::Error)
    }

    /// Whether moving from `self` to `next` keeps the lifecycle monotonic.
    pub fn can_transition_to(self, next: ToolStatus) -> bool {
        self == next || next.rank() > self.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToolStatus::Pending => "pending",
            ToolStatus::Running => "running",
            ToolStatus::Success => "success",
            ToolStatus::Error => "error",
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result payload of a tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Text(String),
    Structured(Value),
}

impl ToolOutput {
    /// Text as-is, anything else pretty-printed as JSON.
    pub fn display_text(&self) -> String {
        match self {
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// One invocation of an external capability by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: ToolCallId,
    pub name: String,
    #[serde(default)]
    pub input: Map<String, Value>,
    pub status: ToolStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ToolOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
            status: ToolStatus::Pending,
            output: None,
            error: None,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    /// Build a call from a JSON input object; non-object values yield an empty input.
    pub fn from_json(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        let input = match input {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, name, input)
    }

    pub fn with_status(mut self, status: ToolStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_times(mut self, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Elapsed milliseconds between start and end, clamped at zero.
    pub fn duration_ms(&self) -> Option<u64> {
        let end = self.end_time?;
        let elapsed = (end - self.start_time).num_milliseconds();
        Some(elapsed.max(0) as u64)
    }

    /// Move to `next`, stamping an end time when the call becomes terminal.
    pub fn advance(&mut self, next: ToolStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(Error::InvalidTransition(format!(
                "tool call {} cannot move from {} to {}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        if next.is_terminal() && self.end_time.is_none() {
            self.end_time = Some(Utc::now());
        }
        Ok(())
    }

    /// Merge the fields present in `update`.
    ///
    /// Every other field is applied even when the status change is rejected;
    /// the rejection is reported through the returned error. An end time is
    /// only kept once the call is terminal.
    pub fn apply(&mut self, update: ToolCallUpdate) -> Result<()> {
        if let Some(input) = update.input {
            self.input = input;
        }
        if let Some(output) = update.output {
            self.output = Some(output);
        }
        if let Some(error) = update.error {
            self.error = Some(error);
        }
        let transition = match update.status {
            Some(status) => self.advance(status),
            None => Ok(()),
        };
        if let Some(end_time) = update.end_time {
            if self.status.is_terminal() {
                self.end_time = Some(end_time);
            } else {
                warn!(
                    target: "tool_call",
                    "Ignoring end time for tool call {} while it is {}", self.id, self.status
                );
            }
        }
        transition
    }
}

/// Partial set of tool call fields; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCallUpdate {
    pub input: Option<Map<String, Value>>,
    pub status: Option<ToolStatus>,
    pub output: Option<ToolOutput>,
    pub error: Option<String>,
    pub end_time: Option<DateTime<Utc>>,
}

impl ToolCallUpdate {
    pub fn status(status: ToolStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: ToolOutput) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }
}
