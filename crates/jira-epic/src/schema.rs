//! Story and task definitions loaded from JSON story files.
//!
//! A story file looks like:
//!
//! ```json
//! {
//!   "summary": "Checkout flow",
//!   "description": "Let users pay",
//!   "tasks": [
//!     { "summary": "Cart page", "description": "" },
//!     { "summary": "Payment form", "assignee_id": "5b10ac8d82e05b22cc7d4ef5" }
//!   ]
//! }
//! ```
//!
//! `summary` is required on the story and on every task. `description`,
//! `tasks` and `assignee_id` are optional.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{EpicError, RecordLocation, Result};

/// A sub-task to be filed under its story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub summary: String,
    pub description: String,
    /// Overrides the configured default assignee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}

/// A story and the tasks it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Story {
    pub summary: String,
    pub description: String,
    pub tasks: Vec<Task>,
    /// Overrides the configured default assignee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}

impl Story {
    /// Build a story from already-decoded JSON.
    ///
    /// Fails with [`EpicError::MalformedInput`] naming the first offending
    /// record; never yields a partially populated story.
    pub fn parse(source: &Value) -> Result<Self> {
        let record = as_object(source, RecordLocation::Story)?;
        let summary = required_text(record, "summary", RecordLocation::Story)?;
        let description =
            optional_text(record, "description", RecordLocation::Story)?.unwrap_or_default();
        let assignee_id = optional_text(record, "assignee_id", RecordLocation::Story)?;

        let tasks = match record.get("tasks") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| Task::parse(item, index))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(EpicError::malformed(
                    RecordLocation::Story,
                    "`tasks` must be an array",
                ))
            }
        };

        Ok(Self {
            summary,
            description,
            tasks,
            assignee_id,
        })
    }

    /// Parse a story from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::parse(&value)
    }

    /// Load a story from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| EpicError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

impl Task {
    fn parse(source: &Value, index: usize) -> Result<Self> {
        let location = RecordLocation::Task(index);
        let record = as_object(source, location)?;
        Ok(Self {
            summary: required_text(record, "summary", location)?,
            description: optional_text(record, "description", location)?.unwrap_or_default(),
            assignee_id: optional_text(record, "assignee_id", location)?,
        })
    }
}

fn as_object(value: &Value, location: RecordLocation) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| EpicError::malformed(location, "expected a JSON object"))
}

fn optional_text(
    record: &Map<String, Value>,
    field: &str,
    location: RecordLocation,
) -> Result<Option<String>> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(EpicError::malformed(
            location,
            format!("`{field}` must be a string"),
        )),
    }
}

fn required_text(
    record: &Map<String, Value>,
    field: &str,
    location: RecordLocation,
) -> Result<String> {
    optional_text(record, field, location)?
        .filter(|text| !text.is_empty())
        .ok_or_else(|| EpicError::malformed(location, format!("missing `{field}`")))
}
