//! Creation outcomes and their rendering.

use std::fmt::Write as _;

use serde::{Serialize, Serializer};

use crate::error::{EpicError, Result};

/// Result of one create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The tracker assigned this key.
    Created { key: String },
    /// The request failed; `reason` is the error text.
    Failed { reason: String },
}

impl Outcome {
    /// Key of the created issue, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Created { key } => Some(key),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// Outcome of one task of a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutcome {
    /// Position of the task in its story.
    pub index: usize,
    pub summary: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Outcome of creating one story and its tasks.
///
/// When the story itself failed, `tasks` is empty: nothing was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreationResult {
    pub summary: String,
    pub story: Outcome,
    pub tasks: Vec<TaskOutcome>,
}

impl CreationResult {
    /// Key of the created story, if it was created.
    #[must_use]
    pub fn story_key(&self) -> Option<&str> {
        self.story.key()
    }

    /// Keys of the tasks, `None` where creation failed.
    #[must_use]
    pub fn task_keys(&self) -> Vec<Option<&str>> {
        self.tasks.iter().map(|task| task.outcome.key()).collect()
    }

    /// Tasks that were attempted and failed.
    pub fn failed_tasks(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.tasks.iter().filter(|task| !task.outcome.is_created())
    }

    /// Story and every task were created.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.story.is_created() && self.failed_tasks().next().is_none()
    }
}

/// Everything a batch run attempted.
///
/// `aborted` is set when a fatal error stopped the run; `results` still holds
/// every story attempted up to that point, including the one that hit it.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub results: Vec<CreationResult>,
    #[serde(serialize_with = "serialize_error")]
    pub aborted: Option<EpicError>,
}

impl BatchReport {
    /// No abort, and every story and task was created.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none() && self.results.iter().all(CreationResult::is_complete)
    }

    /// The results, or the fatal error if the run was cut short.
    pub fn into_result(self) -> Result<Vec<CreationResult>> {
        match self.aborted {
            Some(e) => Err(e),
            None => Ok(self.results),
        }
    }
}

#[allow(clippy::ref_option)]
fn serialize_error<S: Serializer>(
    error: &Option<EpicError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Render results as an indented tree, one line per story and task.
#[must_use]
pub fn render_text(results: &[CreationResult]) -> String {
    render_text_with(results, line)
}

/// Like [`render_text`], with a custom formatter for each item line.
pub fn render_text_with<F>(results: &[CreationResult], line: F) -> String
where
    F: Fn(&str, &Outcome) -> String,
{
    let mut out = String::new();

    for result in results {
        let _ = writeln!(out, "{}", line(&result.summary, &result.story));
        for task in &result.tasks {
            let _ = writeln!(out, "  {}", line(&task.summary, &task.outcome));
        }
    }

    let created = results.iter().filter(|r| r.story.is_created()).count();
    let _ = writeln!(out, "Created {created}/{} stories", results.len());
    out
}

fn line(summary: &str, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Created { key } => format!("✓ {key} {summary}"),
        Outcome::Failed { reason } => format!("✗ {summary}: {reason}"),
    }
}
