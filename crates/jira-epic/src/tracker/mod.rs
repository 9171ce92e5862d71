//! Issue tracker abstraction.
//!
//! The creation routine only talks to [`IssueTracker`]; [`JiraClient`] is the
//! production implementation over the Jira Cloud REST API.

mod jira;
pub mod models;

pub use jira::JiraClient;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Kind of issue to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    /// A story filed under an epic.
    Story,
    /// A sub-task filed under a story.
    #[serde(rename = "Sub-task")]
    SubTask,
}

impl IssueType {
    /// Jira's name for this issue type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Story => "Story",
            Self::SubTask => "Sub-task",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to create one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    /// Project key (e.g. `PROJ`).
    pub project: String,
    pub issue_type: IssueType,
    pub summary: String,
    pub description: String,
    /// Key of the parent issue (the epic for stories, the story for sub-tasks).
    pub parent: String,
    /// Account id of the assignee.
    pub assignee: String,
}

/// An issue as identified by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    /// Numeric id as a string.
    pub id: String,
    /// Human-readable key (e.g. `PROJ-123`).
    pub key: String,
}

/// Remote issue tracker operations used by the epic client.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetch an existing issue by key.
    async fn get_issue(&self, key: &str) -> Result<IssueRef>;

    /// Create a new issue.
    async fn create_issue(&self, issue: &NewIssue) -> Result<IssueRef>;
}
