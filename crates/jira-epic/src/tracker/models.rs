//! Jira REST API wire types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{IssueType, NewIssue};

/// Body of `POST /rest/api/2/issue`.
#[derive(Debug, Serialize)]
pub struct CreateIssueRequest<'a> {
    pub fields: IssueFields<'a>,
}

/// Fields of a new issue.
#[derive(Debug, Serialize)]
pub struct IssueFields<'a> {
    pub project: KeyRef<'a>,
    pub summary: &'a str,
    pub description: &'a str,
    #[serde(rename = "issuetype")]
    pub issue_type: NameRef,
    pub parent: KeyRef<'a>,
    pub assignee: IdRef<'a>,
}

/// `{"key": ...}` reference.
#[derive(Debug, Serialize)]
pub struct KeyRef<'a> {
    pub key: &'a str,
}

/// `{"id": ...}` reference.
#[derive(Debug, Serialize)]
pub struct IdRef<'a> {
    pub id: &'a str,
}

/// `{"name": ...}` reference.
#[derive(Debug, Serialize)]
pub struct NameRef {
    pub name: IssueType,
}

impl<'a> From<&'a NewIssue> for CreateIssueRequest<'a> {
    fn from(issue: &'a NewIssue) -> Self {
        Self {
            fields: IssueFields {
                project: KeyRef {
                    key: &issue.project,
                },
                summary: &issue.summary,
                description: &issue.description,
                issue_type: NameRef {
                    name: issue.issue_type,
                },
                parent: KeyRef { key: &issue.parent },
                assignee: IdRef {
                    id: &issue.assignee,
                },
            },
        }
    }
}

/// Issue reference returned by create and get.
///
/// `self_url` is only logged; get responses may omit it.
#[derive(Debug, Deserialize)]
pub struct IssueResponse {
    pub id: String,
    pub key: String,
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
}

/// Jira's error envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCollection {
    #[serde(default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}

impl ErrorCollection {
    /// Flatten into one line, or `None` when Jira said nothing useful.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        let parts: Vec<String> = self
            .error_messages
            .iter()
            .cloned()
            .chain(
                self.errors
                    .iter()
                    .map(|(field, message)| format!("{field}: {message}")),
            )
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}
