//! Jira Cloud REST API client.
//!
//! API Documentation: <https://developer.atlassian.com/cloud/jira/platform/rest/v2/>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use tracing::{debug, instrument, warn};

use super::models::{CreateIssueRequest, ErrorCollection, IssueResponse};
use super::{IssueRef, IssueTracker, NewIssue};
use crate::config::Config;
use crate::error::{EpicError, Result};

/// Path segments of the issue resource, relative to the instance base URL.
const ISSUE_PATH: [&str; 4] = ["rest", "api", "2", "issue"];

/// Jira client authenticated with email + API token.
#[derive(Clone)]
pub struct JiraClient {
    client: Client,
    base_url: Url,
    email: String,
    token: String,
}

impl JiraClient {
    /// Create a new Jira client from resolved configuration.
    ///
    /// # Errors
    /// Returns error if the host is not a usable base URL or the HTTP client
    /// cannot be created.
    pub fn new(config: &Config) -> Result<Self> {
        let raw = config.base_url();
        let base_url = Url::parse(&raw)
            .map_err(|e| EpicError::Config(format!("invalid Jira host {raw:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(EpicError::Config(format!("invalid Jira host {raw:?}")));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            email: config.email.clone(),
            token: config.token.clone(),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Issue resource URL, with `key` appended as one escaped path segment.
    fn issue_url(&self, key: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(ISSUE_PATH).extend(key);
        }
        url
    }

    /// Turn a response into an issue reference or a typed error.
    async fn handle_response(response: Response) -> Result<IssueRef> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            let issue: IssueResponse = serde_json::from_str(&text).map_err(|e| {
                warn!(error = %e, body = %text, "Failed to parse Jira response");
                EpicError::Serialization(e)
            })?;
            debug!(key = %issue.key, url = ?issue.self_url, "Jira accepted request");
            return Ok(IssueRef {
                id: issue.id,
                key: issue.key,
            });
        }

        let message = serde_json::from_str::<ErrorCollection>(&text)
            .ok()
            .and_then(|errors| errors.summary())
            .unwrap_or(text);

        // 403 is a per-issue permission problem, not bad credentials.
        if status == StatusCode::UNAUTHORIZED {
            return Err(EpicError::Authentication {
                status: status.as_u16(),
                message,
            });
        }
        Err(EpicError::RemoteCreation {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    #[instrument(skip(self))]
    async fn get_issue(&self, key: &str) -> Result<IssueRef> {
        let url = self.issue_url(Some(key));
        debug!(url = %url, "GET request");

        let response = self
            .client
            .get(url)
            .basic_auth(&self.email, Some(&self.token))
            .query(&[("fields", "summary")])
            .send()
            .await?;

        Self::handle_response(response).await
    }

    #[instrument(skip(self, issue), fields(issue_type = %issue.issue_type, parent = %issue.parent))]
    async fn create_issue(&self, issue: &NewIssue) -> Result<IssueRef> {
        let url = self.issue_url(None);
        debug!(url = %url, summary = %issue.summary, "POST request");

        let response = self
            .client
            .post(url)
            .basic_auth(&self.email, Some(&self.token))
            .json(&CreateIssueRequest::from(issue))
            .send()
            .await?;

        Self::handle_response(response).await
    }
}
