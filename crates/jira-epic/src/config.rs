//! Configuration for the Jira epic client.

use std::env;
use std::fmt;

use crate::error::{EpicError, Result};

const ENV_PROJECT: &str = "JIRA_PROJECT";
const ENV_EPIC_KEY: &str = "JIRA_EPIC_KEY";
const ENV_EMAIL: &str = "JIRA_EMAIL";
const ENV_TOKEN: &str = "JIRA_TOKEN";
const ENV_HOST: &str = "JIRA_HOST";
const ENV_ACCOUNT_ID: &str = "JIRA_ID";
const ENV_TIMEOUT_SECS: &str = "JIRA_TIMEOUT_SECS";

/// Default timeout for a single Jira request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved Jira settings.
///
/// Built once at startup and handed to the client; nothing in the library
/// reads the environment on its own.
#[derive(Clone)]
pub struct Config {
    /// Project key new issues are filed under (e.g. `PROJ`).
    pub project: String,
    /// Epic that new stories are parented to (e.g. `PROJ-42`).
    pub epic_key: String,
    /// Account email used for basic auth.
    pub email: String,
    /// API token paired with `email`.
    pub token: String,
    /// Jira host, e.g. `your-domain.atlassian.net`.
    pub host: String,
    /// Account id used as the default assignee.
    pub account_id: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| EpicError::Config(format!("{key} is not set")))
        };

        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                EpicError::Config(format!("{ENV_TIMEOUT_SECS} must be a number, got {raw:?}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            project: required(ENV_PROJECT)?,
            epic_key: required(ENV_EPIC_KEY)?,
            email: required(ENV_EMAIL)?,
            token: required(ENV_TOKEN)?,
            host: required(ENV_HOST)?,
            account_id: required(ENV_ACCOUNT_ID)?,
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the epic key belongs to the configured project.
    pub fn validate(&self) -> Result<()> {
        let prefix = self.epic_key.split('-').next().unwrap_or_default();
        if prefix == self.project {
            Ok(())
        } else {
            Err(EpicError::EpicProjectMismatch {
                epic_key: self.epic_key.clone(),
                project_key: self.project.clone(),
            })
        }
    }

    /// Base URL of the Jira instance, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}/")
        } else {
            format!("https://{host}/")
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("project", &self.project)
            .field("epic_key", &self.epic_key)
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .field("host", &self.host)
            .field("account_id", &self.account_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
