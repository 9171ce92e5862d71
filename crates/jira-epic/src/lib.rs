//! Create Jira stories and sub-tasks under an existing epic.
//!
//! This crate provides:
//! - A JSON schema for stories and their tasks ([`Story`], [`Task`])
//! - Environment-driven configuration ([`Config`])
//! - An [`IssueTracker`] seam with a Jira REST implementation ([`JiraClient`])
//! - The creation routine itself ([`EpicClient`]) and its per-item report
//!
//! # Usage
//!
//! ```no_run
//! use jira_epic::{Config, EpicClient, JiraClient, Story};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let story = Story::from_json_file("stories/checkout.json")?;
//!
//! let tracker = JiraClient::new(&config)?;
//! let epic = EpicClient::connect(config, tracker).await?;
//! let results = epic.create_stories(&[story]).await.into_result()?;
//! print!("{}", jira_epic::report::render_text(&results));
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod epic;
pub mod error;
pub mod report;
pub mod schema;
pub mod tracker;

pub use config::Config;
pub use epic::EpicClient;
pub use error::{EpicError, RecordLocation, Result};
pub use report::{BatchReport, CreationResult, Outcome, TaskOutcome};
pub use schema::{Story, Task};
pub use tracker::{IssueRef, IssueTracker, IssueType, JiraClient, NewIssue};
