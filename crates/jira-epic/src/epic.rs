//! Creating stories and their sub-tasks under a Jira epic.

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{EpicError, Result};
use crate::report::{BatchReport, CreationResult, Outcome, TaskOutcome};
use crate::schema::{Story, Task};
use crate::tracker::{IssueRef, IssueTracker, IssueType, NewIssue};

/// Files stories under the configured epic.
///
/// Every call is made in order and awaited before the next one starts.
pub struct EpicClient<T> {
    config: Config,
    tracker: T,
}

impl<T: IssueTracker> EpicClient<T> {
    /// Wrap a tracker without contacting it.
    pub fn new(config: Config, tracker: T) -> Self {
        Self { config, tracker }
    }

    /// Wrap a tracker and check that the configured epic exists.
    ///
    /// # Errors
    /// [`EpicError::Authentication`] if the credentials are rejected,
    /// [`EpicError::Transport`] if Jira cannot be reached,
    /// [`EpicError::EpicNotFound`] for any other failure to fetch the epic.
    pub async fn connect(config: Config, tracker: T) -> Result<Self> {
        let client = Self::new(config, tracker);
        client.verify_epic().await?;
        Ok(client)
    }

    /// Check that the configured epic can be fetched.
    pub async fn verify_epic(&self) -> Result<IssueRef> {
        let epic_key = &self.config.epic_key;
        match self.tracker.get_issue(epic_key).await {
            Ok(epic) => {
                info!(epic = %epic.key, "Verified epic exists");
                Ok(epic)
            }
            Err(e) if e.is_fatal() || matches!(e, EpicError::Transport(_)) => Err(e),
            Err(e) => Err(EpicError::EpicNotFound {
                epic_key: epic_key.clone(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Create every story, then its tasks, strictly in input order.
    ///
    /// A story that fails is recorded and its tasks are skipped; later
    /// stories are still attempted. A task that fails is recorded and its
    /// siblings are still attempted. A fatal error stops the batch and is
    /// kept in [`BatchReport::aborted`] next to everything attempted so far.
    pub async fn create_stories(&self, stories: &[Story]) -> BatchReport {
        let mut report = BatchReport {
            results: Vec::with_capacity(stories.len()),
            aborted: None,
        };

        for story in stories {
            let (result, aborted) = self.create_story_with_sub_tasks(story).await;
            report.results.push(result);
            if let Some(e) = aborted {
                error!(story = %story.summary, error = %e, "Aborting batch");
                report.aborted = Some(e);
                break;
            }
        }

        let created = report.results.iter().filter(|r| r.story.is_created()).count();
        info!(
            created = created,
            total = stories.len(),
            "Created {created}/{} stories successfully",
            stories.len()
        );

        report
    }

    /// Create one story and, if that worked, each of its tasks.
    ///
    /// The second value is set when a fatal error cut the story short.
    pub async fn create_story_with_sub_tasks(
        &self,
        story: &Story,
    ) -> (CreationResult, Option<EpicError>) {
        let story_key = match self.create_story_within_epic(story).await {
            Ok(issue) => issue.key,
            Err(e) => {
                error!(story = %story.summary, error = %e, "Failed to create story");
                let result = CreationResult {
                    summary: story.summary.clone(),
                    story: Outcome::Failed {
                        reason: e.to_string(),
                    },
                    tasks: Vec::new(),
                };
                return (result, e.is_fatal().then_some(e));
            }
        };

        if story.tasks.is_empty() {
            warn!(story = %story.summary, key = %story_key, "No tasks found for story");
        }

        let (tasks, aborted) = self.create_sub_tasks_in_story(&story.tasks, &story_key).await;

        let result = CreationResult {
            summary: story.summary.clone(),
            story: Outcome::Created { key: story_key },
            tasks,
        };
        (result, aborted)
    }

    /// Create a single story parented to the configured epic.
    pub async fn create_story_within_epic(&self, story: &Story) -> Result<IssueRef> {
        let issue = self.new_issue(
            IssueType::Story,
            &story.summary,
            &story.description,
            &self.config.epic_key,
            story.assignee_id.as_deref(),
        );

        let created = self.tracker.create_issue(&issue).await?;
        info!(summary = %story.summary, key = %created.key, "Created story");
        Ok(created)
    }

    /// Create sub-tasks under `parent_key`, recording each outcome.
    ///
    /// Stops at the first fatal error, which is returned alongside the
    /// outcomes recorded up to and including the task that hit it.
    pub async fn create_sub_tasks_in_story(
        &self,
        tasks: &[Task],
        parent_key: &str,
    ) -> (Vec<TaskOutcome>, Option<EpicError>) {
        let mut outcomes = Vec::with_capacity(tasks.len());
        let mut aborted = None;

        for (index, task) in tasks.iter().enumerate() {
            let issue = self.new_issue(
                IssueType::SubTask,
                &task.summary,
                &task.description,
                parent_key,
                task.assignee_id.as_deref(),
            );

            let outcome = match self.tracker.create_issue(&issue).await {
                Ok(created) => {
                    info!(
                        summary = %task.summary,
                        key = %created.key,
                        parent = %parent_key,
                        "Created sub-task"
                    );
                    Outcome::Created { key: created.key }
                }
                Err(e) => {
                    error!(summary = %task.summary, error = %e, "Failed to create sub-task");
                    let reason = e.to_string();
                    if e.is_fatal() {
                        aborted = Some(e);
                    }
                    Outcome::Failed { reason }
                }
            };

            outcomes.push(TaskOutcome {
                index,
                summary: task.summary.clone(),
                outcome,
            });
            if aborted.is_some() {
                break;
            }
        }

        let failed = outcomes.iter().filter(|t| !t.outcome.is_created()).count();
        if failed > 0 {
            warn!(
                parent = %parent_key,
                "Failed to create {failed}/{} tasks",
                tasks.len()
            );
        }

        (outcomes, aborted)
    }

    fn new_issue(
        &self,
        issue_type: IssueType,
        summary: &str,
        description: &str,
        parent: &str,
        assignee: Option<&str>,
    ) -> NewIssue {
        NewIssue {
            project: self.config.project.clone(),
            issue_type,
            summary: summary.to_string(),
            description: description.to_string(),
            parent: parent.to_string(),
            assignee: assignee.unwrap_or(&self.config.account_id).to_string(),
        }
    }
}
