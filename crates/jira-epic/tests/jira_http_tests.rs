//! Creation routine tests against a mocked Jira REST API.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jira_epic::{Config, EpicClient, EpicError, JiraClient, Outcome, Story};

fn config_for(server: &MockServer) -> Config {
    Config {
        project: "PROJ".to_string(),
        epic_key: "PROJ-1".to_string(),
        email: "dev@example.com".to_string(),
        token: "secret-token".to_string(),
        host: server.uri(),
        account_id: "acc-1".to_string(),
        timeout_secs: 5,
    }
}

fn client_for(server: &MockServer) -> EpicClient<JiraClient> {
    let config = config_for(server);
    let tracker = JiraClient::new(&config).unwrap();
    EpicClient::new(config, tracker)
}

fn story(summary: &str, tasks: &[&str]) -> Story {
    let tasks: Vec<_> = tasks
        .iter()
        .map(|t| json!({"summary": t, "description": format!("about {t}")}))
        .collect();
    Story::parse(&json!({"summary": summary, "description": "", "tasks": tasks})).unwrap()
}

/// Answer creates for `summary` under `parent` with `key`.
async fn accept(server: &MockServer, summary: &str, parent: &str, key: &str) {
    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .and(body_partial_json(json!({
            "fields": {"summary": summary, "parent": {"key": parent}}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": key.trim_start_matches("PROJ-"),
            "key": key
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Reject creates for `summary` with `status`.
async fn reject(server: &MockServer, summary: &str, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .and(body_partial_json(json!({"fields": {"summary": summary}})))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn post_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .count()
}

#[tokio::test]
async fn test_forbidden_story_does_not_abort_batch() {
    let server = MockServer::start().await;
    accept(&server, "A", "PROJ-1", "PROJ-2").await;
    accept(&server, "a1", "PROJ-2", "PROJ-3").await;
    reject(&server, "B", 403, "You do not have permission").await;
    accept(&server, "C", "PROJ-1", "PROJ-4").await;
    accept(&server, "c1", "PROJ-4", "PROJ-5").await;

    let epic = client_for(&server);
    let report = epic
        .create_stories(&[
            story("A", &["a1"]),
            story("B", &["b1"]),
            story("C", &["c1"]),
        ])
        .await;

    assert!(report.aborted.is_none());
    assert_eq!(report.results.len(), 3);
    assert!(report.results[0].is_complete());
    assert!(matches!(
        &report.results[1].story,
        Outcome::Failed { reason } if reason.contains("(403)")
    ));
    assert!(report.results[1].tasks.is_empty());
    assert_eq!(report.results[2].story_key(), Some("PROJ-4"));
    assert_eq!(report.results[2].task_keys(), vec![Some("PROJ-5")]);
    assert_eq!(post_count(&server).await, 5);
}

#[tokio::test]
async fn test_forbidden_task_does_not_block_siblings() {
    let server = MockServer::start().await;
    accept(&server, "S", "PROJ-1", "PROJ-2").await;
    accept(&server, "t1", "PROJ-2", "PROJ-3").await;
    reject(&server, "t2", 403, "You do not have permission").await;
    accept(&server, "t3", "PROJ-2", "PROJ-4").await;

    let epic = client_for(&server);
    let report = epic.create_stories(&[story("S", &["t1", "t2", "t3"])]).await;

    assert!(report.aborted.is_none());
    let result = &report.results[0];
    assert_eq!(
        result.task_keys(),
        vec![Some("PROJ-3"), None, Some("PROJ-4")]
    );
    assert_eq!(result.failed_tasks().count(), 1);
}

#[tokio::test]
async fn test_rate_limited_task_does_not_block_siblings() {
    let server = MockServer::start().await;
    accept(&server, "S", "PROJ-1", "PROJ-2").await;
    accept(&server, "t1", "PROJ-2", "PROJ-3").await;
    reject(&server, "t2", 429, "Rate limit exceeded").await;
    accept(&server, "t3", "PROJ-2", "PROJ-4").await;

    let epic = client_for(&server);
    let report = epic.create_stories(&[story("S", &["t1", "t2", "t3"])]).await;

    assert!(report.aborted.is_none());
    let result = &report.results[0];
    assert!(matches!(
        &result.tasks[1].outcome,
        Outcome::Failed { reason } if reason.contains("(429)")
    ));
    assert_eq!(
        result.task_keys(),
        vec![Some("PROJ-3"), None, Some("PROJ-4")]
    );
}

#[tokio::test]
async fn test_expired_credentials_keep_partial_results() {
    let server = MockServer::start().await;
    accept(&server, "A", "PROJ-1", "PROJ-2").await;
    reject(&server, "B", 401, "Unauthorized").await;

    let epic = client_for(&server);
    let report = epic
        .create_stories(&[story("A", &[]), story("B", &["b1"]), story("C", &[])])
        .await;

    assert!(matches!(
        report.aborted,
        Some(EpicError::Authentication { status: 401, .. })
    ));
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].story_key(), Some("PROJ-2"));
    assert_eq!(post_count(&server).await, 2);

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["results"][0]["story"]["key"], "PROJ-2");
    assert_eq!(value["results"][1]["story"]["status"], "failed");
    assert_eq!(value["aborted"], "Authentication failed (401): Unauthorized");
}

#[tokio::test]
async fn test_connect_error_kinds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/issue/PROJ-1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let tracker = JiraClient::new(&config).unwrap();
    let err = EpicClient::connect(config.clone(), tracker)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, EpicError::EpicNotFound { ref epic_key, .. } if epic_key == "PROJ-1"));

    drop(server);
    let tracker = JiraClient::new(&config).unwrap();
    let err = EpicClient::connect(config, tracker).await.err().unwrap();
    assert!(matches!(err, EpicError::Transport(_)));
}
