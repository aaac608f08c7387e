mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::*;
use github_issue_summarizer::api::{create_app, AppState};
use github_issue_summarizer::archive::{ArchiveDecoder, RepoFileEntry};
use github_issue_summarizer::cache::RepoCache;
use github_issue_summarizer::config::SummarizeMode;
use github_issue_summarizer::tools::ToolDispatcher;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

fn app(github: Arc<FakeGitHub>, temp_dir: &TempDir) -> Router {
    let dispatcher = dispatcher(
        github,
        Arc::new(FakeGenerator::new()),
        SummarizeMode::Url,
        temp_dir.path(),
    );
    create_app(AppState::new(Arc::new(dispatcher)))
}

async fn send(app: Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_list_tools_is_a_plain_array() {
    let temp_dir = TempDir::new().unwrap();
    let (status, body) = send(
        app(Arc::new(FakeGitHub::new()), &temp_dir),
        "POST",
        "/api/tools/list",
        "",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["summarizeIssues", "fetchRepoCode"]);
    assert_eq!(body[0]["parameters"]["url"]["type"], json!("string"));
}

#[tokio::test]
async fn test_execute_missing_parameters_is_bad_request() {
    let temp_dir = TempDir::new().unwrap();
    let github = Arc::new(FakeGitHub::new());
    let (status, body) = send(
        app(github.clone(), &temp_dir),
        "POST",
        "/api/tools/execute",
        r#"{"tool": "summarizeIssues"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], json!(400));
    assert_eq!(body["error"], json!("Bad Request"));
    assert_eq!(
        body["message"],
        json!("Invalid request: tool and parameters are required")
    );
    assert_eq!(github.calls(), 0);
}

#[tokio::test]
async fn test_execute_unknown_tool_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let (status, body) = send(
        app(Arc::new(FakeGitHub::new()), &temp_dir),
        "POST",
        "/api/tools/execute",
        r#"{"tool": "unknown", "parameters": {}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusCode"], json!(404));
    assert_eq!(body["message"], json!("Tool not found: unknown"));
}

#[tokio::test]
async fn test_execute_malformed_json_is_bad_request() {
    let temp_dir = TempDir::new().unwrap();
    let (status, body) = send(
        app(Arc::new(FakeGitHub::new()), &temp_dir),
        "POST",
        "/api/tools/execute",
        "{not json",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], json!(400));
}

#[tokio::test]
async fn test_execute_upstream_failure_is_an_ok_envelope() {
    let temp_dir = TempDir::new().unwrap();
    let (status, body) = send(
        app(Arc::new(FakeGitHub::new()), &temp_dir),
        "POST",
        "/api/tools/execute",
        r#"{"id": 9, "tool": "summarizeIssues",
            "parameters": {"url": "https://github.com/a/b/issues/1"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jsonrpc"], json!("2.0"));
    assert_eq!(body["id"], json!(9));
    assert_eq!(body["error"]["code"], json!(-32603));
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_execute_success_envelope() {
    let temp_dir = TempDir::new().unwrap();
    let github = Arc::new(FakeGitHub::new().with_issue(issue(1, "Bug", Some("It breaks"))));
    let (status, body) = send(
        app(github, &temp_dir),
        "POST",
        "/api/tools/execute",
        r#"{"tool": "summarizeIssues", "parameters": {"url": "https://github.com/a/b/issues/1"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(1));
    assert_eq!(body["result"]["id"], json!(1));
    assert_eq!(body["result"]["images"], json!([]));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_health_reports_cache_size() {
    let temp_dir = TempDir::new().unwrap();
    let (status, body) = send(
        app(Arc::new(FakeGitHub::new()), &temp_dir),
        "GET",
        "/api/health",
        "",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], json!("github-issue-summarizer"));
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["cachedRepositories"], json!(0));
}

#[tokio::test]
async fn test_health_ignores_expired_repositories() {
    let temp_dir = TempDir::new().unwrap();
    let cache = RepoCache::new(Duration::from_millis(30));
    let dispatcher = ToolDispatcher::new(
        Arc::new(FakeGitHub::new()),
        Arc::new(FakeGenerator::new()),
        ArchiveDecoder::new(1024, temp_dir.path()),
        cache.clone(),
        settings(SummarizeMode::Url),
    );
    let app = create_app(AppState::new(Arc::new(dispatcher)));

    let entry = RepoFileEntry {
        path: "r/lib.rs".to_string(),
        content: String::new(),
    };
    cache.put("owner/live", vec![entry]).await;
    let (_, body) = send(app.clone(), "GET", "/api/health", "").await;
    assert_eq!(body["cachedRepositories"], json!(1));

    tokio::time::sleep(Duration::from_millis(60)).await;
    let (_, body) = send(app, "GET", "/api/health", "").await;
    assert_eq!(body["cachedRepositories"], json!(0));
}
