//! End-to-end tests for the agent configuration API.
//!
//! Requests go through `tower::ServiceExt::oneshot` straight into the router.
//! Agents come from a stub factory whose behavior is picked by the prompt:
//! `sleep` runs for seconds, `fail` errors, `silent` returns nothing, and
//! anything else is echoed back. Configs named `Slow Build` take a while to
//! construct.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use agentforge_core::{
    Agent, AgentConfig, AgentError, AgentFactory, AgentType, InMemoryBackend, JsonFileBackend,
};
use agentforge_server::agent_runner::AgentRunner;
use agentforge_server::router::build_router;
use agentforge_server::state::AppState;

// ---------------------------------------------------------------------------
// Stub agents
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Tracker {
    builds: AtomicUsize,
    slow_run_finished: AtomicBool,
}

struct StubAgent {
    tracker: Arc<Tracker>,
}

#[async_trait]
impl Agent for StubAgent {
    async fn run(&self, prompt: &str) -> Result<String, AgentError> {
        match prompt {
            "sleep" => {
                tokio::time::sleep(Duration::from_secs(2)).await;
                self.tracker.slow_run_finished.store(true, Ordering::SeqCst);
                Ok("woke up".to_string())
            }
            "fail" => Err(AgentError::Failed("stub agent failed".to_string())),
            "silent" => Ok(String::new()),
            other => Ok(format!("stub: {}", other)),
        }
    }
}

struct StubFactory {
    tracker: Arc<Tracker>,
}

#[async_trait]
impl AgentFactory for StubFactory {
    fn build_configured(&self, config: &AgentConfig) -> Result<Arc<dyn Agent>, AgentError> {
        if config.name == "Slow Build" {
            std::thread::sleep(Duration::from_millis(300));
        }
        self.tracker.builds.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(StubAgent {
            tracker: Arc::clone(&self.tracker),
        }))
    }

    async fn build_session(&self, _agent_type: AgentType) -> Result<Arc<dyn Agent>, AgentError> {
        Ok(Arc::new(StubAgent {
            tracker: Arc::clone(&self.tracker),
        }))
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

struct TestApp {
    router: Router,
    state: AppState,
    tracker: Arc<Tracker>,
}

fn test_app_with(backend: Box<dyn agentforge_core::ConfigPersistence>, max_runs: usize) -> TestApp {
    let tracker = Arc::new(Tracker::default());
    let state = AppState::with_parts(
        backend,
        Arc::new(StubFactory {
            tracker: Arc::clone(&tracker),
        }),
        AgentRunner::new(max_runs, Duration::from_millis(200)),
    )
    .expect("failed to create AppState");
    TestApp {
        router: build_router(state.clone()),
        state,
        tracker,
    }
}

fn test_app() -> TestApp {
    test_app_with(Box::new(InMemoryBackend::new()), 4)
}

fn temp_store_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("agentforge_test_{}", uuid::Uuid::new_v4()))
        .join("agents.json")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, json)
}

async fn request_json(app: &Router, method: &str, path: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
    )
    .await
}

async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    request_json(app, "POST", path, body).await
}

async fn put_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    request_json(app, "PUT", path, body).await
}

async fn post_empty(app: &Router, path: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn get_json(app: &Router, path: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(path).body(Body::empty()).unwrap()).await
}

async fn delete(app: &Router, path: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("DELETE")
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

fn multipart_request(path: &str, field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let boundary = "agentforgeboundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/json\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri(path)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Creates a config and returns its id.
async fn create_agent(app: &Router, body: Value) -> String {
    let (status, resp) = post_json(app, "/api/agent/create", body).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {:?}", resp);
    resp["agent_id"].as_str().unwrap().to_string()
}

fn research_bot() -> Value {
    json!({
        "name": "Research Bot",
        "description": "Finds things out",
        "tools": ["web_search", "browser_use", "terminate"],
        "system_prompt": "You research topics thoroughly.",
        "max_steps": 12,
        "temperature": 0.3
    })
}

// ---------------------------------------------------------------------------
// Health, catalogs and routing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_counts() {
    let app = test_app();
    create_agent(&app.router, research_bot()).await;

    let (status, body) = get_json(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["agents_count"], 1);
    assert_eq!(body["active_instances"], 0);
    assert_eq!(body["active_sessions"], 0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = test_app();
    let (status, body) = get_json(&app.router, "/api/nothing/here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Endpoint not found"}));
}

#[tokio::test]
async fn catalogs_list_registry_entries() {
    let app = test_app();

    let (status, body) = get_json(&app.router, "/api/tools").await;
    assert_eq!(status, StatusCode::OK);
    let tools = body["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 8);
    let terminate = tools.iter().find(|t| t["id"] == "terminate").unwrap();
    assert!(terminate["name"].is_string());
    assert!(terminate["category"].is_string());
    assert!(terminate.get("class_name").is_none());

    let (status, body) = get_json(&app.router, "/api/templates").await;
    assert_eq!(status, StatusCode::OK);
    let templates = body["templates"].as_array().unwrap();
    assert_eq!(templates.len(), 5);
    assert!(templates.iter().all(|t| t["max_steps"].as_u64().unwrap() > 0));

    let (status, body) = get_json(&app.router, "/api/agent-types").await;
    assert_eq!(status, StatusCode::OK);
    let types: Vec<&str> = body["agent_types"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["manus", "mcp", "data_analysis"]);
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_fills_defaults() {
    let app = test_app();
    let (status, body) = post_json(
        &app.router,
        "/api/agent/create",
        json!({"name": "T", "description": "d", "tools": ["terminate"]}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let agent_id = body["agent_id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(agent_id).is_ok());
    assert_eq!(body["message"], "Agent created successfully");

    let config = &body["config"];
    assert_eq!(config["id"], agent_id);
    assert_eq!(config["tools"], json!(["terminate"]));
    assert_eq!(config["system_prompt"], "You are a helpful AI assistant.");
    assert_eq!(config["max_steps"], 20);
    assert_eq!(config["temperature"], 0.7);
    assert_eq!(config["created_at"], config["updated_at"]);
}

#[tokio::test]
async fn create_requires_name_description_and_tools() {
    let app = test_app();
    let (status, body) = post_json(
        &app.router,
        "/api/agent/create",
        json!({"name": "T", "tools": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing required field: description"}));
}

#[tokio::test]
async fn create_rejects_unknown_tool_without_storing() {
    let app = test_app();
    let (status, body) = post_json(
        &app.router,
        "/api/agent/create",
        json!({"name": "T", "description": "d", "tools": ["terminate", "teleport"]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown tool: teleport");

    let (_, list) = get_json(&app.router, "/api/agents").await;
    assert_eq!(list["agents"], json!([]));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        Request::builder()
            .method("POST")
            .uri("/api/agent/create")
            .header("content-type", "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn get_unknown_or_malformed_id_is_404() {
    let app = test_app();
    let (status, body) = get_json(&app.router, "/api/agent/not-a-uuid").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Agent not found"}));

    let missing = format!("/api/agent/{}", uuid::Uuid::new_v4());
    let (status, _) = get_json(&app.router, &missing).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let app = test_app();
    let id = create_agent(&app.router, research_bot()).await;
    let (_, before) = get_json(&app.router, &format!("/api/agent/{}", id)).await;

    let (status, body) = put_json(
        &app.router,
        &format!("/api/agent/{}", id),
        json!({"description": "Finds even more things out"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Agent updated successfully");

    let (_, after) = get_json(&app.router, &format!("/api/agent/{}", id)).await;
    let (before, after) = (&before["config"], &after["config"]);
    assert_eq!(after["description"], "Finds even more things out");
    for field in ["id", "name", "tools", "system_prompt", "max_steps", "temperature", "created_at"] {
        assert_eq!(after[field], before[field], "field {} changed", field);
    }
}

#[tokio::test]
async fn update_with_unknown_tool_changes_nothing() {
    let app = test_app();
    let id = create_agent(&app.router, research_bot()).await;
    let path = format!("/api/agent/{}", id);
    let (_, before) = get_json(&app.router, &path).await;

    let (status, body) = put_json(&app.router, &path, json!({"name": "X", "tools": ["nope"]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown tool: nope");

    let (_, after) = get_json(&app.router, &path).await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn update_unknown_agent_is_404() {
    let app = test_app();
    let (status, _) = put_json(
        &app.router,
        &format!("/api/agent/{}", uuid::Uuid::new_v4()),
        json!({"name": "X"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let app = test_app();
    let id = create_agent(&app.router, research_bot()).await;
    let path = format!("/api/agent/{}", id);

    let (status, body) = delete(&app.router, &path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Agent deleted successfully");

    let (status, _) = get_json(&app.router, &path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = delete(&app.router, &path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_summaries() {
    let app = test_app();
    let first = create_agent(&app.router, research_bot()).await;
    let second = create_agent(
        &app.router,
        json!({"name": "Coder", "description": "writes code", "tools": ["python_execute"]}),
    )
    .await;

    let (status, body) = get_json(&app.router, "/api/agents").await;
    assert_eq!(status, StatusCode::OK);
    let agents = body["agents"].as_array().unwrap();
    assert_eq!(agents.len(), 2);
    let ids: Vec<&str> = agents.iter().map(|a| a["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&first.as_str()) && ids.contains(&second.as_str()));
    // Summaries carry no prompt or tuning fields.
    assert!(agents[0].get("system_prompt").is_none());
    assert!(agents[0].get("tools").is_some());
}

#[tokio::test]
async fn store_file_survives_restart() {
    let path = temp_store_path();
    let app = test_app_with(Box::new(JsonFileBackend::new(path.clone())), 4);
    let id = create_agent(&app.router, research_bot()).await;
    let (_, original) = get_json(&app.router, &format!("/api/agent/{}", id)).await;
    drop(app);

    let reopened = test_app_with(Box::new(JsonFileBackend::new(path.clone())), 4);
    let (status, reloaded) = get_json(&reopened.router, &format!("/api/agent/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reloaded, original);

    if let Some(dir) = path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}

// ---------------------------------------------------------------------------
// Test runs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_run_uses_default_prompt() {
    let app = test_app();
    let id = create_agent(&app.router, research_bot()).await;

    let (status, body) = post_empty(&app.router, &format!("/api/agent/{}/test", id)).await;
    assert_eq!(status, StatusCode::OK, "{:?}", body);
    assert_eq!(
        body["result"],
        "stub: Hello! Please introduce yourself and list your capabilities."
    );
    assert_eq!(body["message"], "Test completed successfully");
}

#[tokio::test]
async fn test_run_rejects_blank_prompt() {
    let app = test_app();
    let id = create_agent(&app.router, research_bot()).await;
    let (status, body) = post_json(
        &app.router,
        &format!("/api/agent/{}/test", id),
        json!({"prompt": "   "}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Prompt cannot be empty");
}

#[tokio::test]
async fn test_run_on_missing_agent_is_404() {
    let app = test_app();
    let (status, _) = post_empty(
        &app.router,
        &format!("/api/agent/{}/test", uuid::Uuid::new_v4()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_run_timeout_cancels_the_agent() {
    let app = test_app();
    let id = create_agent(&app.router, research_bot()).await;

    let (status, body) = post_json(
        &app.router,
        &format!("/api/agent/{}/test", id),
        json!({"prompt": "sleep"}),
    )
    .await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body, json!({"error": "Test timed out"}));

    // The stub would finish after two seconds had it not been aborted.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(!app.tracker.slow_run_finished.load(Ordering::SeqCst));
    assert_eq!(app.state.runner.in_flight(), 0);
}

#[tokio::test]
async fn test_run_agent_failure_is_500() {
    let app = test_app();
    let id = create_agent(&app.router, research_bot()).await;
    let (status, body) = post_json(
        &app.router,
        &format!("/api/agent/{}/test", id),
        json!({"prompt": "fail"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "stub agent failed");
}

#[tokio::test]
async fn test_run_rejected_when_capacity_exhausted() {
    let app = test_app_with(Box::new(InMemoryBackend::new()), 1);
    let id = create_agent(&app.router, research_bot()).await;
    let _held = app.state.runner.try_reserve().unwrap();

    let (status, body) = post_empty(&app.router, &format!("/api/agent/{}/test", id)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Agent capacity exhausted, retry later");
}

#[tokio::test]
async fn cached_instance_is_reused_until_update() {
    let app = test_app();
    let id = create_agent(&app.router, research_bot()).await;
    let test_path = format!("/api/agent/{}/test", id);

    post_json(&app.router, &test_path, json!({"prompt": "one"})).await;
    post_json(&app.router, &test_path, json!({"prompt": "two"})).await;
    assert_eq!(app.tracker.builds.load(Ordering::SeqCst), 1);
    let (_, health) = get_json(&app.router, "/health").await;
    assert_eq!(health["active_instances"], 1);

    put_json(&app.router, &format!("/api/agent/{}", id), json!({"max_steps": 5})).await;
    let (_, health) = get_json(&app.router, "/health").await;
    assert_eq!(health["active_instances"], 0);

    post_json(&app.router, &test_path, json!({"prompt": "three"})).await;
    assert_eq!(app.tracker.builds.load(Ordering::SeqCst), 2);

    delete(&app.router, &format!("/api/agent/{}", id)).await;
    let (_, health) = get_json(&app.router, "/health").await;
    assert_eq!(health["active_instances"], 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn agent_deleted_during_build_is_not_cached() {
    let app = test_app();
    let mut body = research_bot();
    body["name"] = json!("Slow Build");
    let id = create_agent(&app.router, body).await;

    let router = app.router.clone();
    let test_path = format!("/api/agent/{}/test", id);
    let test_run = tokio::spawn(async move {
        post_json(&router, &test_path, json!({"prompt": "hello"})).await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    let (status, _) = delete(&app.router, &format!("/api/agent/{}", id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = test_run.await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Agent not found");
    assert_eq!(app.tracker.builds.load(Ordering::SeqCst), 1);
    assert!(app.state.instances.is_empty());
}

// ---------------------------------------------------------------------------
// Export, import, deploy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_is_a_json_attachment() {
    let app = test_app();
    let id = create_agent(&app.router, research_bot()).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/agent/{}/export", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(
        disposition,
        format!("attachment; filename=\"agent_research_bot_{}.json\"", &id[..8])
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let exported: Value = serde_json::from_slice(&bytes).unwrap();
    let (_, stored) = get_json(&app.router, &format!("/api/agent/{}", id)).await;
    assert_eq!(exported, stored["config"]);
}

#[tokio::test]
async fn export_then_import_round_trips_content() {
    let app = test_app();
    let id = create_agent(
        &app.router,
        json!({
            "name": "Research Bot",
            "description": "Finds things out",
            "tools": ["web_search", "terminate"],
            "llm_config": {"model": "some-model"}
        }),
    )
    .await;
    let (_, stored) = get_json(&app.router, &format!("/api/agent/{}", id)).await;
    let original = &stored["config"];
    let file = serde_json::to_vec_pretty(original).unwrap();

    let (status, body) = send(
        &app.router,
        multipart_request("/api/agent/import", "file", "agent.json", &file),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{:?}", body);
    assert_eq!(body["message"], "Agent imported successfully");

    let imported = &body["config"];
    assert_ne!(imported["id"], original["id"]);
    assert_eq!(imported["id"], body["agent_id"]);
    assert!(imported["imported_at"].is_string());
    for field in ["name", "description", "system_prompt", "tools", "max_steps", "temperature", "llm_config"] {
        assert_eq!(imported[field], original[field], "field {} differs", field);
    }

    let (_, list) = get_json(&app.router, "/api/agents").await;
    assert_eq!(list["agents"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn import_rejects_bad_uploads() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        multipart_request("/api/agent/import", "other", "agent.json", b"{}"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file provided");

    let (status, body) = send(
        &app.router,
        multipart_request("/api/agent/import", "file", "", b"{}"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file selected");

    let (status, body) = send(
        &app.router,
        multipart_request("/api/agent/import", "file", "agent.json", b"not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON file");

    let (status, body) = post_json(&app.router, "/api/agent/import", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file provided");

    let bad_tool = serde_json::to_vec(&json!({
        "name": "T", "description": "d", "tools": ["warp_drive"]
    }))
    .unwrap();
    let (status, body) = send(
        &app.router,
        multipart_request("/api/agent/import", "file", "agent.json", &bad_tool),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown tool: warp_drive");

    let (_, list) = get_json(&app.router, "/api/agents").await;
    assert_eq!(list["agents"], json!([]));
}

#[tokio::test]
async fn deploy_generates_script() {
    let app = test_app();
    let id = create_agent(&app.router, research_bot()).await;
    let path = format!("/api/agent/{}/deploy", id);

    let (status, body) = post_empty(&app.router, &path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filename"], "research_bot_agent.py");
    assert_eq!(body["message"], "Deployment code generated successfully");

    let code = body["deployment_code"].as_str().unwrap();
    assert!(code.contains("class ResearchBotAgent(ToolCallAgent):"));
    assert!(code.contains("max_steps: int = 12"));
    assert!(code.contains("WebSearch(), BrowserUseTool(), Terminate()"));

    let (_, again) = post_empty(&app.router, &path).await;
    assert_eq!(again["deployment_code"], body["deployment_code"]);

    let (status, _) = post_empty(
        &app.router,
        &format!("/api/agent/{}/deploy", uuid::Uuid::new_v4()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// One-shot processing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn process_runs_a_fresh_agent() {
    let app = test_app();

    let (status, body) = post_json(&app.router, "/process", json!({"prompt": "summarize"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "stub: summarize"}));

    let (status, body) = post_json(&app.router, "/process", json!({"prompt": "silent"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Task completed successfully.");
}

#[tokio::test]
async fn process_rejects_empty_prompt() {
    let app = test_app();
    let (status, body) = post_json(&app.router, "/process", json!({"prompt": " "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Empty prompt provided");

    let (status, _) = post_empty(&app.router, "/process").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
