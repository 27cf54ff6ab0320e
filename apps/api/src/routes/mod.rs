pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::intake::handlers as intake;
use crate::search::handlers as search;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        // Intake
        .route("/api/v1/resumes/extract", post(intake::handle_extract))
        .route(
            "/api/v1/sessions/:id",
            get(intake::handle_get_session).delete(intake::handle_discard_session),
        )
        .route("/api/v1/sessions/:id/save", post(intake::handle_save))
        .route("/api/v1/sessions/:id/resolve", post(intake::handle_resolve))
        // Search
        .route("/api/v1/candidates", get(search::handle_list_candidates))
        .route("/api/v1/skills", get(search::handle_skill_options))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::intake::session::SessionStore;
    use crate::profile::models::{ExtractedProfile, TechnicalSkills};
    use crate::store::RecordStore;
    use crate::testing::{FakeDocuments, FakeProfiles};

    const BOUNDARY: &str = "intake-test-boundary";

    fn app(dir: &tempfile::TempDir) -> (Router, std::path::PathBuf) {
        let store_path = dir.path().join("resume_output.csv");
        let state = test_state(Config::for_tests(store_path.clone()));
        (build_router(state), store_path)
    }

    fn test_state(config: Config) -> AppState {
        let profile = ExtractedProfile {
            fullname: Some("Jane Doe".to_string()),
            email_id: Some("jane@example.com".to_string()),
            designation: Some("Data Engineer".to_string()),
            technical_skills: TechnicalSkills {
                programming_languages: vec!["Python".to_string()],
                other_tools: vec!["SQL".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        AppState {
            documents: Arc::new(FakeDocuments::returning("Jane Doe resume text")),
            profiles: Arc::new(FakeProfiles::returning(profile)),
            store: Arc::new(RecordStore::new(&config.store_path)),
            sessions: SessionStore::new(chrono::Duration::minutes(config.session_ttl_minutes)),
            config,
        }
    }

    fn upload(file_name: &str) -> Request<Body> {
        upload_content(file_name, "fake document bytes")
    }

    fn upload_content(file_name: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/extract")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn extract_session(app: &Router) -> String {
        let (status, body) = send(app, upload("jane.pdf")).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(&dir);
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_extract_returns_details_and_skills() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store_path) = app(&dir);

        let (status, body) = send(&app, upload("jane.pdf")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["details"]["fullname"], "Jane Doe");
        assert_eq!(body["details"]["designation"], "Data Engineer");
        assert_eq!(body["profile"]["skills"], json!(["Python", "SQL"]));
        assert!(!store_path.exists(), "extraction alone must not persist");

        let id = body["session_id"].as_str().unwrap();
        let (status, session) = send(&app, get(&format!("/api/v1/sessions/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["awaiting_decision"], false);
        assert_eq!(session["already_stored"], false);
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(&dir);
        let (status, body) = send(&app, upload("jane.txt")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::for_tests(dir.path().join("resume_output.csv"));
        config.max_upload_bytes = 1024;
        let state = test_state(config);
        let app = build_router(state.clone());

        let (status, body) = send(&app, upload_content("jane.pdf", &"x".repeat(4096))).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(state.sessions.len().await, 0);

        // a small upload still goes through under the same limit
        let (status, _) = send(&app, upload("jane.pdf")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_duplicate_cancel_flow() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store_path) = app(&dir);

        let first = extract_session(&app).await;
        let (status, body) =
            send(&app, post_json(&format!("/api/v1/sessions/{first}/save"), json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "saved");
        let saved_bytes = std::fs::read(&store_path).unwrap();

        // saved sessions are closed
        let (status, _) = send(&app, get(&format!("/api/v1/sessions/{first}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let second = extract_session(&app).await;
        let save_uri = format!("/api/v1/sessions/{second}/save");
        let (_, body) = send(&app, post_json(&save_uri, json!({}))).await;
        assert_eq!(body["status"], "duplicate_found");
        assert_eq!(body["email"], "jane@example.com");
        assert_eq!(body["choices"], json!(["overwrite", "cancel"]));
        assert_eq!(std::fs::read(&store_path).unwrap(), saved_bytes);

        // asking again does not write either
        let (_, body) = send(&app, post_json(&save_uri, json!({}))).await;
        assert_eq!(body["status"], "duplicate_found");

        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/sessions/{second}/resolve"),
                json!({"decision": "cancel"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "cancelled");
        assert_eq!(std::fs::read(&store_path).unwrap(), saved_bytes);

        let (status, _) = send(&app, get(&format!("/api/v1/sessions/{second}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_overwrite_keeps_single_row() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(&dir);

        let first = extract_session(&app).await;
        send(&app, post_json(&format!("/api/v1/sessions/{first}/save"), json!({}))).await;

        let second = extract_session(&app).await;
        send(&app, post_json(&format!("/api/v1/sessions/{second}/save"), json!({}))).await;
        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/sessions/{second}/resolve"),
                json!({"decision": "overwrite"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "overwritten");

        let (_, body) = send(&app, get("/api/v1/candidates")).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["candidates"][0]["email_id"], "jane@example.com");
    }

    #[tokio::test]
    async fn test_concurrent_resolves_apply_one_decision() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store_path) = app(&dir);

        let first = extract_session(&app).await;
        send(&app, post_json(&format!("/api/v1/sessions/{first}/save"), json!({}))).await;
        let saved_bytes = std::fs::read(&store_path).unwrap();

        let second = extract_session(&app).await;
        send(&app, post_json(&format!("/api/v1/sessions/{second}/save"), json!({}))).await;

        let uri = format!("/api/v1/sessions/{second}/resolve");
        let (a, b) = tokio::join!(
            send(&app, post_json(&uri, json!({"decision": "overwrite"}))),
            send(&app, post_json(&uri, json!({"decision": "cancel"}))),
        );

        let statuses = [a.0, b.0];
        assert_eq!(
            statuses.iter().filter(|s| **s == StatusCode::OK).count(),
            1,
            "{statuses:?}"
        );
        assert!(statuses.contains(&StatusCode::NOT_FOUND));

        let winner = if a.0 == StatusCode::OK { &a.1 } else { &b.1 };
        if winner["status"] == "cancelled" {
            assert_eq!(std::fs::read(&store_path).unwrap(), saved_bytes);
        } else {
            assert_eq!(winner["status"], "overwritten");
        }
        let (_, body) = send(&app, get("/api/v1/candidates")).await;
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn test_resolve_without_pending_duplicate_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(&dir);
        let id = extract_session(&app).await;

        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/sessions/{id}/resolve"),
                json!({"decision": "overwrite"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_discard_session() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store_path) = app(&dir);
        let id = extract_session(&app).await;

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) =
            send(&app, post_json(&format!("/api/v1/sessions/{id}/save"), json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!store_path.exists());
    }

    #[tokio::test]
    async fn test_candidate_filter_and_skill_options() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store_path) = app(&dir);
        std::fs::write(
            &store_path,
            "fullname,email_id,skills\n\
             X,x@example.com,\"[\"\"python\"\",\"\"sql\"\"]\"\n\
             Y,y@example.com,\"['python']\"\n",
        )
        .unwrap();

        let (_, body) = send(&app, get("/api/v1/candidates")).await;
        assert_eq!(body["total"], 2);

        let (_, body) = send(&app, get("/api/v1/candidates?skills=python,sql")).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["selected"], json!(["python", "sql"]));
        assert_eq!(body["candidates"][0]["email_id"], "x@example.com");
        assert_eq!(body["candidates"][0]["skills"], json!(["python", "sql"]));

        let (_, body) = send(&app, get("/api/v1/skills")).await;
        assert_eq!(body["skills"], json!(["python", "sql"]));
    }

    #[tokio::test]
    async fn test_filter_selects_tag_containing_comma() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store_path) = app(&dir);
        std::fs::write(
            &store_path,
            "fullname,email_id,skills\n\
             S,s@example.com,\"['Sales, Marketing', 'sql']\"\n\
             M,m@example.com,\"['Sales', 'Marketing', 'sql']\"\n",
        )
        .unwrap();

        let (_, body) = send(
            &app,
            get("/api/v1/candidates?skill=Sales%2C%20Marketing&skills=sql"),
        )
        .await;
        assert_eq!(body["selected"], json!(["Sales, Marketing", "sql"]));
        assert_eq!(body["total"], 1);
        assert_eq!(body["candidates"][0]["email_id"], "s@example.com");

        let (_, body) = send(&app, get("/api/v1/candidates?skills=Sales,Marketing")).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["candidates"][0]["email_id"], "m@example.com");
    }

    #[tokio::test]
    async fn test_malformed_store_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store_path) = app(&dir);
        std::fs::write(
            &store_path,
            "fullname,email_id,skills\nX,x@example.com,python\n",
        )
        .unwrap();

        let (status, body) = send(&app, get("/api/v1/candidates?skills=python")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "MALFORMED_STORE");
        assert!(body["error"]["message"].as_str().unwrap().contains("row 1"));
    }
}
