//! End-to-end tests against the full router.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use ideaboard_server::api::{build_router, AppState};
use ideaboard_server::config::ServerConfig;
use ideaboard_server::gateway::Gateway;
use ideaboard_server::services::accounts;
use ideaboard_shared::Role;

struct TestApp {
    _dir: tempfile::TempDir,
    state: AppState,
}

impl TestApp {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            database_path: dir.path().join("e2e.db"),
            ..Default::default()
        };
        let gateway = Gateway::open(config.database_path.clone()).unwrap();
        gateway
            .run(|db| accounts::create_account(db, "founder", None, "founder-pass", Role::Founder))
            .await
            .unwrap();
        Self {
            _dir: dir,
            state: AppState::new(config, gateway),
        }
    }

    fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.send_from(method, uri, token, body, None).await
    }

    async fn send_from(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
        forwarded_for: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(addr) = forwarded_for {
            builder = builder.header("x-forwarded-for", addr);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "username": username, "password": "member-pass" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn create_solar(&self, token: &str) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/ideas",
                Some(token),
                Some(json!({ "title": "Solar Co-op", "description": "x", "tags": ["energy"] })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["idea"]["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], "1.0.0");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn admin_creates_idea_and_tag_filter_applies() {
    let app = TestApp::new().await;
    let token = app.login("founder", "founder-pass").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/ideas",
            Some(&token),
            Some(json!({ "title": "Solar Co-op", "description": "x", "tags": ["energy"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Idea created successfully");
    assert_eq!(body["idea"]["tags"], json!(["energy"]));
    let id = body["idea"]["id"].as_i64().unwrap();

    let (_, listed) = app.send(Method::GET, "/api/ideas?tag=energy", None, None).await;
    let ids: Vec<i64> = listed["ideas"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![id]);

    let (_, none) = app
        .send(Method::GET, "/api/ideas?tag=nonexistent", None, None)
        .await;
    assert_eq!(none["ideas"], json!([]));

    let (_, tags) = app.send(Method::GET, "/api/ideas/tags", None, None).await;
    assert_eq!(tags["tags"], json!(["energy"]));

    let (status, one) = app
        .send(Method::GET, &format!("/api/ideas/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["idea"]["title"], "Solar Co-op");

    let (status, missing) = app.send(Method::GET, "/api/ideas/9999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["error"], "Idea not found");
}

#[tokio::test]
async fn idea_creation_is_gated() {
    let app = TestApp::new().await;
    let body = json!({ "title": "Solar Co-op", "description": "x" });

    let (status, _) = app
        .send(Method::POST, "/api/ideas", None, Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let member = app.register("member").await;
    let (status, denied) = app
        .send(Method::POST, "/api/ideas", Some(&member), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(denied["requiredRoles"], json!(["founder", "core_team"]));
    assert_eq!(denied["yourRole"], "contributor");

    let (status, _) = app
        .send(Method::POST, "/api/ideas", Some("not.a.token"), Some(body))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_likes_toggle_per_address() {
    let app = TestApp::new().await;
    let token = app.login("founder", "founder-pass").await;
    let id = app.create_solar(&token).await;
    let uri = format!("/api/ideas/{id}/like");

    let (status, first) = app
        .send_from(Method::POST, &uri, None, None, Some("203.0.113.7"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["liked"], true);
    assert_eq!(first["likeCount"], 1);
    assert_eq!(first["message"], "Like added");

    let (_, second) = app
        .send_from(Method::POST, &uri, None, None, Some("203.0.113.7"))
        .await;
    assert_eq!(second["liked"], false);
    assert_eq!(second["likeCount"], 0);
    assert_eq!(second["message"], "Like removed");

    let (status, _) = app
        .send_from(Method::POST, "/api/ideas/4242/like", None, None, Some("203.0.113.7"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_hide_identity_of_anonymous_authors() {
    let app = TestApp::new().await;
    let founder = app.login("founder", "founder-pass").await;
    let id = app.create_solar(&founder).await;
    let member = app.register("member").await;
    let uri = format!("/api/ideas/{id}/comments");

    let (status, created) = app
        .send(
            Method::POST,
            &uri,
            Some(&member),
            Some(json!({ "content": "  count me in  ", "isAnonymous": true })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Comment added successfully");
    assert_eq!(created["comment"]["display_name"], "Anonymous");
    assert_eq!(created["comment"]["content"], "count me in");
    assert!(created["comment"].get("user_id").is_none());

    let (status, blank) = app
        .send(Method::POST, &uri, None, Some(json!({ "content": "   " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(blank["error"].is_string());

    let (_, listed) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(listed["comments"].as_array().unwrap().len(), 1);

    let (_, feed) = app.send(Method::GET, "/api/activity?limit=2", None, None).await;
    let feed = feed["activities"].as_array().unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0]["activity_type"], "comment_added");
    assert_eq!(feed[0]["summary"], "Anonymous commented on Solar Co-op");
    assert!(feed[0]["username"].is_null());
    assert!(feed[0]["user_id"].is_null());
}

#[tokio::test]
async fn progress_updates_validate_and_record_history() {
    let app = TestApp::new().await;
    let token = app.login("founder", "founder-pass").await;
    let id = app.create_solar(&token).await;
    let uri = format!("/api/ideas/{id}/progress");

    let (status, _) = app
        .send(Method::PATCH, &uri, Some(&token), Some(json!({ "progress": 150 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "progress": 40, "notes": "pilot roof" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Progress updated");
    assert_eq!(body["progress"], 40);

    let (status, _) = app
        .send(
            Method::PATCH,
            "/api/ideas/9999/progress",
            Some(&token),
            Some(json!({ "progress": 10 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, history) = app.send(Method::GET, &uri, None, None).await;
    let history = history["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["new_progress"], 40);
}

#[tokio::test]
async fn accounts_register_login_and_promote() {
    let app = TestApp::new().await;
    let founder = app.login("founder", "founder-pass").await;
    let member = app.register("member").await;

    let (status, me) = app.send(Method::GET, "/api/auth/me", Some(&member), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["username"], "member");
    assert!(me["user"].get("password_hash").is_none());
    let member_id = me["user"]["id"].as_i64().unwrap();

    let (status, _) = app.send(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "member", "password": "wrong-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "member", "password": "member-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let role_uri = format!("/api/users/{member_id}/role");
    let (status, _) = app
        .send(
            Method::PATCH,
            &role_uri,
            Some(&member),
            Some(json!({ "role": "core_team" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, promoted) = app
        .send(
            Method::PATCH,
            &role_uri,
            Some(&founder),
            Some(json!({ "role": "core_team" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(promoted["user"]["role"], "core_team");

    // The old token still carries the old role until the user logs in again.
    let fresh = app.login("member", "member-pass").await;
    let (status, _) = app
        .send(
            Method::POST,
            "/api/ideas",
            Some(&fresh),
            Some(json!({ "title": "Tool library", "description": "Share drills" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn malformed_requests_get_json_validation_errors() {
    let app = TestApp::new().await;
    let token = app.login("founder", "founder-pass").await;
    let id = app.create_solar(&token).await;
    let progress_uri = format!("/api/ideas/{id}/progress");

    for body in [json!({ "progress": 50.5 }), json!({ "progress": "abc" })] {
        let (status, err) = app
            .send(Method::PATCH, &progress_uri, Some(&token), Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["error"].is_string(), "{err}");
    }

    let (status, err) = app
        .send(
            Method::POST,
            "/api/ideas",
            Some(&token),
            Some(json!({ "title": "Tool library", "description": "x", "tags": "energy" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].is_string());

    let (status, err) = app.send(Method::GET, "/api/ideas?limit=abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].is_string());

    let (status, err) = app.send(Method::GET, "/api/ideas/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].is_string());

    let no_body = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/ideas/{id}/comments"))
        .body(Body::empty())
        .unwrap();
    let (status, err) = app.send_raw(no_body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].is_string());
}

#[tokio::test]
async fn blank_filters_mean_no_filter() {
    let app = TestApp::new().await;
    let token = app.login("founder", "founder-pass").await;
    let id = app.create_solar(&token).await;

    for uri in [
        "/api/ideas?status=",
        "/api/ideas?tag=",
        "/api/ideas?status=&tag=",
        "/api/ideas?status=&tag=energy",
    ] {
        let (status, body) = app.send(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ideas"][0]["id"], id, "{uri}");
    }
}

#[tokio::test]
async fn privileged_self_registration_names_no_roles() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "eve", "password": "member-pass", "role": "founder" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.get("requiredRoles").is_none());
    assert!(body["error"].is_string());
}
