//! Integration tests for the JobTrack backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        // Create config
        let config = Config {
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            session_ttl_hours: 24,
        };

        let state = AppState {
            repo,
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register a user and return their session token.
    async fn register(&self, email: &str) -> String {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "firstName": "Test",
                "lastName": "User",
                "email": email,
                "password": "correct-horse-battery"
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Create an application and return its id.
    async fn create_application(&self, token: &str, company: &str, status: &str) -> String {
        let resp = self
            .client
            .post(self.url("/api/applications"))
            .bearer_auth(token)
            .json(&json!({
                "company": company,
                "position": "Engineer",
                "status": status
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_protected_routes_require_auth() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/applications"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let resp2 = fixture
        .client
        .get(fixture.url("/api/dashboard/stats"))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .unwrap();

    assert_eq!(resp2.status(), 401);
}

#[tokio::test]
async fn test_register_and_login() {
    let fixture = TestFixture::new().await;

    let token = fixture.register("alice@example.com").await;
    assert!(!token.is_empty());

    // Login with the right password
    let login_resp = fixture
        .client
        .post(fixture.url("/api/auth/login"))
        .json(&json!({
            "email": "alice@example.com",
            "password": "correct-horse-battery"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(login_resp.status(), 200);
    let login_body: Value = login_resp.json().await.unwrap();
    assert_eq!(login_body["success"], true);
    assert_eq!(login_body["data"]["user"]["email"], "alice@example.com");
    assert!(login_body["data"]["token"].is_string());

    // Wrong password is rejected
    let bad_resp = fixture
        .client
        .post(fixture.url("/api/auth/login"))
        .json(&json!({
            "email": "alice@example.com",
            "password": "wrong-password"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(bad_resp.status(), 401);
}

#[tokio::test]
async fn test_register_validation() {
    let fixture = TestFixture::new().await;

    // Short password
    let resp = fixture
        .client
        .post(fixture.url("/api/auth/register"))
        .json(&json!({
            "firstName": "Bob",
            "lastName": "Short",
            "email": "bob@example.com",
            "password": "short"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Duplicate email
    fixture.register("carol@example.com").await;
    let dup_resp = fixture
        .client
        .post(fixture.url("/api/auth/register"))
        .json(&json!({
            "firstName": "Carol",
            "lastName": "Again",
            "email": "carol@example.com",
            "password": "another-long-password"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(dup_resp.status(), 400);
}

#[tokio::test]
async fn test_verify_and_logout() {
    let fixture = TestFixture::new().await;
    let token = fixture.register("dave@example.com").await;

    // Valid session
    let verify_resp = fixture
        .client
        .get(fixture.url("/api/auth/verify"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(verify_resp.status(), 200);
    let verify_body: Value = verify_resp.json().await.unwrap();
    assert_eq!(verify_body["data"]["valid"], true);
    assert_eq!(verify_body["data"]["user"]["email"], "dave@example.com");

    // Logout
    let logout_resp = fixture
        .client
        .post(fixture.url("/api/auth/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(logout_resp.status(), 200);

    // Session is gone
    let verify_again: Value = fixture
        .client
        .get(fixture.url("/api/auth/verify"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(verify_again["data"]["valid"], false);

    let list_resp = fixture
        .client
        .get(fixture.url("/api/applications"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(list_resp.status(), 401);
}

#[tokio::test]
async fn test_reset_password_with_bad_token() {
    let fixture = TestFixture::new().await;

    // Forgot-password never discloses whether the email exists
    let forgot_resp = fixture
        .client
        .post(fixture.url("/api/auth/forgot-password"))
        .json(&json!({ "email": "nobody@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(forgot_resp.status(), 200);

    let reset_resp = fixture
        .client
        .put(fixture.url("/api/auth/reset-password/bogus-token"))
        .json(&json!({ "password": "a-new-long-password" }))
        .send()
        .await
        .unwrap();

    assert_eq!(reset_resp.status(), 400);
    let body: Value = reset_resp.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_application_crud() {
    let fixture = TestFixture::new().await;
    let token = fixture.register("eve@example.com").await;

    // Create
    let create_resp = fixture
        .client
        .post(fixture.url("/api/applications"))
        .bearer_auth(&token)
        .json(&json!({
            "company": "Acme",
            "position": "Backend Engineer",
            "location": "Remote"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(create_resp.status(), 200);
    let create_body: Value = create_resp.json().await.unwrap();
    assert_eq!(create_body["success"], true);
    let app_id = create_body["data"]["id"].as_str().unwrap();
    assert_eq!(create_body["data"]["status"], "Applied");
    assert_eq!(create_body["data"]["nextStep"], "Await response");

    // Get
    let get_resp = fixture
        .client
        .get(fixture.url(&format!("/api/applications/{}", app_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(get_resp.status(), 200);
    let get_body: Value = get_resp.json().await.unwrap();
    assert_eq!(get_body["data"]["company"], "Acme");

    // Update
    let update_resp = fixture
        .client
        .put(fixture.url(&format!("/api/applications/{}", app_id)))
        .bearer_auth(&token)
        .json(&json!({ "status": "Offer", "nextStep": "Negotiate offer" }))
        .send()
        .await
        .unwrap();
    assert_eq!(update_resp.status(), 200);
    let update_body: Value = update_resp.json().await.unwrap();
    assert_eq!(update_body["data"]["status"], "Offer");
    assert_eq!(update_body["data"]["company"], "Acme");

    // List
    let list_resp = fixture
        .client
        .get(fixture.url("/api/applications"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let list_body: Value = list_resp.json().await.unwrap();
    assert_eq!(list_body["data"].as_array().unwrap().len(), 1);

    // Delete
    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/applications/{}", app_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(delete_resp.status(), 200);

    // Verify deleted
    let gone_resp = fixture
        .client
        .get(fixture.url(&format!("/api/applications/{}", app_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(gone_resp.status(), 404);
}

#[tokio::test]
async fn test_application_validation() {
    let fixture = TestFixture::new().await;
    let token = fixture.register("frank@example.com").await;

    let resp = fixture
        .client
        .post(fixture.url("/api/applications"))
        .bearer_auth(&token)
        .json(&json!({ "company": "", "position": "Engineer" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_interview_crud_and_status_transition() {
    let fixture = TestFixture::new().await;
    let token = fixture.register("grace@example.com").await;
    let app_id = fixture.create_application(&token, "Globex", "Interview").await;

    // Schedule
    let create_resp = fixture
        .client
        .post(fixture.url("/api/interviews"))
        .bearer_auth(&token)
        .json(&json!({
            "applicationId": app_id,
            "type": "System Design",
            "date": "2030-01-15T14:00:00Z",
            "platform": "Zoom"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(create_resp.status(), 200);
    let create_body: Value = create_resp.json().await.unwrap();
    let interview_id = create_body["data"]["id"].as_str().unwrap();
    assert_eq!(create_body["data"]["type"], "System Design");
    assert_eq!(create_body["data"]["status"], "Scheduled");

    // Complete it
    let complete_resp = fixture
        .client
        .put(fixture.url(&format!("/api/interviews/{}", interview_id)))
        .bearer_auth(&token)
        .json(&json!({ "status": "Completed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(complete_resp.status(), 200);
    let complete_body: Value = complete_resp.json().await.unwrap();
    assert_eq!(complete_body["data"]["status"], "Completed");

    // The transition is one-directional
    let back_resp = fixture
        .client
        .put(fixture.url(&format!("/api/interviews/{}", interview_id)))
        .bearer_auth(&token)
        .json(&json!({ "status": "Scheduled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(back_resp.status(), 400);
    let back_body: Value = back_resp.json().await.unwrap();
    assert_eq!(back_body["error"]["code"], "VALIDATION_ERROR");

    // Delete
    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/interviews/{}", interview_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(delete_resp.status(), 200);
}

#[tokio::test]
async fn test_interview_rejects_foreign_application() {
    let fixture = TestFixture::new().await;
    let token = fixture.register("heidi@example.com").await;

    let resp = fixture
        .client
        .post(fixture.url("/api/interviews"))
        .bearer_auth(&token)
        .json(&json!({
            "applicationId": "does-not-exist",
            "type": "Technical",
            "date": "2030-01-15T14:00:00Z"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_interview_status_filter() {
    let fixture = TestFixture::new().await;
    let token = fixture.register("ivan@example.com").await;

    for (date, status) in [
        ("2030-01-15T14:00:00Z", "Scheduled"),
        ("2020-01-15T14:00:00Z", "Completed"),
    ] {
        let resp = fixture
            .client
            .post(fixture.url("/api/interviews"))
            .bearer_auth(&token)
            .json(&json!({ "type": "HR", "date": date, "status": status }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let scheduled: Value = fixture
        .client
        .get(fixture.url("/api/interviews?status=Scheduled"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(scheduled["data"].as_array().unwrap().len(), 1);

    let upcoming: Value = fixture
        .client
        .get(fixture.url("/api/interviews?status=Upcoming"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(upcoming["data"].as_array().unwrap().len(), 1);
    assert_eq!(upcoming["data"][0]["status"], "Scheduled");

    let bad_resp = fixture
        .client
        .get(fixture.url("/api/interviews?status=Pending"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(bad_resp.status(), 400);
}

#[tokio::test]
async fn test_ownership_isolation() {
    let fixture = TestFixture::new().await;
    let token_a = fixture.register("owner@example.com").await;
    let token_b = fixture.register("other@example.com").await;

    let app_id = fixture.create_application(&token_a, "Initech", "Applied").await;

    // User B cannot see, update, or delete user A's application
    let get_resp = fixture
        .client
        .get(fixture.url(&format!("/api/applications/{}", app_id)))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap();
    assert_eq!(get_resp.status(), 404);

    let update_resp = fixture
        .client
        .put(fixture.url(&format!("/api/applications/{}", app_id)))
        .bearer_auth(&token_b)
        .json(&json!({ "company": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(update_resp.status(), 404);

    let list_resp: Value = fixture
        .client
        .get(fixture.url("/api/applications"))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list_resp["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_dashboard_stats() {
    let fixture = TestFixture::new().await;
    let token = fixture.register("judy@example.com").await;

    fixture.create_application(&token, "Acme", "Applied").await;
    fixture.create_application(&token, "Globex", "Offer").await;
    fixture.create_application(&token, "Initech", "Rejected").await;

    fixture
        .client
        .post(fixture.url("/api/interviews"))
        .bearer_auth(&token)
        .json(&json!({ "type": "Technical", "date": "2030-01-15T14:00:00Z" }))
        .send()
        .await
        .unwrap();

    let stats: Value = fixture
        .client
        .get(fixture.url("/api/dashboard/stats"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats["success"], true);
    let data = &stats["data"];
    assert_eq!(data["applications"]["total"], 3);
    // All three were created just now, inside the weekly window
    assert_eq!(data["applications"]["weeklyChangeText"], "3 new this week");
    assert_eq!(data["interviews"]["total"], 1);
    assert_eq!(data["interviews"]["upcomingText"], "1 upcoming");
    assert_eq!(data["offers"]["total"], 1);
    assert_eq!(data["offers"]["pendingText"], "1 pending response");
    assert_eq!(data["rejections"]["total"], 1);
    assert_eq!(data["rejections"]["weeklyChangeText"], "1 this week");
}

#[tokio::test]
async fn test_dashboard_activity_and_timeline() {
    let fixture = TestFixture::new().await;
    let token = fixture.register("ken@example.com").await;

    let app_id = fixture.create_application(&token, "Acme", "Interview").await;

    fixture
        .client
        .post(fixture.url("/api/interviews"))
        .bearer_auth(&token)
        .json(&json!({
            "applicationId": app_id,
            "type": "Behavioral",
            "date": "2030-01-15T14:00:00Z"
        }))
        .send()
        .await
        .unwrap();

    let activity: Value = fixture
        .client
        .get(fixture.url("/api/dashboard/activity"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(activity["data"]["recentApplications"].as_array().unwrap().len(), 1);
    let upcoming = activity["data"]["upcomingInterviews"].as_array().unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0]["type"], "Behavioral");

    let timeline: Value = fixture
        .client
        .get(fixture.url("/api/dashboard/timeline"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let entries = timeline["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // The 2030 interview sorts before the just-created application
    assert_eq!(entries[0]["type"], "interview");
    assert_eq!(entries[0]["company"], "Acme");
    assert_eq!(entries[1]["type"], "application");
}

#[tokio::test]
async fn test_deleting_application_unlinks_interviews() {
    let fixture = TestFixture::new().await;
    let token = fixture.register("lena@example.com").await;

    let app_id = fixture.create_application(&token, "Acme", "Interview").await;

    let create_body: Value = fixture
        .client
        .post(fixture.url("/api/interviews"))
        .bearer_auth(&token)
        .json(&json!({
            "applicationId": app_id,
            "type": "Technical",
            "date": "2030-01-15T14:00:00Z"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let interview_id = create_body["data"]["id"].as_str().unwrap();

    fixture
        .client
        .delete(fixture.url(&format!("/api/applications/{}", app_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    // The interview survives with an unresolved reference
    let interview: Value = fixture
        .client
        .get(fixture.url(&format!("/api/interviews/{}", interview_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(interview["success"], true);
    assert!(interview["data"].get("applicationId").is_none());

    // Its timeline entry loses the company payload
    let timeline: Value = fixture
        .client
        .get(fixture.url("/api/dashboard/timeline"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let entries = timeline["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["type"], "interview");
    assert!(entries[0].get("company").is_none());
}

#[tokio::test]
async fn test_profile_roundtrip() {
    let fixture = TestFixture::new().await;
    let token = fixture.register("mallory@example.com").await;

    // Initial profile mirrors registration
    let profile: Value = fixture
        .client
        .get(fixture.url("/api/profile/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile["data"]["personal"]["email"], "mallory@example.com");
    assert_eq!(profile["data"]["professional"]["skills"].as_array().unwrap().len(), 0);

    // Update personal info
    let personal: Value = fixture
        .client
        .put(fixture.url("/api/profile/personal"))
        .bearer_auth(&token)
        .json(&json!({ "firstName": "Mal", "location": "Berlin" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(personal["data"]["firstName"], "Mal");
    assert_eq!(personal["data"]["location"], "Berlin");

    // Update professional info
    let professional: Value = fixture
        .client
        .put(fixture.url("/api/profile/professional"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Backend Engineer",
            "bio": "Rustacean",
            "skills": ["Rust"]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(professional["data"]["title"], "Backend Engineer");

    // Add and remove skills
    let added: Value = fixture
        .client
        .post(fixture.url("/api/profile/skills"))
        .bearer_auth(&token)
        .json(&json!({ "skill": "SQL" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(added["data"]["skills"], json!(["Rust", "SQL"]));

    let removed: Value = fixture
        .client
        .delete(fixture.url("/api/profile/skills/Rust"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(removed["data"]["skills"], json!(["SQL"]));
}
