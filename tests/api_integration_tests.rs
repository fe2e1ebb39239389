//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles through the router against an
//! in-memory store bootstrapped from a themes directory on disk.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use showcase::{
    create_router, themes::scan_themes, AppState, CachedDatabase, RecordCache, Store,
};
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Functions ==

struct TestApp {
    router: Router,
    db: CachedDatabase,
    _themes: TempDir,
}

fn create_test_app() -> TestApp {
    let themes = TempDir::new().unwrap();
    for (dir, name) in [("peaches", "Peaches"), ("mono", "Mono")] {
        let path = themes.path().join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(
            path.join("theme.json"),
            json!({ "name": name, "author": "tests", "image": "preview.png" }).to_string(),
        )
        .unwrap();
    }

    let store = Store::open_in_memory().unwrap();
    let cache = RecordCache::new(Duration::from_secs(300));
    let db = CachedDatabase::new(Arc::new(store), Arc::new(cache));
    db.setup(&scan_themes(themes.path())).unwrap();

    TestApp {
        router: create_router(AppState::new(db.clone())),
        db,
        _themes: themes,
    }
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_to_json(response.into_body()).await)
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == Health & Stats ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = app.send("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_stats_count_cache_hits() {
    let app = create_test_app();

    app.send("GET", "/admin/user", None).await;
    app.send("GET", "/admin/user", None).await;
    let (status, json) = app.send("GET", "/admin/cache/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["hits"].as_u64().unwrap() >= 1);
    assert!(json.get("hit_rate").is_some());
}

// == Projects ==

#[tokio::test]
async fn test_project_lifecycle() {
    let app = create_test_app();

    let (status, json) = app
        .send("POST", "/admin/project/create", Some(json!({ "title": "Demo", "tags": ["rust"] })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["slug"], "demo");

    let (status, json) = app.send("GET", "/admin/project/demo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Demo");
    assert_eq!(json["tags"], json!(["rust"]));

    let (status, _) = app
        .send("PUT", "/admin/project/demo/update", Some(json!({ "title": "Demo v2" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = app.send("GET", "/admin/projects", None).await;
    assert_eq!(json, json!([{ "slug": "demo", "title": "Demo v2", "subtitle": "", "image": "" }]));

    let (status, _) = app.send("DELETE", "/admin/project/demo/delete", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app.send("GET", "/admin/project/demo", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_duplicate_project_is_conflict() {
    let app = create_test_app();

    let (status, _) = app
        .send("POST", "/admin/project/create", Some(json!({ "title": "Demo", "about": "first" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = app
        .send("POST", "/admin/project/create", Some(json!({ "title": "Demo", "about": "second" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("demo"));

    // Read past the cache: the store still holds the first record.
    app.db.cache().clear();
    let (_, json) = app.send("GET", "/admin/project/demo", None).await;
    assert_eq!(json["about"], "first");
}

#[tokio::test]
async fn test_create_project_validation() {
    let app = create_test_app();

    let (status, json) = app
        .send("POST", "/admin/project/create", Some(json!({ "title": "   " })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

// == Content & Menu ==

#[tokio::test]
async fn test_content_menu_flow() {
    let app = create_test_app();

    let (status, _) = app
        .send("POST", "/admin/content/create", Some(json!({ "title": "About" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, json) = app.send("GET", "/admin/menu", None).await;
    assert_eq!(json["added"], json!(["home", "contact"]));
    assert_eq!(json["routes"], json!(["about", "notfound"]));

    let (status, _) = app
        .send("PUT", "/admin/menu/add", Some(json!({ "slug": "about" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send("PUT", "/admin/content/about/update", Some(json!({ "title": "About me" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let menu = app.db.get_menu().unwrap();
    assert_eq!(menu.slugs(), vec!["home", "contact", "about"]);
    assert_eq!(menu.entries()[2].title, "About me");
    assert_eq!(menu.entries()[1].title, "Contact");

    let (status, _) = app
        .send("PUT", "/admin/menu/add", Some(json!({ "slug": "about" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send("PUT", "/admin/menu/remove", Some(json!({ "slug": "home" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = app.send("GET", "/admin/menu", None).await;
    assert_eq!(json["added"], json!(["contact", "about"]));
}

#[tokio::test]
async fn test_menu_add_unknown_route() {
    let app = create_test_app();

    let (status, _) = app
        .send("PUT", "/admin/menu/add", Some(json!({ "slug": "nowhere" })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_content_stays_in_menu() {
    let app = create_test_app();
    app.send("POST", "/admin/content/create", Some(json!({ "title": "Blog" })))
        .await;
    app.send("PUT", "/admin/menu/add", Some(json!({ "slug": "blog" })))
        .await;

    let (status, _) = app.send("DELETE", "/admin/content/blog/delete", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = app.send("GET", "/admin/contents", None).await;
    assert_eq!(json, json!([]));
    let (_, json) = app.send("GET", "/admin/menu", None).await;
    assert_eq!(json["added"], json!(["home", "contact", "blog"]));
}

// == Configuration ==

#[tokio::test]
async fn test_theme_listing_and_switch() {
    let app = create_test_app();

    let (status, json) = app.send("GET", "/admin/theme", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["selected"], "peaches");
    assert_eq!(json["themes"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .send("PUT", "/admin/theme/update", Some(json!({ "path": "mono" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = app.send("GET", "/admin/theme", None).await;
    assert_eq!(json["selected"], "mono");

    let (status, _) = app
        .send("PUT", "/admin/theme/update", Some(json!({ "path": "missing" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_meta_and_site() {
    let app = create_test_app();

    let (status, _) = app
        .send(
            "PUT",
            "/admin/meta/update",
            Some(json!({ "title": "Portfolio", "site": "https://example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = app.send("GET", "/admin/meta", None).await;
    assert_eq!(json["title"], "Portfolio");

    let (_, json) = app.send("GET", "/admin/site", None).await;
    assert_eq!(json["site"], "https://example.com/");
}

#[tokio::test]
async fn test_user_update_keeps_join_date() {
    let app = create_test_app();
    let (_, before) = app.send("GET", "/admin/user", None).await;

    let (status, _) = app
        .send("PUT", "/admin/user/update", Some(json!({ "name": "Ada", "title": "Engineer" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = app.send("GET", "/admin/user", None).await;
    assert_eq!(after["name"], "Ada");
    assert_eq!(after["joined"], before["joined"]);
}

// == Storage failures ==

#[tokio::test]
async fn test_storage_error_is_opaque() {
    let app = create_test_app();
    app.db.store().close().unwrap();

    let (status, json) = app.send("GET", "/admin/projects", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Database error");
}
