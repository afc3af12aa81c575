use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tabvault_common::MEMORY_DB_PATH;
use tabvault_server::startup::{AppState, router};
use tabvault_sqlite::{SEED_SONGS, SEED_TABS, Store};
use tower::ServiceExt;

const BOUNDARY: &str = "tabvault-boundary";

fn app() -> Router {
    let store = Store::open(MEMORY_DB_PATH, 1).unwrap();
    router(AppState { store })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart(fields: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        if *name == "tabfile" {
            body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"tab.txt\"\r\nContent-Type: text/plain\r\n\r\n"
            ));
        } else {
            body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            ));
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::post("/api/import_tab")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn health_check_reports_pool() {
    let app = app();
    let (status, body) = send(&app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["pool"]["capacity"], 1);
}

#[tokio::test]
async fn lists_and_filters_tabs() {
    let app = app();

    let (status, body) = send(&app, get("/api/tabs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), SEED_TABS.len());
    assert!(body[0].get("content").is_none());
    assert_eq!(body[0]["type"], "Chords");

    let (_, body) = send(&app, get("/api/tabs?q=Purple")).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|tab| tab["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Smoke on the Water"]);
}

#[tokio::test]
async fn missing_tab_is_404_with_error_body() {
    let app = app();
    let (status, body) = send(&app, get("/api/tab/4242")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn multipart_import_cleans_the_uploaded_text() {
    let app = app();
    let request = multipart(&[
        ("title", "Stairway to Heaven"),
        ("artist", "Led Zeppelin"),
        ("type", "Tab"),
        ("tuning", "Standard"),
        ("capo", ""),
        ("difficulty", "Advanced"),
        (
            "tabfile",
            "Tabbed by someone@example.com on 3/14\n\n[Intro]\ne|-------5-7-----7-|\nB|-----5-----5-----|\n\nThanks for reading!\n",
        ),
    ]);

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (status, tab) = send(&app, get(&format!("/api/tab/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tab["title"], "Stairway to Heaven");
    assert_eq!(tab["difficulty"], "Advanced");
    assert_eq!(tab["capo"], "");
    assert_eq!(
        tab["content"],
        "[Intro]\ne|-------5-7-----7-|\nB|-----5-----5-----|"
    );
}

#[tokio::test]
async fn import_without_required_fields_is_rejected() {
    let app = app();
    let (status, body) = send(&app, multipart(&[("title", "Untitled")])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["missing_fields"], json!(["artist", "content"]));
    assert!(body["error"].as_str().unwrap().contains("artist"));

    let (_, list) = send(&app, get("/api/tabs")).await;
    assert_eq!(list.as_array().unwrap().len(), SEED_TABS.len());
}

#[tokio::test]
async fn json_import_defaults_metadata() {
    let app = app();
    let request = post_json(
        "/api/tabs",
        json!({ "title": "Hurt", "artist": "Johnny Cash", "content": "Am C D\nlyrics" }),
    );

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, tab) = send(&app, get(&format!("/api/tab/{}", body["id"]))).await;
    assert_eq!(tab["type"], "Tab");
    assert_eq!(tab["difficulty"], "Beginner");
    assert_eq!(tab["content"], "Am C D");
}

#[tokio::test]
async fn batch_clean_reports_and_is_stable() {
    let app = app();

    let (status, report) = send(
        &app,
        Request::post("/api/tabs/clean?dry_run=true")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report, json!({ "total": SEED_TABS.len(), "changed": 0 }));

    let (status, report) = send(
        &app,
        Request::post("/api/tabs/clean").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["changed"], 0);
}

#[tokio::test]
async fn bad_query_string_is_a_client_error() {
    let app = app();
    let (status, body) = send(
        &app,
        Request::post("/api/tabs/clean?dry_run=sometimes")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "bad_request");
}

#[tokio::test]
async fn songs_can_be_listed_fetched_and_added() {
    let app = app();

    let (_, list) = send(&app, get("/api/songs")).await;
    assert_eq!(list.as_array().unwrap().len(), SEED_SONGS.len());

    let (status, created) = send(
        &app,
        post_json(
            "/api/songs",
            json!({ "title": "Zombie", "artist": "The Cranberries", "chords": "Em C G D" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, song) = send(&app, get(&format!("/api/song/{}", created["id"]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(song["chords"], "Em C G D");

    let (status, body) = send(
        &app,
        post_json("/api/songs", json!({ "title": "No chords" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["missing_fields"], json!(["artist", "chords"]));
}
