mod common;

use axum::http::StatusCode;
use common::{ids, response_json, TestApp};
use serde_json::{json, Value};

fn event(client_id: i64, start_at: &str, work: &str) -> Value {
    json!({
        "client_id": client_id,
        "start_at": start_at,
        "work_description": work,
        "technician_name": "Nadia",
        "car_registration": "EF-456-GH"
    })
}

#[tokio::test]
async fn events_are_listed_by_start_time() {
    let app = TestApp::new().await;
    let client_id = app.create_client("Leroy").await;

    let late = app
        .create("/api/planning", event(client_id, "2030-03-05T14:00:00Z", "Géométrie"))
        .await["id"]
        .as_i64()
        .unwrap();
    let early = app
        .create("/api/planning", event(client_id, "2030-03-01T08:30:00Z", "Vidange"))
        .await["id"]
        .as_i64()
        .unwrap();
    let middle = app
        .create("/api/planning", event(client_id, "2030-03-03T10:00:00Z", "Freinage"))
        .await["id"]
        .as_i64()
        .unwrap();

    let listed = app.fetch("/api/planning").await;
    assert_eq!(ids(&listed), vec![early, middle, late]);

    let window = app
        .fetch("/api/planning?from=2030-03-02T00:00:00Z&to=2030-03-04T00:00:00Z")
        .await;
    assert_eq!(ids(&window), vec![middle]);

    let searched = app.fetch("/api/planning?q=vidange").await;
    assert_eq!(ids(&searched), vec![early]);
}

#[tokio::test]
async fn events_filter_by_client() {
    let app = TestApp::new().await;
    let leroy = app.create_client("Leroy").await;
    let moreau = app.create_client("Moreau").await;

    app.create("/api/planning", event(leroy, "2030-04-01T09:00:00Z", "Vidange"))
        .await;
    let theirs = app
        .create("/api/planning", event(moreau, "2030-04-02T09:00:00Z", "Pneus"))
        .await["id"]
        .as_i64()
        .unwrap();

    let listed = app.fetch(&format!("/api/planning?client_id={moreau}")).await;
    assert_eq!(ids(&listed), vec![theirs]);
}

#[tokio::test]
async fn rejects_inverted_ranges() {
    let app = TestApp::new().await;
    let client_id = app.create_client("Leroy").await;

    let mut body = event(client_id, "2030-03-01T10:00:00Z", "Vidange");
    body["end_at"] = json!("2030-03-01T09:00:00Z");
    let response = app.post("/api/planning", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .get("/api/planning?from=2030-03-02T00:00:00Z&to=2030-03-01T00:00:00Z")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post("/api/planning", event(999, "2030-03-01T10:00:00Z", "Vidange"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn event_update_and_delete() {
    let app = TestApp::new().await;
    let client_id = app.create_client("Leroy").await;
    let id = app
        .create("/api/planning", event(client_id, "2030-03-01T10:00:00Z", "Vidange"))
        .await["id"]
        .as_i64()
        .unwrap();

    let mut body = event(client_id, "2030-03-01T10:00:00Z", "Vidange et filtres");
    body["end_at"] = json!("2030-03-01T11:30:00Z");
    let response = app.put(&format!("/api/planning/{id}"), body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = response_json(response).await;
    assert_eq!(updated["data"]["work_description"], "Vidange et filtres");
    assert!(updated["data"]["end_at"].is_string());

    let fetched = app.fetch(&format!("/api/planning/{id}")).await;
    assert_eq!(fetched["technician_name"], "Nadia");

    assert_eq!(
        app.delete(&format!("/api/planning/{id}")).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        app.get(&format!("/api/planning/{id}")).await.status(),
        StatusCode::NOT_FOUND
    );
}
