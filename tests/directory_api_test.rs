mod common;

use axum::http::StatusCode;
use common::{ids, response_json, TestApp};
use serde_json::json;

fn technician(number: &str, last_name: &str) -> serde_json::Value {
    json!({
        "last_name": last_name,
        "first_name": "Marc",
        "address": "1 rue de l'Atelier",
        "postal_code": "75011",
        "city": "Paris",
        "birth_date": "1985-04-12",
        "email": "marc@garage.fr",
        "phone": "0600000000",
        "technician_number": number
    })
}

#[tokio::test]
async fn client_crud_round_trip() {
    let app = TestApp::new().await;

    let created = app
        .create(
            "/api/clients",
            json!({
                "last_name": "  Dupont ",
                "first_name": "Jean",
                "phone": "0102030405",
                "city": "Paris",
                "postal_code": "75011"
            }),
        )
        .await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["last_name"], "Dupont");
    assert_eq!(created["email"], serde_json::Value::Null);

    let fetched = app.fetch(&format!("/api/clients/{id}")).await;
    assert_eq!(fetched["phone"], "0102030405");

    let response = app
        .put(
            &format!("/api/clients/{id}"),
            json!({ "last_name": "Dupont", "first_name": "Jeanne", "city": "Lyon" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = response_json(response).await;
    assert_eq!(updated["success"], true);
    assert_eq!(updated["data"]["first_name"], "Jeanne");
    assert_eq!(updated["data"]["city"], "Lyon");
    assert_eq!(updated["data"]["postal_code"], serde_json::Value::Null);

    let response = app.delete(&format!("/api/clients/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get(&format!("/api/clients/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn client_requires_a_last_name() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/clients", json!({ "last_name": "   ", "first_name": "Jean" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.post("/api/clients", json!({ "first_name": "Jean" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn client_list_filters_and_search() {
    let app = TestApp::new().await;
    let dupont = app.create_client("Dupont").await;
    let durand = app.create_client("Durand").await;
    app.create(
        "/api/clients",
        json!({ "last_name": "Martin", "first_name": "Luc", "postal_code": "69003" }),
    )
    .await;

    let all = app.fetch("/api/clients").await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let filtered = app.fetch("/api/clients?q=du").await;
    assert_eq!(ids(&filtered), vec![dupont, durand]);

    let response = app
        .post("/api/clients/search", json!({ "last_name": "dur" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let found = response_json(response).await;
    assert_eq!(ids(&found["data"]), vec![durand]);

    let response = app
        .post(
            "/api/clients/search",
            json!({ "first_name": "luc", "postal_code": "69003" }),
        )
        .await;
    let found = response_json(response).await;
    assert_eq!(found["data"].as_array().unwrap().len(), 1);
    assert_eq!(found["data"][0]["last_name"], "Martin");

    let response = app
        .post(
            "/api/clients/search",
            json!({ "last_name": "Martin", "postal_code": "75011" }),
        )
        .await;
    let found = response_json(response).await;
    assert!(found["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn accented_names_are_found_in_any_case() {
    let app = TestApp::new().await;
    let emile = app.create_client("Émile").await;
    app.create_client("Emile").await;

    // Émile, émile, ÉMILE
    for q in ["%C3%89mile", "%C3%A9mile", "%C3%89MILE"] {
        let found = app.fetch(&format!("/api/clients?q={q}")).await;
        assert_eq!(ids(&found), vec![emile], "q={q}");
    }

    let response = app
        .post("/api/clients/search", json!({ "last_name": "émile" }))
        .await;
    let found = response_json(response).await;
    assert_eq!(ids(&found["data"]), vec![emile]);
}

#[tokio::test]
async fn client_with_planning_cannot_be_deleted() {
    let app = TestApp::new().await;
    let client_id = app.create_client("Leroy").await;
    app.create(
        "/api/planning",
        json!({
            "client_id": client_id,
            "start_at": "2030-03-01T09:00:00Z",
            "work_description": "Vidange",
            "technician_name": "Marc",
            "car_registration": "AB-123-CD"
        }),
    )
    .await;

    let response = app.delete(&format!("/api/clients/{client_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    app.fetch(&format!("/api/clients/{client_id}")).await;
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let app = TestApp::new().await;

    let response = app
        .put("/api/clients/999", json!({ "last_name": "Nobody" }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.delete("/api/clients/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/api/clients/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn insurer_and_expert_crud() {
    let app = TestApp::new().await;

    let insurer = app
        .create(
            "/api/assureurs",
            json!({ "name": "Assurances du Centre", "average_payment_days": 30 }),
        )
        .await;
    let insurer_id = insurer["id"].as_i64().unwrap();
    assert_eq!(insurer["average_payment_days"], 30);

    let response = app
        .put(
            &format!("/api/assureurs/{insurer_id}"),
            json!({ "name": "Assurances du Centre", "email": "sinistres@centre.fr" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["email"], "sinistres@centre.fr");

    let expert = app
        .create(
            "/api/experts",
            json!({ "name": "Cabinet Expertise Auto", "average_response_days": 7 }),
        )
        .await;
    let expert_id = expert["id"].as_i64().unwrap();

    let experts = app.fetch("/api/experts?q=expertise").await;
    assert_eq!(ids(&experts), vec![expert_id]);

    let response = app.post("/api/experts", json!({ "name": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(
        app.delete(&format!("/api/experts/{expert_id}")).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        app.delete(&format!("/api/assureurs/{insurer_id}")).await.status(),
        StatusCode::NO_CONTENT
    );
    assert!(app.fetch("/api/assureurs").await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn technician_numbers_are_unique() {
    let app = TestApp::new().await;

    let first = app
        .create("/api/techniciens", technician("T-001", "Petit"))
        .await;
    assert_eq!(first["birth_date"], "1985-04-12");
    let second = app
        .create("/api/techniciens", technician("T-002", "Roux"))
        .await;
    let second_id = second["id"].as_i64().unwrap();

    let response = app
        .post("/api/techniciens", technician("T-001", "Autre"))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .put(
            &format!("/api/techniciens/{second_id}"),
            technician("T-001", "Roux"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Keeping its own number is not a conflict
    let response = app
        .put(
            &format!("/api/techniciens/{second_id}"),
            technician("T-002", "Roux-Martin"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let listed = app.fetch("/api/techniciens?q=roux").await;
    assert_eq!(ids(&listed), vec![second_id]);
}

#[tokio::test]
async fn health_status_and_request_id() {
    let app = TestApp::new().await;

    let response = app.get("/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = response_json(response).await;
    assert_eq!(body["data"]["checks"]["database"], "healthy");

    let response = app.get("/api/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "ok");

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
}
