mod common;

use axum::http::StatusCode;
use common::{response_json, TestApp};
use serde_json::json;
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

async fn app_with_ai(server: &MockServer) -> TestApp {
    let base_url = format!("{}/v1/", server.uri());
    TestApp::with_config(move |cfg| {
        cfg.ai_api_key = Some("test-key".to_string());
        cfg.ai_base_url = base_url;
    })
    .await
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

#[tokio::test]
async fn returns_the_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_string_contains("Aucun client s"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "  Proposez un contrôle des freins.  ",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_with_ai(&server).await;
    let response = app
        .post(
            "/api/ia/conseil",
            json!({ "message": "Que proposer au prochain client ?" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["advice"], "Proposez un contrôle des freins.");
}

#[tokio::test]
async fn client_context_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Client Jean Dupont"))
        .and(body_string_contains("AB-123-CD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Rappeler M. Dupont.")))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_with_ai(&server).await;
    let client_id = app.create_client("Dupont").await;
    app.create(
        "/api/planning",
        json!({
            "client_id": client_id,
            "start_at": "2099-01-15T09:00:00Z",
            "work_description": "Contrôle freinage",
            "technician_name": "Marc",
            "car_registration": "AB-123-CD"
        }),
    )
    .await;

    let response = app
        .post(
            "/api/ia/conseil",
            json!({ "message": "Que dire au client ?", "client_id": client_id }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["advice"], "Rappeler M. Dupont.");
}

#[tokio::test]
async fn unavailable_without_api_key() {
    let app = TestApp::with_config(|cfg| cfg.ai_api_key = None).await;

    let response = app
        .post("/api/ia/conseil", json!({ "message": "Bonjour" }))
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn upstream_failures_are_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let app = app_with_ai(&server).await;
    let response = app
        .post("/api/ia/conseil", json!({ "message": "Bonjour" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn empty_answer_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let app = app_with_ai(&server).await;
    let response = app
        .post("/api/ia/conseil", json!({ "message": "Bonjour" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn validates_before_calling_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("jamais")))
        .expect(0)
        .mount(&server)
        .await;

    let app = app_with_ai(&server).await;

    let response = app
        .post("/api/ia/conseil", json!({ "message": "   " }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post("/api/ia/conseil", json!({ "message": "Bonjour", "client_id": 404 }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
