mod common;

use axum::http::StatusCode;
use common::{decimal, ids, response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

async fn create_supplier(app: &TestApp, name: &str) -> i64 {
    app.create(
        "/api/fournisseurs",
        json!({ "name": name, "contact_person": "Claire Martin", "average_delivery_days": 3 }),
    )
    .await["id"]
        .as_i64()
        .unwrap()
}

async fn create_part(app: &TestApp, designation: &str, supplier_id: Option<i64>) -> i64 {
    app.create(
        "/api/pieces",
        json!({
            "designation": designation,
            "reference": "BP-1234",
            "purchase_price": "21.40",
            "sale_price": "45.00",
            "category": "Freinage",
            "supplier_id": supplier_id
        }),
    )
    .await["id"]
        .as_i64()
        .unwrap()
}

async fn bill_part(app: &TestApp, part_id: Option<i64>, labor_rate_id: Option<i64>) {
    let client_id = app.create_client("Dupont").await;
    app.create(
        "/api/factures",
        json!({
            "invoice_number": format!("F-{}-{}", part_id.unwrap_or(0), labor_rate_id.unwrap_or(0)),
            "client_id": client_id,
            "lines": [{
                "description": "Prestation",
                "quantity": "1",
                "unit_price_ht": "10",
                "part_id": part_id,
                "labor_rate_id": labor_rate_id
            }]
        }),
    )
    .await;
}

#[tokio::test]
async fn supplier_names_are_unique() {
    let app = TestApp::new().await;
    let bosch = create_supplier(&app, "Bosch Distribution").await;
    let valeo = create_supplier(&app, "Valeo Service").await;

    let response = app
        .post("/api/fournisseurs", json!({ "name": " Bosch Distribution " }))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .put(
            &format!("/api/fournisseurs/{valeo}"),
            json!({ "name": "Bosch Distribution" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .put(
            &format!("/api/fournisseurs/{bosch}"),
            json!({ "name": "Bosch Distribution", "phone": "0140000000" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["phone"], "0140000000");
    assert_eq!(body["data"]["average_delivery_days"], serde_json::Value::Null);

    let listed = app.fetch("/api/fournisseurs?q=valeo").await;
    assert_eq!(ids(&listed), vec![valeo]);
}

#[tokio::test]
async fn discounts_belong_to_their_supplier() {
    let app = TestApp::new().await;
    let supplier_id = create_supplier(&app, "Bosch Distribution").await;

    let discount = app
        .create(
            &format!("/api/fournisseurs/{supplier_id}/remises"),
            json!({ "part_category": "Freinage", "discount_percent": "12.5" }),
        )
        .await;
    let discount_id = discount["id"].as_i64().unwrap();
    assert_eq!(discount["supplier_id"].as_i64(), Some(supplier_id));
    assert_eq!(decimal(&discount["discount_percent"]), dec!(12.5));

    app.create(
        &format!("/api/fournisseurs/{supplier_id}/remises"),
        json!({ "part_category": "Filtration", "discount_percent": "8" }),
    )
    .await;

    let response = app
        .post(
            &format!("/api/fournisseurs/{supplier_id}/remises"),
            json!({ "part_category": "Freinage", "discount_percent": "120" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post(
            "/api/fournisseurs/999/remises",
            json!({ "part_category": "Freinage", "discount_percent": "5" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .put(
            &format!("/api/remises_fournisseur/{discount_id}"),
            json!({ "part_category": "Freinage", "discount_percent": "15" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(decimal(&body["data"]["discount_percent"]), dec!(15));

    let discounts = app
        .fetch(&format!("/api/fournisseurs/{supplier_id}/remises"))
        .await;
    assert_eq!(discounts.as_array().unwrap().len(), 2);
    assert_eq!(discounts[0]["part_category"], "Freinage");

    let response = app
        .delete(&format!("/api/remises_fournisseur/{discount_id}"))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = app
        .delete(&format!("/api/remises_fournisseur/{discount_id}"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_supplier_removes_its_discounts() {
    let app = TestApp::new().await;
    let supplier_id = create_supplier(&app, "Valeo Service").await;
    app.create(
        &format!("/api/fournisseurs/{supplier_id}/remises"),
        json!({ "part_category": "Éclairage", "discount_percent": "10" }),
    )
    .await;

    let response = app.delete(&format!("/api/fournisseurs/{supplier_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get(&format!("/api/fournisseurs/{supplier_id}/remises"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn supplier_with_parts_cannot_be_deleted() {
    let app = TestApp::new().await;
    let supplier_id = create_supplier(&app, "Bosch Distribution").await;
    create_part(&app, "Plaquettes de frein avant", Some(supplier_id)).await;

    let response = app.delete(&format!("/api/fournisseurs/{supplier_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn part_crud_and_search() {
    let app = TestApp::new().await;
    let supplier_id = create_supplier(&app, "Bosch Distribution").await;
    let pads = create_part(&app, "Plaquettes de frein avant", Some(supplier_id)).await;
    let filter = app
        .create(
            "/api/pieces",
            json!({ "designation": "Filtre à huile", "reference": "OF-220", "sale_price": "12.90" }),
        )
        .await;
    let filter_id = filter["id"].as_i64().unwrap();
    assert_eq!(filter["supplier_id"], serde_json::Value::Null);
    assert_eq!(decimal(&filter["sale_price"]), dec!(12.90));

    let response = app
        .post(
            "/api/pieces",
            json!({ "designation": "Orpheline", "sale_price": "1", "supplier_id": 999 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .post(
            "/api/pieces",
            json!({ "designation": "Négative", "sale_price": "-1" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let found = app.fetch("/api/pieces/search?reference=of-2").await;
    assert_eq!(ids(&found), vec![filter_id]);
    let found = app
        .fetch("/api/pieces/search?designation=plaquettes&reference=BP")
        .await;
    assert_eq!(ids(&found), vec![pads]);
    let found = app.fetch("/api/pieces/search").await;
    assert_eq!(ids(&found), vec![pads, filter_id]);

    let response = app
        .put(
            &format!("/api/pieces/{filter_id}"),
            json!({
                "designation": "Filtre à huile",
                "reference": "OF-220",
                "sale_price": "13.50",
                "supplier_id": supplier_id
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["supplier_id"].as_i64(), Some(supplier_id));

    let response = app.delete(&format!("/api/pieces/{filter_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let listed = app.fetch("/api/pieces").await;
    assert_eq!(ids(&listed), vec![pads]);
}

#[tokio::test]
async fn search_wildcards_match_literally() {
    let app = TestApp::new().await;
    let percent = create_part(&app, "Remise 50%", None).await;
    create_part(&app, "Remise 50 euros", None).await;

    // 50%
    let found = app.fetch("/api/pieces?q=50%25").await;
    assert_eq!(ids(&found), vec![percent]);

    let found = app.fetch("/api/pieces?q=%25").await;
    assert_eq!(ids(&found), vec![percent]);

    let found = app.fetch("/api/pieces?q=_").await;
    assert!(ids(&found).is_empty());

    let found = app.fetch("/api/pieces/search?designation=*").await;
    assert!(ids(&found).is_empty());
}

#[tokio::test]
async fn billed_part_cannot_be_deleted() {
    let app = TestApp::new().await;
    let part_id = create_part(&app, "Ampoule H7", None).await;
    bill_part(&app, Some(part_id), None).await;

    let response = app.delete(&format!("/api/pieces/{part_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn labor_rate_crud_and_usage_guard() {
    let app = TestApp::new().await;

    let rate = app
        .create(
            "/api/maindoeuvre",
            json!({ "description": "Mécanique générale", "hourly_rate": "65" }),
        )
        .await;
    let rate_id = rate["id"].as_i64().unwrap();
    assert_eq!(decimal(&rate["hourly_rate"]), dec!(65));

    let unused = app
        .create(
            "/api/maindoeuvre",
            json!({ "description": "Diagnostic électronique", "hourly_rate": "80" }),
        )
        .await["id"]
        .as_i64()
        .unwrap();

    let response = app
        .post(
            "/api/maindoeuvre",
            json!({ "description": "Gratuit?", "hourly_rate": "-5" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .put(
            &format!("/api/maindoeuvre/{rate_id}"),
            json!({ "description": "Mécanique générale", "hourly_rate": "70" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let listed = app.fetch("/api/maindoeuvre?q=diagnostic").await;
    assert_eq!(ids(&listed), vec![unused]);

    bill_part(&app, None, Some(rate_id)).await;
    let response = app.delete(&format!("/api/maindoeuvre/{rate_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.delete(&format!("/api/maindoeuvre/{unused}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
