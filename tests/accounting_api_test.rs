mod common;

use axum::http::StatusCode;
use common::{decimal, response_json, TestApp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

struct Workshop {
    app: TestApp,
    bosch: i64,
    valeo: i64,
}

/// Two suppliers, three parts and four invoices spread over 2029 and 2030
async fn workshop() -> Workshop {
    let app = TestApp::new().await;
    let client_id = app.create_client("Dupont").await;

    let valeo = app
        .create("/api/fournisseurs", json!({ "name": "Valeo Service" }))
        .await["id"]
        .as_i64()
        .unwrap();
    let bosch = app
        .create("/api/fournisseurs", json!({ "name": "Bosch Distribution" }))
        .await["id"]
        .as_i64()
        .unwrap();
    // Never billed, so absent from the supplier report
    app.create("/api/fournisseurs", json!({ "name": "Atelier Inutilisé" }))
        .await;

    let part = |designation: &str, category: Option<&str>, supplier: i64| {
        json!({
            "designation": designation,
            "sale_price": "10",
            "category": category,
            "supplier_id": supplier
        })
    };
    let pads = app
        .create("/api/pieces", part("Plaquettes", Some("Freinage"), bosch))
        .await["id"]
        .as_i64()
        .unwrap();
    let bulb = app
        .create("/api/pieces", part("Ampoule H7", Some("Éclairage"), valeo))
        .await["id"]
        .as_i64()
        .unwrap();
    let misc = app
        .create("/api/pieces", part("Divers", None, valeo))
        .await["id"]
        .as_i64()
        .unwrap();
    let labor = app
        .create(
            "/api/maindoeuvre",
            json!({ "description": "Mécanique", "hourly_rate": "60" }),
        )
        .await["id"]
        .as_i64()
        .unwrap();

    let invoices = [
        (
            "F-1",
            "2030-05-03T09:00:00Z",
            json!([
                { "description": "Plaquettes", "quantity": "2", "unit_price_ht": "45.50", "part_id": pads },
                { "description": "Pose", "quantity": "1.5", "unit_price_ht": "60", "labor_rate_id": labor }
            ]),
        ),
        (
            "F-2",
            "2030-05-31T23:30:00Z",
            json!([
                { "description": "Ampoule", "quantity": "3", "unit_price_ht": "9.50", "part_id": bulb },
                { "description": "Divers", "quantity": "1", "unit_price_ht": "5", "part_id": misc }
            ]),
        ),
        (
            "F-3",
            "2030-07-14T10:00:00Z",
            json!([
                { "description": "Plaquettes", "quantity": "1", "unit_price_ht": "45.50", "part_id": pads }
            ]),
        ),
        (
            "F-4",
            "2029-12-31T18:00:00Z",
            json!([
                { "description": "Forfait", "quantity": "1", "unit_price_ht": "100" }
            ]),
        ),
    ];
    for (number, issued_at, lines) in invoices {
        app.create(
            "/api/factures",
            json!({
                "invoice_number": number,
                "client_id": client_id,
                "issued_at": issued_at,
                "lines": lines
            }),
        )
        .await;
    }

    Workshop { app, bosch, valeo }
}

fn totals_by_month(months: &Value) -> Vec<Decimal> {
    months
        .as_array()
        .unwrap()
        .iter()
        .map(|m| decimal(&m["total_ht"]))
        .collect()
}

#[tokio::test]
async fn monthly_revenue_covers_the_calendar_month() {
    let Workshop { app, .. } = workshop().await;

    let may = app.fetch("/api/comptabilite/ca-mensuel?year=2030&month=5").await;
    assert_eq!(may["year"], 2030);
    assert_eq!(may["month"], 5);
    // 91.00 + 90.00 + 28.50 + 5.00
    assert_eq!(decimal(&may["total_ht"]), dec!(214.50));

    let june = app.fetch("/api/comptabilite/ca-mensuel?year=2030&month=6").await;
    assert_eq!(decimal(&june["total_ht"]), Decimal::ZERO);

    let december = app
        .fetch("/api/comptabilite/ca-mensuel?year=2029&month=12")
        .await;
    assert_eq!(decimal(&december["total_ht"]), dec!(100));

    let response = app.get("/api/comptabilite/ca-mensuel?year=2030&month=13").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn revenue_by_month_has_twelve_entries() {
    let Workshop { app, .. } = workshop().await;

    let months = app.fetch("/api/comptabilite/ca-par-mois?year=2030").await;
    let entries = months.as_array().unwrap();
    assert_eq!(entries.len(), 12);
    assert_eq!(entries[0]["month"], 1);
    assert_eq!(entries[11]["month"], 12);

    let mut expected = vec![Decimal::ZERO; 12];
    expected[4] = dec!(214.50);
    expected[6] = dec!(45.50);
    assert_eq!(totals_by_month(&months), expected);

    let empty_year = app.fetch("/api/comptabilite/ca-par-mois?year=2031").await;
    assert!(totals_by_month(&empty_year).iter().all(|t| t.is_zero()));
}

#[tokio::test]
async fn expenses_grouped_by_supplier_name() {
    let Workshop { app, bosch, valeo } = workshop().await;

    let expenses = app.fetch("/api/comptabilite/depenses-par-fournisseur").await;
    let rows = expenses.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0]["supplier_name"], "Bosch Distribution");
    assert_eq!(rows[0]["supplier_id"].as_i64(), Some(bosch));
    assert_eq!(decimal(&rows[0]["total"]), dec!(136.50));

    assert_eq!(rows[1]["supplier_name"], "Valeo Service");
    assert_eq!(rows[1]["supplier_id"].as_i64(), Some(valeo));
    assert_eq!(decimal(&rows[1]["total"]), dec!(33.50));
}

#[tokio::test]
async fn revenue_grouped_by_part_category() {
    let Workshop { app, .. } = workshop().await;

    let categories = app.fetch("/api/comptabilite/ca-par-categorie").await;
    let rows = categories.as_array().unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0]["category"], Value::Null);
    assert_eq!(decimal(&rows[0]["total"]), dec!(5));
    assert_eq!(rows[1]["category"], "Freinage");
    assert_eq!(decimal(&rows[1]["total"]), dec!(136.50));
    assert_eq!(rows[2]["category"], "Éclairage");
    assert_eq!(decimal(&rows[2]["total"]), dec!(28.50));
}

#[tokio::test]
async fn revenue_target_upsert() {
    let app = TestApp::new().await;

    let unset = app.fetch("/api/comptabilite/objectif-ca?date=2030-05-01").await;
    assert_eq!(unset["date"], "2030-05-01");
    assert_eq!(unset["amount"], Value::Null);

    let response = app
        .put(
            "/api/comptabilite/objectif-ca",
            json!({ "date": "2030-05-01", "amount": "15000" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = response_json(response).await;
    assert_eq!(decimal(&saved["data"]["amount"]), dec!(15000));

    let response = app
        .put(
            "/api/comptabilite/objectif-ca",
            json!({ "date": "2030-05-01", "amount": "18000.50" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let target = app.fetch("/api/comptabilite/objectif-ca?date=2030-05-01").await;
    assert_eq!(decimal(&target["amount"]), dec!(18000.50));

    let other_day = app.fetch("/api/comptabilite/objectif-ca?date=2030-06-01").await;
    assert_eq!(other_day["amount"], Value::Null);

    let response = app
        .put(
            "/api/comptabilite/objectif-ca",
            json!({ "date": "2030-05-01", "amount": "-1" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
