use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Garage API",
        version = "0.1.0",
        description = r#"
# Garage management API

REST/JSON backend for a vehicle repair shop.

## Features

- **Directory**: clients, insurers, experts and technicians
- **Catalogue**: spare parts, labor rates, suppliers and their per-category discounts
- **Billing**: invoices whose HT/TTC totals are always computed by the server (20% VAT), with PDF export
- **Planning**: technician interventions per client and vehicle
- **Accounting**: monthly revenue, expenses per supplier, revenue per part category and revenue targets
- **Assistant**: AI advice with optional client context

## Conventions

Successful responses are wrapped in `{success, data, message, errors, meta}`.
Deletes answer `204 No Content`. Decimal amounts are serialized as strings.

## Error Handling

```json
{
  "error": "Conflict",
  "message": "Conflict: Client 3 has 2 invoice(s) and cannot be deleted",
  "request_id": "3f0c…",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Clients", description = "Client records"),
        (name = "Suppliers", description = "Suppliers and supplier discounts"),
        (name = "Insurers", description = "Insurance companies"),
        (name = "Experts", description = "Claims experts"),
        (name = "Technicians", description = "Workshop staff"),
        (name = "Parts", description = "Spare parts catalogue"),
        (name = "Labor", description = "Labor rates"),
        (name = "Planning", description = "Workshop calendar"),
        (name = "Invoices", description = "Invoices, lines and PDF export"),
        (name = "Accounting", description = "Revenue and expense aggregates"),
        (name = "AI", description = "Assistant advice")
    ),
    paths(
        // Clients
        crate::handlers::clients::create_client,
        crate::handlers::clients::list_clients,
        crate::handlers::clients::search_clients,
        crate::handlers::clients::get_client,
        crate::handlers::clients::update_client,
        crate::handlers::clients::delete_client,

        // Suppliers and discounts
        crate::handlers::suppliers::create_supplier,
        crate::handlers::suppliers::list_suppliers,
        crate::handlers::suppliers::get_supplier,
        crate::handlers::suppliers::update_supplier,
        crate::handlers::suppliers::delete_supplier,
        crate::handlers::suppliers::list_discounts,
        crate::handlers::suppliers::create_discount,
        crate::handlers::suppliers::update_discount,
        crate::handlers::suppliers::delete_discount,

        // Insurers and experts
        crate::handlers::contacts::create_insurer,
        crate::handlers::contacts::list_insurers,
        crate::handlers::contacts::get_insurer,
        crate::handlers::contacts::update_insurer,
        crate::handlers::contacts::delete_insurer,
        crate::handlers::contacts::create_expert,
        crate::handlers::contacts::list_experts,
        crate::handlers::contacts::get_expert,
        crate::handlers::contacts::update_expert,
        crate::handlers::contacts::delete_expert,

        // Technicians
        crate::handlers::technicians::create_technician,
        crate::handlers::technicians::list_technicians,
        crate::handlers::technicians::get_technician,
        crate::handlers::technicians::update_technician,
        crate::handlers::technicians::delete_technician,

        // Parts and labor
        crate::handlers::parts::create_part,
        crate::handlers::parts::list_parts,
        crate::handlers::parts::search_parts,
        crate::handlers::parts::get_part,
        crate::handlers::parts::update_part,
        crate::handlers::parts::delete_part,
        crate::handlers::labor::create_labor_rate,
        crate::handlers::labor::list_labor_rates,
        crate::handlers::labor::get_labor_rate,
        crate::handlers::labor::update_labor_rate,
        crate::handlers::labor::delete_labor_rate,

        // Planning
        crate::handlers::planning::create_event,
        crate::handlers::planning::list_events,
        crate::handlers::planning::get_event,
        crate::handlers::planning::update_event,
        crate::handlers::planning::delete_event,

        // Invoices
        crate::handlers::invoices::create_invoice,
        crate::handlers::invoices::list_invoices,
        crate::handlers::invoices::search_invoices,
        crate::handlers::invoices::get_invoice,
        crate::handlers::invoices::update_invoice,
        crate::handlers::invoices::delete_invoice,
        crate::handlers::invoices::invoice_pdf,

        // Accounting
        crate::handlers::reports::monthly_revenue,
        crate::handlers::reports::revenue_by_month,
        crate::handlers::reports::expenses_by_supplier,
        crate::handlers::reports::revenue_by_category,
        crate::handlers::reports::get_revenue_target,
        crate::handlers::reports::set_revenue_target,

        // Assistant
        crate::handlers::advisor::ask_advice,
    ),
    components(
        schemas(
            crate::services::invoices::InvoiceTotals,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let json = serde_json::to_string(&ApiDocV1::openapi()).unwrap();
        assert!(json.contains("Garage API"));
        for path in [
            "/api/clients/{id}",
            "/api/fournisseurs/{id}/remises",
            "/api/remises_fournisseur/{id}",
            "/api/assureurs",
            "/api/experts",
            "/api/techniciens",
            "/api/pieces/search",
            "/api/maindoeuvre",
            "/api/planning",
            "/api/factures/{id}/pdf",
            "/api/comptabilite/objectif-ca",
            "/api/ia/conseil",
        ] {
            assert!(json.contains(path), "missing {path}");
        }
    }
}
