//! Seed data script - populates the database with a demo workshop
//!
//! Run with: cargo run --bin seed-data
//!
//! This creates:
//! - 2 suppliers with category discounts
//! - 4 parts and 2 labor rates
//! - 3 clients, an insurer, an expert and 2 technicians
//! - 3 invoices and a week of planning
//! - a revenue target for the current month

use anyhow::Context;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::info;

use garage_api::{
    config,
    db,
    handlers::AppServices,
    services::{
        clients::ClientInput,
        contacts::{ExpertInput, InsurerInput},
        invoices::{InvoiceInput, InvoiceLineInput},
        labor::LaborRateInput,
        parts::PartInput,
        planning::PlanningInput,
        reports::RevenueTargetInput,
        suppliers::{DiscountInput, SupplierInput},
        technicians::TechnicianInput,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("=== Garage API Seed Data ===");

    let cfg = config::load_config().context("loading configuration")?;
    info!("Connecting to database: {}", cfg.database_url());
    let conn = db::establish_connection_from_app_config(&cfg).await?;
    db::run_migrations(&conn).await?;

    let services = AppServices::new(Arc::new(conn), &cfg);

    info!("Creating suppliers...");
    let bosch = services
        .suppliers
        .create(supplier("Bosch Distribution", "Claire Martin", Some(3)))
        .await?;
    let valeo = services
        .suppliers
        .create(supplier("Valeo Service", "Hugo Bernard", Some(5)))
        .await?;
    for (supplier_id, category, percent) in [
        (bosch.id, "Freinage", dec!(12.5)),
        (bosch.id, "Filtration", dec!(8)),
        (valeo.id, "Éclairage", dec!(10)),
    ] {
        services
            .suppliers
            .create_discount(
                supplier_id,
                DiscountInput {
                    part_category: category.into(),
                    discount_percent: percent,
                },
            )
            .await?;
    }

    info!("Creating parts and labor rates...");
    let pads = services
        .parts
        .create(part("Plaquettes de frein avant", "BP-1234", "Freinage", dec!(21.40), dec!(45.00), bosch.id))
        .await?;
    let filter = services
        .parts
        .create(part("Filtre à huile", "OF-220", "Filtration", dec!(4.10), dec!(12.90), bosch.id))
        .await?;
    let bulb = services
        .parts
        .create(part("Ampoule H7", "H7-55W", "Éclairage", dec!(3.20), dec!(9.50), valeo.id))
        .await?;
    services
        .parts
        .create(part("Balai d'essuie-glace", "WB-600", "Visibilité", dec!(6.00), dec!(17.00), valeo.id))
        .await?;

    let mechanics = services
        .labor
        .create(LaborRateInput {
            description: "Mécanique générale".into(),
            hourly_rate: dec!(65),
        })
        .await?;
    let diagnosis = services
        .labor
        .create(LaborRateInput {
            description: "Diagnostic électronique".into(),
            hourly_rate: dec!(80),
        })
        .await?;

    info!("Creating directory records...");
    let dupont = services
        .clients
        .create(client("Dupont", "Jean", "75011", "Paris"))
        .await?;
    let leroy = services
        .clients
        .create(client("Leroy", "Sophie", "69003", "Lyon"))
        .await?;
    services
        .clients
        .create(client("Moreau", "Paul", "33000", "Bordeaux"))
        .await?;

    services
        .insurers
        .create(InsurerInput {
            name: "Assurances du Centre".into(),
            contact_person: Some("Service sinistres".into()),
            phone: Some("0140000000".into()),
            email: Some("sinistres@assurances-centre.fr".into()),
            address: None,
            average_payment_days: Some(30),
        })
        .await?;
    services
        .experts
        .create(ExpertInput {
            name: "Cabinet Expertise Auto".into(),
            contact_person: Some("M. Girard".into()),
            phone: None,
            email: Some("contact@expertise-auto.fr".into()),
            address: None,
            average_response_days: Some(7),
        })
        .await?;

    for (last, first, number, birth) in [
        ("Petit", "Marc", "T-001", NaiveDate::from_ymd_opt(1985, 4, 12)),
        ("Roux", "Nadia", "T-002", NaiveDate::from_ymd_opt(1992, 9, 3)),
    ] {
        let birth_date = birth.context("invalid birth date")?;
        services
            .technicians
            .create(TechnicianInput {
                last_name: last.into(),
                first_name: first.into(),
                address: "1 rue de l'Atelier".into(),
                postal_code: "75011".into(),
                city: "Paris".into(),
                birth_date,
                email: format!("{}.{}@garage.fr", first.to_lowercase(), last.to_lowercase()),
                phone: "0600000000".into(),
                technician_number: number.into(),
            })
            .await?;
    }

    info!("Creating invoices...");
    let now = Utc::now();
    let invoices = [
        InvoiceInput {
            invoice_number: format!("F-{}-001", now.year()),
            client_id: dupont.id,
            issued_at: Some(now - Duration::days(20)),
            notes: Some("Révision 60 000 km".into()),
            lines: vec![
                line("Filtre à huile", dec!(1), dec!(12.90), Some(filter.id), None),
                line("Main-d'œuvre vidange", dec!(0.5), dec!(65), None, Some(mechanics.id)),
            ],
        },
        InvoiceInput {
            invoice_number: format!("F-{}-002", now.year()),
            client_id: leroy.id,
            issued_at: Some(now - Duration::days(5)),
            notes: None,
            lines: vec![
                line("Plaquettes de frein avant", dec!(1), dec!(45.00), Some(pads.id), None),
                line("Remplacement plaquettes", dec!(1.5), dec!(65), None, Some(mechanics.id)),
            ],
        },
        InvoiceInput {
            invoice_number: format!("F-{}-003", now.year()),
            client_id: dupont.id,
            issued_at: None,
            notes: None,
            lines: vec![
                line("Ampoule H7", dec!(2), dec!(9.50), Some(bulb.id), None),
                line("Diagnostic", dec!(1), dec!(80), None, Some(diagnosis.id)),
            ],
        },
    ];
    for input in invoices {
        let created = services.invoices.create(input).await?;
        info!(
            "  {} total TTC {}",
            created.invoice.invoice_number, created.invoice.total_ttc
        );
    }

    info!("Creating planning...");
    for (days, client_id, work, technician, registration) in [
        (1, dupont.id, "Contrôle freinage", "Marc", "AB-123-CD"),
        (2, leroy.id, "Vidange", "Nadia", "EF-456-GH"),
        (4, dupont.id, "Géométrie", "Marc", "AB-123-CD"),
    ] {
        let start_at = now + Duration::days(days);
        services
            .planning
            .create(PlanningInput {
                client_id,
                start_at,
                end_at: Some(start_at + Duration::hours(2)),
                work_description: work.into(),
                technician_name: technician.into(),
                car_registration: registration.into(),
            })
            .await?;
    }

    let first_of_month = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .context("invalid current month")?;
    services
        .reports
        .set_revenue_target(RevenueTargetInput {
            date: first_of_month,
            amount: dec!(15000),
        })
        .await?;

    info!("=== Seed complete ===");
    Ok(())
}

fn supplier(name: &str, contact: &str, delivery_days: Option<i32>) -> SupplierInput {
    SupplierInput {
        name: name.into(),
        contact_person: Some(contact.into()),
        phone: None,
        email: None,
        address: None,
        average_delivery_days: delivery_days,
    }
}

fn part(
    designation: &str,
    reference: &str,
    category: &str,
    purchase: rust_decimal::Decimal,
    sale: rust_decimal::Decimal,
    supplier_id: i32,
) -> PartInput {
    PartInput {
        designation: designation.into(),
        reference: Some(reference.into()),
        purchase_price: Some(purchase),
        sale_price: sale,
        category: Some(category.into()),
        supplier_id: Some(supplier_id),
    }
}

fn client(last: &str, first: &str, postal_code: &str, city: &str) -> ClientInput {
    ClientInput {
        last_name: last.into(),
        first_name: Some(first.into()),
        phone: None,
        email: Some(format!("{}.{}@example.fr", first.to_lowercase(), last.to_lowercase())),
        address: None,
        postal_code: Some(postal_code.into()),
        city: Some(city.into()),
        country: Some("France".into()),
    }
}

fn line(
    description: &str,
    quantity: rust_decimal::Decimal,
    unit_price_ht: rust_decimal::Decimal,
    part_id: Option<i32>,
    labor_rate_id: Option<i32>,
) -> InvoiceLineInput {
    InvoiceLineInput {
        description: description.into(),
        quantity,
        unit_price_ht,
        part_id,
        labor_rate_id,
    }
}
