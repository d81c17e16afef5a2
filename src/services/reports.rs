//! Accounting aggregates over invoice lines and the revenue-target record.
//!
//! Sums are accumulated in `Decimal` on the application side so that SQLite
//! (which stores decimals as REAL) and PostgreSQL produce identical figures.

use super::{
    invoices::{add_money, round_money, sum_money},
    validate_decimal_non_negative,
};
use crate::{
    entities::{
        invoice, invoice_line, revenue_target, Invoice, InvoiceLine, Part, RevenueTarget,
        Supplier,
    },
    errors::ServiceError,
};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    /// Defaults to the current UTC year
    pub year: Option<i32>,
    /// 1 to 12, defaults to the current UTC month
    pub month: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct YearQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TargetQuery {
    /// `YYYY-MM-DD`, defaults to today
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    pub total_ht: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthRevenue {
    pub month: u32,
    pub total_ht: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SupplierExpense {
    pub supplier_id: i32,
    pub supplier_name: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRevenue {
    /// `null` for parts without a category
    pub category: Option<String>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RevenueTargetView {
    pub date: NaiveDate,
    /// `null` when no target is recorded for the date
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct RevenueTargetInput {
    pub date: NaiveDate,
    #[validate(custom = "validate_decimal_non_negative")]
    pub amount: Decimal,
}

#[derive(Clone)]
pub struct ReportService {
    db: Arc<DatabaseConnection>,
}

impl ReportService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Revenue of the invoices issued during one calendar month
    #[instrument(skip(self))]
    pub async fn monthly_revenue(
        &self,
        year: i32,
        month: u32,
    ) -> Result<MonthlyRevenue, ServiceError> {
        let (start, end) = month_bounds(year, month)?;
        let lines = InvoiceLine::find()
            .inner_join(Invoice)
            .filter(invoice::Column::IssuedAt.gte(start))
            .filter(invoice::Column::IssuedAt.lt(end))
            .all(&*self.db)
            .await?;

        Ok(MonthlyRevenue {
            year,
            month,
            total_ht: round_money(sum_money(lines.iter().map(|l| l.line_total_ht))?),
        })
    }

    /// Twelve entries, one per month, months without invoices at zero
    #[instrument(skip(self))]
    pub async fn revenue_by_month(&self, year: i32) -> Result<Vec<MonthRevenue>, ServiceError> {
        let (start, _) = month_bounds(year, 1)?;
        let (_, end) = month_bounds(year, 12)?;

        let rows = InvoiceLine::find()
            .find_also_related(Invoice)
            .filter(invoice::Column::IssuedAt.gte(start))
            .filter(invoice::Column::IssuedAt.lt(end))
            .all(&*self.db)
            .await?;

        let mut totals = [Decimal::ZERO; 12];
        for (line, header) in rows {
            if let Some(header) = header {
                let month = &mut totals[header.issued_at.month0() as usize];
                *month = add_money(*month, line.line_total_ht)?;
            }
        }

        Ok(totals
            .into_iter()
            .zip(1u32..)
            .map(|(total, month)| MonthRevenue {
                month,
                total_ht: round_money(total),
            })
            .collect())
    }

    /// Billed part lines grouped by the part's supplier, ordered by supplier name
    #[instrument(skip(self))]
    pub async fn expenses_by_supplier(&self) -> Result<Vec<SupplierExpense>, ServiceError> {
        let names: HashMap<i32, String> = Supplier::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let rows = InvoiceLine::find()
            .find_also_related(Part)
            .filter(invoice_line::Column::PartId.is_not_null())
            .all(&*self.db)
            .await?;

        let mut by_supplier: BTreeMap<(String, i32), Decimal> = BTreeMap::new();
        for (line, part) in rows {
            let Some(supplier_id) = part.and_then(|p| p.supplier_id) else {
                continue;
            };
            let Some(name) = names.get(&supplier_id) else {
                continue;
            };
            let total = by_supplier
                .entry((name.clone(), supplier_id))
                .or_default();
            *total = add_money(*total, line.line_total_ht)?;
        }

        Ok(by_supplier
            .into_iter()
            .map(|((supplier_name, supplier_id), total)| SupplierExpense {
                supplier_id,
                supplier_name,
                total: round_money(total),
            })
            .collect())
    }

    /// Billed part lines grouped by part category; uncategorised parts come first
    #[instrument(skip(self))]
    pub async fn revenue_by_category(&self) -> Result<Vec<CategoryRevenue>, ServiceError> {
        let rows = InvoiceLine::find()
            .find_also_related(Part)
            .filter(invoice_line::Column::PartId.is_not_null())
            .all(&*self.db)
            .await?;

        let mut by_category: BTreeMap<Option<String>, Decimal> = BTreeMap::new();
        for (line, part) in rows {
            if let Some(part) = part {
                let total = by_category.entry(part.category).or_default();
                *total = add_money(*total, line.line_total_ht)?;
            }
        }

        Ok(by_category
            .into_iter()
            .map(|(category, total)| CategoryRevenue {
                category,
                total: round_money(total),
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn revenue_target(&self, date: NaiveDate) -> Result<RevenueTargetView, ServiceError> {
        let target = RevenueTarget::find_by_id(date).one(&*self.db).await?;
        Ok(RevenueTargetView {
            date,
            amount: target.map(|t| t.amount),
        })
    }

    /// Inserts the target for the date or replaces its amount
    #[instrument(skip(self, input), fields(date = %input.date))]
    pub async fn set_revenue_target(
        &self,
        input: RevenueTargetInput,
    ) -> Result<RevenueTargetView, ServiceError> {
        input.validate()?;

        let saved = match RevenueTarget::find_by_id(input.date).one(&*self.db).await? {
            Some(existing) => {
                let mut model: revenue_target::ActiveModel = existing.into();
                model.amount = Set(input.amount);
                model.update(&*self.db).await?
            }
            None => {
                revenue_target::ActiveModel {
                    target_date: Set(input.date),
                    amount: Set(input.amount),
                }
                .insert(&*self.db)
                .await?
            }
        };

        info!(amount = %saved.amount, "Revenue target saved");
        Ok(RevenueTargetView {
            date: saved.target_date,
            amount: Some(saved.amount),
        })
    }
}

/// `[first instant of the month, first instant of the next month)`
fn month_bounds(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>), ServiceError> {
    let invalid = || ServiceError::ValidationError(format!("invalid month {}-{}", year, month));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;

    let start = Utc.from_utc_datetime(&first.and_hms_opt(0, 0, 0).ok_or_else(invalid)?);
    let end = Utc.from_utc_datetime(&next.and_hms_opt(0, 0, 0).ok_or_else(invalid)?);
    Ok((start, end))
}
