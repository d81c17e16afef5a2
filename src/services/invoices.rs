use super::{
    find_or_not_found, normalize_optional_string, normalize_string, validate_decimal_non_negative,
    validate_decimal_positive, validate_not_blank,
};
use crate::{
    db::SearchBuilder,
    entities::{
        client, invoice, invoice_line, Client, ClientModel, Invoice, InvoiceLine,
        InvoiceLineModel, InvoiceModel, LaborRate, Part,
    },
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set, TransactionTrait,
};
use sea_orm::sea_query::JoinType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// French standard VAT rate applied to every invoice
pub const VAT_RATE: Decimal = dec!(0.20);

/// Rounds a monetary amount to cents, halves away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest amount a `DECIMAL(14, 2)` total column holds
pub const MAX_TOTAL: Decimal = dec!(999999999999.99);

pub fn line_total(quantity: Decimal, unit_price_ht: Decimal) -> Result<Decimal, ServiceError> {
    quantity
        .checked_mul(unit_price_ht)
        .map(round_money)
        .filter(|total| total.abs() <= MAX_TOTAL)
        .ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "line total of {} x {} exceeds {}",
                quantity, unit_price_ht, MAX_TOTAL
            ))
        })
}

/// Sum of stored amounts
pub fn add_money(a: Decimal, b: Decimal) -> Result<Decimal, ServiceError> {
    a.checked_add(b)
        .ok_or_else(|| ServiceError::InternalError(format!("overflow adding {} and {}", a, b)))
}

pub fn sum_money<I>(amounts: I) -> Result<Decimal, ServiceError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, add_money)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct InvoiceTotals {
    pub total_ht: Decimal,
    pub vat: Decimal,
    pub total_ttc: Decimal,
}

impl InvoiceTotals {
    /// Totals from already rounded line totals
    pub fn from_line_totals<I>(line_totals: I) -> Result<Self, ServiceError>
    where
        I: IntoIterator<Item = Decimal>,
    {
        let too_large =
            || ServiceError::ValidationError(format!("invoice total exceeds {}", MAX_TOTAL));

        let total_ht = line_totals
            .into_iter()
            .try_fold(Decimal::ZERO, |acc, total| acc.checked_add(total))
            .filter(|total| total.abs() <= MAX_TOTAL)
            .ok_or_else(too_large)?;
        let total_ttc = total_ht
            .checked_mul(Decimal::ONE + VAT_RATE)
            .map(round_money)
            .filter(|total| total.abs() <= MAX_TOTAL)
            .ok_or_else(too_large)?;

        Ok(Self {
            total_ht,
            vat: total_ttc - total_ht,
            total_ttc,
        })
    }

    pub fn of_invoice(invoice: &InvoiceModel) -> Self {
        Self {
            total_ht: invoice.total_ht,
            vat: invoice.total_ttc - invoice.total_ht,
            total_ttc: invoice.total_ttc,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct InvoiceLineInput {
    #[validate(custom = "validate_not_blank")]
    pub description: String,
    #[validate(custom = "validate_decimal_positive")]
    pub quantity: Decimal,
    #[validate(custom = "validate_decimal_non_negative")]
    pub unit_price_ht: Decimal,
    /// Billed part; exclusive with `labor_rate_id`
    #[serde(default)]
    pub part_id: Option<i32>,
    #[serde(default)]
    pub labor_rate_id: Option<i32>,
}

/// Invoice header and lines. Totals are always recomputed server-side.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct InvoiceInput {
    #[validate(custom = "validate_not_blank")]
    pub invoice_number: String,
    pub client_id: i32,
    /// Defaults to now
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    pub lines: Vec<InvoiceLineInput>,
}

impl InvoiceInput {
    fn check(&self) -> Result<(), ServiceError> {
        self.validate()?;

        if self.lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "an invoice needs at least one line".to_string(),
            ));
        }

        for (index, line) in self.lines.iter().enumerate() {
            line.validate().map_err(|e| {
                ServiceError::ValidationError(format!("lines[{}]: {}", index, e))
            })?;
            if line.part_id.is_some() && line.labor_rate_id.is_some() {
                return Err(ServiceError::ValidationError(format!(
                    "lines[{}]: a line references either a part or a labor rate, not both",
                    index
                )));
            }
        }

        Ok(())
    }

    /// Rejects amounts that overflow before anything is written
    fn totals(&self) -> Result<InvoiceTotals, ServiceError> {
        let line_totals = self
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                line_total(line.quantity, line.unit_price_ht).map_err(|_| {
                    ServiceError::ValidationError(format!(
                        "lines[{}]: line total exceeds {}",
                        index, MAX_TOTAL
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        InvoiceTotals::from_line_totals(line_totals)
    }
}

/// An invoice together with its lines
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceWithLines {
    #[serde(flatten)]
    pub invoice: InvoiceModel,
    pub lines: Vec<InvoiceLineModel>,
}

/// What the PDF renderer needs about one invoice
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    pub invoice: InvoiceModel,
    pub client: ClientModel,
    pub lines: Vec<InvoiceLineModel>,
}

/// Invoice count and billed amount of one client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientBilling {
    pub invoice_count: u64,
    pub total_ht: Decimal,
    pub total_ttc: Decimal,
}

#[derive(Clone)]
pub struct InvoiceService {
    db: Arc<DatabaseConnection>,
}

impl InvoiceService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(invoice_number = %input.invoice_number))]
    pub async fn create(&self, input: InvoiceInput) -> Result<InvoiceWithLines, ServiceError> {
        input.check()?;
        let totals = input.totals()?;

        let txn = self.db.begin().await?;

        find_or_not_found::<Client, _>(&txn, input.client_id, "Client").await?;
        ensure_number_available(&txn, input.invoice_number.trim(), None).await?;
        ensure_line_references(&txn, &input.lines).await?;

        let header = invoice::ActiveModel {
            invoice_number: Set(normalize_string(input.invoice_number)),
            client_id: Set(input.client_id),
            issued_at: Set(input.issued_at.unwrap_or_else(Utc::now)),
            notes: Set(normalize_optional_string(input.notes)),
            total_ht: Set(totals.total_ht),
            total_ttc: Set(totals.total_ttc),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let lines = insert_lines(&txn, header.id, input.lines).await?;
        txn.commit().await?;

        info!(
            invoice_id = header.id,
            total_ht = %totals.total_ht,
            total_ttc = %totals.total_ttc,
            "Invoice created"
        );

        Ok(InvoiceWithLines {
            invoice: header,
            lines,
        })
    }

    /// Matches the invoice number or the client's last name
    #[instrument(skip(self))]
    pub async fn list(&self, q: Option<&str>) -> Result<Vec<InvoiceModel>, ServiceError> {
        let mut query = Invoice::find().join(JoinType::InnerJoin, invoice::Relation::Client.def());
        if let Some(condition) = SearchBuilder::for_connection(&*self.db)
            .add_like(invoice::Column::InvoiceNumber, q.unwrap_or_default())
            .add_like(client::Column::LastName, q.unwrap_or_default())
            .build()
        {
            query = query.filter(condition);
        }

        Ok(query
            .order_by_asc(invoice::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<InvoiceWithLines, ServiceError> {
        let invoice = find_or_not_found::<Invoice, _>(&*self.db, id, "Invoice").await?;
        let lines = load_lines(&*self.db, id).await?;
        Ok(InvoiceWithLines { invoice, lines })
    }

    #[instrument(skip(self))]
    pub async fn document(&self, id: i32) -> Result<InvoiceDocument, ServiceError> {
        let InvoiceWithLines { invoice, lines } = self.get(id).await?;
        let client = invoice
            .find_related(Client)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Client", invoice.client_id))?;

        Ok(InvoiceDocument {
            invoice,
            client,
            lines,
        })
    }

    /// Replaces the header and every line, then recomputes the totals
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: InvoiceInput,
    ) -> Result<InvoiceWithLines, ServiceError> {
        input.check()?;
        let totals = input.totals()?;

        let txn = self.db.begin().await?;

        let existing = find_or_not_found::<Invoice, _>(&txn, id, "Invoice").await?;
        find_or_not_found::<Client, _>(&txn, input.client_id, "Client").await?;
        ensure_number_available(&txn, input.invoice_number.trim(), Some(id)).await?;
        ensure_line_references(&txn, &input.lines).await?;

        InvoiceLine::delete_many()
            .filter(invoice_line::Column::InvoiceId.eq(id))
            .exec(&txn)
            .await?;

        let issued_at = input.issued_at.unwrap_or(existing.issued_at);
        let mut header: invoice::ActiveModel = existing.into();
        header.invoice_number = Set(normalize_string(input.invoice_number));
        header.client_id = Set(input.client_id);
        header.issued_at = Set(issued_at);
        header.notes = Set(normalize_optional_string(input.notes));
        header.total_ht = Set(totals.total_ht);
        header.total_ttc = Set(totals.total_ttc);
        let header = header.update(&txn).await?;

        let lines = insert_lines(&txn, id, input.lines).await?;
        txn.commit().await?;

        info!(invoice_id = id, total_ttc = %totals.total_ttc, "Invoice updated");
        Ok(InvoiceWithLines {
            invoice: header,
            lines,
        })
    }

    /// Removes the invoice and its lines
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let existing = find_or_not_found::<Invoice, _>(&txn, id, "Invoice").await?;
        InvoiceLine::delete_many()
            .filter(invoice_line::Column::InvoiceId.eq(id))
            .exec(&txn)
            .await?;
        existing.delete(&txn).await?;
        txn.commit().await?;

        info!(invoice_id = id, "Invoice deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn billing_for_client(&self, client_id: i32) -> Result<ClientBilling, ServiceError> {
        let invoices = Invoice::find()
            .filter(invoice::Column::ClientId.eq(client_id))
            .all(&*self.db)
            .await?;

        Ok(ClientBilling {
            invoice_count: invoices.len() as u64,
            total_ht: sum_money(invoices.iter().map(|i| i.total_ht))?,
            total_ttc: sum_money(invoices.iter().map(|i| i.total_ttc))?,
        })
    }
}

async fn load_lines<C: ConnectionTrait>(
    db: &C,
    invoice_id: i32,
) -> Result<Vec<InvoiceLineModel>, ServiceError> {
    Ok(InvoiceLine::find()
        .filter(invoice_line::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(invoice_line::Column::Id)
        .all(db)
        .await?)
}

async fn insert_lines(
    txn: &DatabaseTransaction,
    invoice_id: i32,
    lines: Vec<InvoiceLineInput>,
) -> Result<Vec<InvoiceLineModel>, ServiceError> {
    let mut inserted = Vec::with_capacity(lines.len());
    for line in lines {
        let model = invoice_line::ActiveModel {
            invoice_id: Set(invoice_id),
            description: Set(normalize_string(line.description)),
            quantity: Set(line.quantity),
            unit_price_ht: Set(line.unit_price_ht),
            line_total_ht: Set(line_total(line.quantity, line.unit_price_ht)?),
            part_id: Set(line.part_id),
            labor_rate_id: Set(line.labor_rate_id),
            ..Default::default()
        };
        inserted.push(model.insert(txn).await?);
    }
    Ok(inserted)
}

async fn ensure_number_available<C: ConnectionTrait>(
    db: &C,
    number: &str,
    exclude: Option<i32>,
) -> Result<(), ServiceError> {
    let mut query = Invoice::find().filter(invoice::Column::InvoiceNumber.eq(number));
    if let Some(id) = exclude {
        query = query.filter(invoice::Column::Id.ne(id));
    }

    if query.count(db).await? > 0 {
        return Err(ServiceError::Conflict(format!(
            "Invoice number '{}' already exists",
            number
        )));
    }
    Ok(())
}

async fn ensure_line_references<C: ConnectionTrait>(
    db: &C,
    lines: &[InvoiceLineInput],
) -> Result<(), ServiceError> {
    for line in lines {
        if let Some(part_id) = line.part_id {
            find_or_not_found::<Part, _>(db, part_id, "Part").await?;
        }
        if let Some(labor_rate_id) = line.labor_rate_id {
            find_or_not_found::<LaborRate, _>(db, labor_rate_id, "Labor rate").await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn line(quantity: Decimal, unit_price_ht: Decimal) -> InvoiceLineInput {
        InvoiceLineInput {
            description: "Plaquettes de frein".into(),
            quantity,
            unit_price_ht,
            part_id: None,
            labor_rate_id: None,
        }
    }

    fn invoice(lines: Vec<InvoiceLineInput>) -> InvoiceInput {
        InvoiceInput {
            invoice_number: "F-2024-001".into(),
            client_id: 1,
            issued_at: None,
            notes: None,
            lines,
        }
    }

    #[rstest]
    #[case(dec!(1), dec!(100), dec!(100.00))]
    #[case(dec!(2), dec!(45.50), dec!(91.00))]
    #[case(dec!(1.5), dec!(60), dec!(90.00))]
    #[case(dec!(3), dec!(0.335), dec!(1.01))]
    #[case(dec!(1), dec!(0.005), dec!(0.01))]
    #[case(dec!(0.25), dec!(0), dec!(0))]
    fn line_totals_round_half_away_from_zero(
        #[case] quantity: Decimal,
        #[case] unit_price: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(line_total(quantity, unit_price).unwrap(), expected);
    }

    #[test]
    fn overflowing_line_total_is_a_validation_error() {
        assert!(matches!(
            line_total(Decimal::MAX, dec!(2)),
            Err(ServiceError::ValidationError(_))
        ));
        // fits in a Decimal but not in the total column
        assert!(line_total(dec!(9999999999), dec!(9999999999)).is_err());
        assert_eq!(line_total(dec!(1000), dec!(999999999.99)).unwrap(), dec!(999999999990.00));
    }

    #[test]
    fn invoice_total_is_bounded() {
        assert!(InvoiceTotals::from_line_totals(vec![MAX_TOTAL, dec!(0.01)]).is_err());
        // HT fits, TTC does not
        assert!(InvoiceTotals::from_line_totals(vec![dec!(900000000000)]).is_err());

        let err = invoice(vec![line(dec!(1), dec!(1)), line(Decimal::MAX, dec!(2))])
            .totals()
            .unwrap_err();
        assert!(err.to_string().contains("lines[1]"));
    }

    #[test]
    fn money_sums_report_overflow() {
        assert_eq!(sum_money(vec![dec!(1.50), dec!(2.25)]).unwrap(), dec!(3.75));
        assert_eq!(sum_money(Vec::new()).unwrap(), Decimal::ZERO);
        assert!(matches!(
            add_money(Decimal::MAX, dec!(1)),
            Err(ServiceError::InternalError(_))
        ));
    }

    #[rstest]
    #[case(vec![dec!(100)], dec!(100), dec!(120.00))]
    #[case(vec![dec!(91.00), dec!(90.00)], dec!(181.00), dec!(217.20))]
    #[case(vec![dec!(0.01)], dec!(0.01), dec!(0.01))]
    #[case(vec![dec!(0.03)], dec!(0.03), dec!(0.04))]
    #[case(vec![dec!(19.99), dec!(0.02)], dec!(20.01), dec!(24.01))]
    fn invoice_totals_apply_twenty_percent_vat(
        #[case] line_totals: Vec<Decimal>,
        #[case] total_ht: Decimal,
        #[case] total_ttc: Decimal,
    ) {
        let totals = InvoiceTotals::from_line_totals(line_totals).unwrap();
        assert_eq!(totals.total_ht, total_ht);
        assert_eq!(totals.total_ttc, total_ttc);
        assert_eq!(totals.vat, total_ttc - total_ht);
    }

    #[test]
    fn invoice_without_lines_is_rejected() {
        assert!(matches!(
            invoice(vec![]).check(),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let err = invoice(vec![line(dec!(0), dec!(10))]).check().unwrap_err();
        assert!(err.to_string().contains("lines[0]"));
    }

    #[test]
    fn negative_unit_price_is_rejected() {
        assert!(invoice(vec![line(dec!(1), dec!(10)), line(dec!(1), dec!(-1))])
            .check()
            .is_err());
    }

    #[test]
    fn line_cannot_reference_part_and_labor() {
        let mut both = line(dec!(1), dec!(10));
        both.part_id = Some(1);
        both.labor_rate_id = Some(2);
        assert!(invoice(vec![both]).check().is_err());
    }

    #[test]
    fn blank_invoice_number_is_rejected() {
        let mut input = invoice(vec![line(dec!(1), dec!(10))]);
        input.invoice_number = "   ".into();
        assert!(input.check().is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn money() -> impl Strategy<Value = Decimal> {
            (0i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
        }

        fn quantity() -> impl Strategy<Value = Decimal> {
            (1i64..10_000).prop_map(|hundredths| Decimal::new(hundredths, 2))
        }

        proptest! {
            #[test]
            fn totals_are_consistent(lines in prop::collection::vec((quantity(), money()), 1..20)) {
                let line_totals: Vec<Decimal> =
                    lines.iter().map(|(q, pu)| line_total(*q, *pu).unwrap()).collect();
                let totals = InvoiceTotals::from_line_totals(line_totals.clone()).unwrap();

                prop_assert_eq!(totals.total_ht, line_totals.iter().copied().sum::<Decimal>());
                prop_assert_eq!(totals.total_ttc, round_money(totals.total_ht * dec!(1.2)));
                prop_assert!(totals.total_ttc >= totals.total_ht);
                prop_assert!(totals.total_ttc.scale() <= 2);
                prop_assert_eq!(totals.vat + totals.total_ht, totals.total_ttc);
            }
        }
    }
}
