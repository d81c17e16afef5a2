// Directory records
pub mod clients;
pub mod contacts;
pub mod technicians;

// Catalogue and purchasing
pub mod labor;
pub mod parts;
pub mod suppliers;

// Workshop calendar
pub mod planning;

// Billing and accounting
pub mod invoices;
pub mod reports;

// External services
pub mod advisor;

use crate::errors::ServiceError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};
use validator::ValidationError;

/// Loads a row by primary key, or fails with "<label> <id> not found".
pub(crate) async fn find_or_not_found<E, C>(
    db: &C,
    id: i32,
    label: &str,
) -> Result<E::Model, ServiceError>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    C: ConnectionTrait,
{
    E::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found(label, id))
}

/// Rejects empty and whitespace-only strings
pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Largest price, quantity or rate a `DECIMAL(12, 2)` column holds
pub const MAX_AMOUNT: Decimal = dec!(9999999999.99);

pub(crate) fn validate_decimal_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("decimal_non_negative");
        err.message = Some("must be zero or greater".into());
        return Err(err);
    }
    validate_decimal_max(value)
}

pub(crate) fn validate_decimal_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("decimal_positive");
        err.message = Some("must be greater than zero".into());
        return Err(err);
    }
    validate_decimal_max(value)
}

fn validate_decimal_max(value: &Decimal) -> Result<(), ValidationError> {
    if *value > MAX_AMOUNT {
        let mut err = ValidationError::new("decimal_max");
        err.message = Some(format!("must not exceed {}", MAX_AMOUNT).into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("percentage");
        err.message = Some("must be between 0 and 100".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn normalize_string(value: String) -> String {
    value.trim().to_string()
}

pub(crate) fn normalize_optional_string(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .and_then(|v| if v.is_empty() { None } else { Some(v) })
}
