use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use super::parser::{self, parse_cell};
use crate::ir::{CategoryPath, Leg, NormalizedRecord};

/// A row of a ZenMoney CSV export, keyed by column name. Columns the export doesn't have are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawRecord {
    pub date: String,
    pub category_name: String,
    pub payee: String,
    pub comment: String,
    pub outcome_account_name: String,
    pub outcome: String,
    pub outcome_currency_short_title: String,
    pub income_account_name: String,
    pub income: String,
    pub income_currency_short_title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Outcome,
    Income,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Outcome => f.write_str("outcome"),
            Side::Income => f.write_str("income"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRecordError {
    #[error("Missing date")]
    MissingDate,
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),
    #[error("Invalid {side} amount: {content:?}")]
    InvalidAmount { side: Side, content: String },
    #[error("The {side} amount has no account name")]
    MissingAccountName { side: Side },
    #[error("The {side} amount has no currency")]
    MissingCurrency { side: Side },
    #[error("Neither an outcome nor an income amount is present")]
    NoLegs,
}

pub fn normalize(raw: &RawRecord) -> Result<NormalizedRecord, MalformedRecordError> {
    let date = non_empty(&raw.date).ok_or(MalformedRecordError::MissingDate)?;
    let date = parse_cell(parser::date(), date)
        .map_err(|_| MalformedRecordError::InvalidDate(date.to_string()))?;

    let outcome = leg(
        Side::Outcome,
        &raw.outcome_account_name,
        &raw.outcome,
        &raw.outcome_currency_short_title,
    )?;
    let income = leg(
        Side::Income,
        &raw.income_account_name,
        &raw.income,
        &raw.income_currency_short_title,
    )?;
    if outcome.is_none() && income.is_none() {
        return Err(MalformedRecordError::NoLegs);
    }

    Ok(NormalizedRecord {
        date,
        payee: non_empty(&raw.payee).map(str::to_string),
        memo: non_empty(&raw.comment).map(str::to_string),
        category: non_empty(&raw.category_name).and_then(CategoryPath::parse),
        outcome,
        income,
    })
}

/// ZenMoney fills the unused side of an expense or income with a zero amount,
/// so a zero amount means there is no leg, same as an empty one.
fn leg(
    side: Side,
    account_name: &str,
    amount: &str,
    currency: &str,
) -> Result<Option<Leg>, MalformedRecordError> {
    let Some(amount) = non_empty(amount) else {
        return Ok(None);
    };
    let amount: Decimal =
        parse_cell(parser::amount(), amount).map_err(|_| MalformedRecordError::InvalidAmount {
            side,
            content: amount.to_string(),
        })?;
    if amount.is_zero() {
        return Ok(None);
    }
    let account_name =
        non_empty(account_name).ok_or(MalformedRecordError::MissingAccountName { side })?;
    let currency = non_empty(currency).ok_or(MalformedRecordError::MissingCurrency { side })?;
    Ok(Some(Leg {
        account_name: account_name.to_string(),
        amount,
        currency: currency.to_string(),
    }))
}

fn non_empty(field: &str) -> Option<&str> {
    let field = field.trim();
    if field.is_empty() {
        None
    } else {
        Some(field)
    }
}
