use thiserror::Error;

pub mod args;
pub mod classify;
pub mod cli;
pub mod config;
pub mod export;
pub mod import;
pub mod ir;
pub mod operations;

use classify::{classify, AccountMapping, AmbiguousRecordError};
use import::{normalize, MalformedRecordError, RawRecord};
use ir::Transaction;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Malformed record: {0}")]
    Malformed(#[from] MalformedRecordError),
    #[error("Ambiguous record: {0}")]
    Ambiguous(#[from] AmbiguousRecordError),
}

/// Convert a single ZenMoney row. Rows don't depend on each other, so callers may convert
/// them in any order or in parallel, sharing the same mapping.
pub fn convert_record(
    raw: &RawRecord,
    mapping: &AccountMapping,
) -> Result<Transaction, RecordError> {
    let record = normalize(raw)?;
    Ok(classify(&record, mapping)?)
}

#[cfg(test)]
mod tests {
    use common_macros::{b_tree_map, hash_map};
    use rust_decimal::Decimal;

    use super::*;
    use crate::import::testutils::raw_record;
    use crate::ir::{Classification, Posting};

    fn mapping() -> AccountMapping {
        AccountMapping::new(hash_map! {
            "PKO - PLN".to_string() => "Assets:Bank:PKO:PLN".to_string(),
            "PKO - EUR".to_string() => "Assets:Bank:PKO:EUR".to_string(),
            "Cash - PLN".to_string() => "Assets:Cash:PLN".to_string(),
        })
        .with_category_map(b_tree_map! {
            "Food / Groceries".to_string() => "Expenses:Food:Groceries".to_string(),
        })
    }

    const NONE: (&str, &str, &str) = ("", "", "");

    #[test]
    fn expense_scenario() {
        let raw = raw_record(
            "2025-12-14",
            "Food / Groceries",
            "",
            ("PKO - PLN", "1250.00", "PLN"),
            NONE,
        );
        let transaction = convert_record(&raw, &mapping()).unwrap();
        assert_eq!(transaction.classification, Classification::Expense);
        assert_eq!(
            transaction.postings,
            vec![
                Posting::new("Expenses:Food:Groceries", Decimal::new(125000, 2), "PLN"),
                Posting::new("Assets:Bank:PKO:PLN", Decimal::new(-125000, 2), "PLN"),
            ]
        );
        assert_eq!(transaction.postings[1].amount.to_string(), "-1250.00");
    }

    #[test]
    fn transfer_scenario() {
        let raw = raw_record(
            "2025-12-11",
            "",
            "",
            ("PKO - PLN", "20000.00", "PLN"),
            ("Cash - PLN", "20000.00", "PLN"),
        );
        let transaction = convert_record(&raw, &mapping()).unwrap();
        assert_eq!(transaction.classification, Classification::Transfer);
        assert_eq!(
            transaction.postings,
            vec![
                Posting::new("Assets:Cash:PLN", Decimal::new(2000000, 2), "PLN"),
                Posting::new("Assets:Bank:PKO:PLN", Decimal::new(-2000000, 2), "PLN"),
            ]
        );
    }

    #[test]
    fn exchange_scenario() {
        let raw = raw_record(
            "2025-12-12",
            "",
            "",
            ("PKO - PLN", "42500.00", "PLN"),
            ("PKO - EUR", "500.00", "EUR"),
        );
        let transaction = convert_record(&raw, &mapping()).unwrap();
        assert_eq!(transaction.classification, Classification::Exchange);
        assert_eq!(
            transaction.postings,
            vec![
                Posting::new("Assets:Bank:PKO:EUR", Decimal::new(50000, 2), "EUR"),
                Posting::new("Assets:Bank:PKO:PLN", Decimal::new(-4250000, 2), "PLN"),
            ]
        );
    }

    #[test]
    fn malformed_scenario() {
        let raw = raw_record(
            "2025-12-01",
            "Food",
            "Store",
            ("PKO - PLN", "", "PLN"),
            ("PKO - PLN", "", "PLN"),
        );
        assert_eq!(
            convert_record(&raw, &mapping()),
            Err(RecordError::Malformed(MalformedRecordError::NoLegs))
        );
    }

    #[test]
    fn ambiguous_scenario() {
        let raw = raw_record(
            "2025-12-01",
            "",
            "",
            ("PKO - PLN", "100", "PLN"),
            ("PKO - PLN", "100", "PLN"),
        );
        assert_eq!(
            convert_record(&raw, &mapping()),
            Err(RecordError::Ambiguous(AmbiguousRecordError::SameAccount {
                account_name: "PKO - PLN".to_string()
            }))
        );
    }

    #[test]
    fn zero_income_with_same_account_is_an_expense() {
        let mut raw = raw_record(
            "2025-12-01",
            "Bank Fees",
            "",
            ("PKO - PLN", "10", "PLN"),
            ("PKO - PLN", "0", "PLN"),
        );
        raw.comment = "ACCOUNT FEE".to_string();
        let transaction = convert_record(&raw, &mapping()).unwrap();
        assert_eq!(transaction.classification, Classification::Expense);
        assert_eq!(transaction.narration(), "ACCOUNT FEE");
    }

    #[test]
    fn mapping_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AccountMapping>();
    }
}
