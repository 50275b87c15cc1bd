use thiserror::Error;

mod mapping;
mod refund;

pub use mapping::{
    AccountMapping, DEFAULT_BASE_ACCOUNT, DEFAULT_EXPENSE_ACCOUNT, DEFAULT_INCOME_ACCOUNT,
};
pub use refund::{MarkerRefundPolicy, NoRefunds, RefundPolicy};

use crate::ir::{Classification, Leg, NormalizedRecord, Posting, Transaction};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmbiguousRecordError {
    #[error("Outcome and income both use account {account_name:?}")]
    SameAccount { account_name: String },
    #[error("Record has neither an outcome nor an income")]
    NoLegs,
}

/// Turn a record into a transaction.
///
/// Postings are always ordered with the receiving side first:
/// - expense: category account, then the paying account
/// - income: the receiving account, then the category account
/// - transfer and exchange: the income account, then the outcome account
/// - refund: the paying account, then the category account (an expense with inverted signs)
pub fn classify(
    record: &NormalizedRecord,
    mapping: &AccountMapping,
) -> Result<Transaction, AmbiguousRecordError> {
    let (classification, postings) = match (&record.outcome, &record.income) {
        (Some(outcome), None) => {
            let category_account =
                mapping.resolve_category(record.category.as_ref(), mapping.default_expense());
            let paying_account = mapping.resolve_account(&outcome.account_name);
            let expense = [
                Posting::new(category_account, outcome.amount, &outcome.currency),
                Posting::new(paying_account, -outcome.amount, &outcome.currency),
            ];
            if mapping.refund_policy().is_refund(record) {
                let [category, paying] = expense;
                (
                    Classification::Refund,
                    vec![invert(paying), invert(category)],
                )
            } else {
                (Classification::Expense, expense.into())
            }
        }
        (None, Some(income)) => (
            Classification::Income,
            vec![
                Posting::new(
                    mapping.resolve_account(&income.account_name),
                    income.amount,
                    &income.currency,
                ),
                Posting::new(
                    mapping.resolve_category(record.category.as_ref(), mapping.default_income()),
                    -income.amount,
                    &income.currency,
                ),
            ],
        ),
        (Some(outcome), Some(income)) => {
            if outcome.account_name == income.account_name {
                return Err(AmbiguousRecordError::SameAccount {
                    account_name: outcome.account_name.clone(),
                });
            }
            let classification = if outcome.currency == income.currency {
                if outcome.amount != income.amount {
                    log::warn!(
                        "Transfer on {} from {:?} to {:?} has different amounts ({} vs {} {}), keeping both",
                        record.date,
                        outcome.account_name,
                        income.account_name,
                        outcome.amount,
                        income.amount,
                        income.currency,
                    );
                }
                Classification::Transfer
            } else {
                log::debug!(
                    "Exchange on {} of {} {} into {} {}",
                    record.date,
                    outcome.amount,
                    outcome.currency,
                    income.amount,
                    income.currency,
                );
                Classification::Exchange
            };
            (classification, transfer_postings(outcome, income, mapping))
        }
        (None, None) => return Err(AmbiguousRecordError::NoLegs),
    };

    Ok(Transaction {
        date: record.date,
        payee: record.payee.clone(),
        memo: record.memo.clone(),
        category: record.category.clone(),
        classification,
        postings,
    })
}

fn transfer_postings(outcome: &Leg, income: &Leg, mapping: &AccountMapping) -> Vec<Posting> {
    vec![
        Posting::new(
            mapping.resolve_account(&income.account_name),
            income.amount,
            &income.currency,
        ),
        Posting::new(
            mapping.resolve_account(&outcome.account_name),
            -outcome.amount,
            &outcome.currency,
        ),
    ]
}

fn invert(posting: Posting) -> Posting {
    Posting {
        amount: -posting.amount,
        ..posting
    }
}
