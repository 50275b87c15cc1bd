use std::collections::BTreeMap;

use crate::ir::{Classification, Transaction};

/// Stable, so rows from the same day keep the order of the export
pub fn sort_transactions_by_date(mut transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions.sort_by_key(|transaction| transaction.date);
    transactions
}

/// Log every transaction whose postings don't balance per currency, and return how many there are.
pub fn report_unbalanced_transactions(transactions: &[Transaction]) -> usize {
    let mut num_unbalanced = 0;
    for transaction in transactions.iter().filter(|t| !t.is_balanced()) {
        num_unbalanced += 1;
        match transaction.classification {
            Classification::Exchange => log::info!(
                "Exchange on {} ({}) has one posting per currency and no price, check it in the ledger",
                transaction.date,
                transaction.narration(),
            ),
            _ => log::warn!(
                "{} on {} ({}) is not balanced: {:?}",
                transaction.classification,
                transaction.date,
                transaction.narration(),
                transaction.postings,
            ),
        }
    }
    num_unbalanced
}

pub fn count_by_classification(transactions: &[Transaction]) -> BTreeMap<Classification, usize> {
    let mut counts: BTreeMap<Classification, usize> = BTreeMap::new();
    for transaction in transactions {
        *counts.entry(transaction.classification).or_default() += 1;
    }
    counts
}
