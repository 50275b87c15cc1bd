use std::{borrow::Cow, io::Write};

use anyhow::{anyhow, ensure, Result};
use beancount_core::{metadata::MetaValue, AccountType, Directive, Flag, IncompleteAmount};
use common_macros::{hash_map, hash_set};

use crate::ir::{Posting, Transaction};

pub fn print_exported_transactions(transactions: &[Transaction]) -> Result<()> {
    if transactions.is_empty() {
        log::warn!("No transactions to export");
    }
    render_transactions(&mut std::io::stdout(), transactions)
}

pub fn render_transactions<W: Write>(writer: &mut W, transactions: &[Transaction]) -> Result<()> {
    let ledger = beancount_core::Ledger {
        directives: transactions
            .iter()
            .map(transaction_to_beancount)
            .collect::<Result<_>>()?,
    };
    beancount_render::render(writer, &ledger)?;
    Ok(())
}

/// Parse a beancount account name like `Assets:Bank:PKO:PLN`
pub fn beancount_account(name: &str) -> Result<beancount_core::Account<'_>> {
    let mut parts = name.split(':');
    let ty = match parts.next() {
        Some("Assets") => AccountType::Assets,
        Some("Liabilities") => AccountType::Liabilities,
        Some("Equity") => AccountType::Equity,
        Some("Income") => AccountType::Income,
        Some("Expenses") => AccountType::Expenses,
        _ => {
            return Err(anyhow!(
                "Account {name:?} must start with one of: Assets:, Liabilities:, Equity:, Income:, Expenses:",
            ))
        }
    };
    let parts: Vec<Cow<'_, str>> = parts.map(Cow::Borrowed).collect();
    ensure!(
        !parts.is_empty() && parts.iter().all(|part| !part.is_empty()),
        "Account {name:?} must have at least one sub-account and no empty parts",
    );
    Ok(beancount_core::Account { ty, parts })
}

fn transaction_to_beancount(transaction: &Transaction) -> Result<Directive<'_>> {
    // Exchanges and transfers with differing amounts don't balance per currency.
    // Keep them as they are, but flag them so they stand out in the ledger.
    let flag = if transaction.is_balanced() {
        Flag::Okay
    } else {
        Flag::Warning
    };
    let mut meta = hash_map![
        Cow::Borrowed("zenmoney_type") => MetaValue::Text(Cow::Borrowed(transaction.classification.as_str())),
    ];
    if let Some(category) = &transaction.category {
        meta.insert(
            Cow::Borrowed("zenmoney_category"),
            MetaValue::Text(Cow::Owned(category.to_string())),
        );
    }
    Ok(Directive::Transaction(beancount_core::Transaction {
        date: transaction.date.into(),
        flag,
        payee: transaction.payee.as_deref().map(Cow::Borrowed),
        narration: Cow::Borrowed(transaction.memo.as_deref().unwrap_or("")),
        tags: hash_set![],
        links: hash_set![],
        postings: transaction
            .postings
            .iter()
            .map(posting_to_beancount)
            .collect::<Result<_>>()?,
        meta,
        source: None,
    }))
}

fn posting_to_beancount(posting: &Posting) -> Result<beancount_core::Posting<'_>> {
    Ok(beancount_core::Posting {
        account: beancount_account(&posting.account)?,
        units: IncompleteAmount {
            num: Some(posting.amount),
            currency: Some(Cow::Borrowed(posting.currency.as_str())),
        },
        cost: None,
        price: None,
        flag: None,
        meta: hash_map![],
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::ir::{CategoryPath, Classification};

    fn transaction(classification: Classification, postings: Vec<Posting>) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2025, 12, 14).unwrap(),
            payee: Some("SuperMarket XYZ".to_string()),
            memo: Some("weekly shopping".to_string()),
            category: CategoryPath::parse("Food / Groceries"),
            classification,
            postings,
        }
    }

    fn render_to_string(transactions: &[Transaction]) -> String {
        let mut output = Vec::new();
        render_transactions(&mut output, transactions).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn first_line(rendered: &str) -> &str {
        rendered
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap()
    }

    /// Account, amount and currency of every posting line in the rendered ledger
    fn parse_posting_lines(rendered: &str) -> Vec<Posting> {
        rendered
            .lines()
            .filter(|line| line.starts_with(char::is_whitespace))
            .filter_map(|line| {
                let mut tokens = line.split_whitespace();
                let account = tokens.next()?;
                if account.ends_with(':') || !account.contains(':') {
                    // metadata line
                    return None;
                }
                let amount = Decimal::from_str(tokens.next()?).ok()?;
                let currency = tokens.next()?;
                Some(Posting::new(account, amount, currency))
            })
            .collect()
    }

    #[test]
    fn round_trip_posting_lines() {
        let transactions = vec![
            transaction(
                Classification::Expense,
                vec![
                    Posting::new("Expenses:Food:Groceries", Decimal::new(125000, 2), "PLN"),
                    Posting::new("Assets:Bank:PKO:PLN", Decimal::new(-125000, 2), "PLN"),
                ],
            ),
            transaction(
                Classification::Exchange,
                vec![
                    Posting::new("Assets:Bank:PKO:EUR", Decimal::new(50000, 2), "EUR"),
                    Posting::new("Assets:Bank:PKO:PLN", Decimal::new(-4250000, 2), "PLN"),
                ],
            ),
        ];
        let rendered = render_to_string(&transactions);
        let expected: Vec<Posting> = transactions
            .iter()
            .flat_map(|transaction| transaction.postings.clone())
            .collect();
        assert_eq!(parse_posting_lines(&rendered), expected);
        assert!(rendered.contains("-1250.00 PLN"));
        assert!(rendered.contains("500.00 EUR"));
    }

    #[test]
    fn renders_header() {
        let rendered = render_to_string(&[transaction(
            Classification::Expense,
            vec![
                Posting::new("Expenses:Food:Groceries", Decimal::new(125000, 2), "PLN"),
                Posting::new("Assets:Bank:PKO:PLN", Decimal::new(-125000, 2), "PLN"),
            ],
        )]);
        let header = first_line(&rendered);
        assert!(header.starts_with("2025-12-14 *"));
        assert!(header.contains("\"SuperMarket XYZ\""));
        assert!(header.contains("\"weekly shopping\""));
    }

    #[test]
    fn classification_and_category_metadata() {
        let transaction = transaction(Classification::Refund, vec![]);
        let Directive::Transaction(directive) = transaction_to_beancount(&transaction).unwrap()
        else {
            panic!("Expected a transaction directive");
        };
        assert!(matches!(
            directive.meta.get("zenmoney_type"),
            Some(MetaValue::Text(text)) if text == "refund"
        ));
        assert!(matches!(
            directive.meta.get("zenmoney_category"),
            Some(MetaValue::Text(text)) if text == "Food / Groceries"
        ));
        assert_eq!(directive.payee.as_deref(), Some("SuperMarket XYZ"));
        assert_eq!(directive.narration, "weekly shopping");
    }

    #[test]
    fn unbalanced_transactions_are_flagged() {
        let rendered = render_to_string(&[transaction(
            Classification::Exchange,
            vec![
                Posting::new("Assets:Bank:PKO:EUR", Decimal::new(50000, 2), "EUR"),
                Posting::new("Assets:Bank:PKO:PLN", Decimal::new(-4250000, 2), "PLN"),
            ],
        )]);
        assert!(first_line(&rendered).starts_with("2025-12-14 !"));
    }

    #[test]
    fn invalid_account_fails_to_render() {
        let mut output = Vec::new();
        let result = render_transactions(
            &mut output,
            &[transaction(
                Classification::Expense,
                vec![
                    Posting::new("Food", Decimal::new(1, 0), "PLN"),
                    Posting::new("Assets:Cash", Decimal::new(-1, 0), "PLN"),
                ],
            )],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_beancount_account() {
        let account = beancount_account("Assets:Bank:PKO:PLN").unwrap();
        assert!(matches!(account.ty, AccountType::Assets));
        assert_eq!(account.parts, vec!["Bank", "PKO", "PLN"]);

        assert!(beancount_account("Expenses:Food").is_ok());
        assert!(beancount_account("Liabilities:CreditCard").is_ok());
        assert!(beancount_account("Food:Groceries").is_err());
        assert!(beancount_account("Expenses").is_err());
        assert!(beancount_account("Expenses::Food").is_err());
        assert!(beancount_account("").is_err());
    }
}
