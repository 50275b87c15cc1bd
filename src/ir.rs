use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// One side of a ZenMoney record: money leaving (outcome) or entering (income) an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    pub account_name: String,
    /// Always positive. The sign of a posting comes from the role of the leg.
    pub amount: Decimal,
    pub currency: String,
}

/// A ZenMoney category like `Food / Groceries`, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPath {
    parts: Vec<String>,
}

impl CategoryPath {
    pub const SEPARATOR: char = '/';
    const JOINER: &'static str = " / ";

    /// Returns `None` if the category doesn't have any non-empty parts.
    pub fn parse(category: &str) -> Option<Self> {
        let parts: Vec<String> = category
            .split(Self::SEPARATOR)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(Self { parts })
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Lookup keys for this category, most specific first.
    /// `Food / Groceries / Bakery` yields `Food / Groceries / Bakery`, `Food / Groceries`, `Food`.
    pub fn prefixes(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.parts.len())
            .rev()
            .map(|len| self.parts[..len].join(Self::JOINER))
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join(Self::JOINER))
    }
}

/// A ZenMoney CSV row after parsing and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub date: NaiveDate,
    pub payee: Option<String>,
    pub memo: Option<String>,
    pub category: Option<CategoryPath>,
    pub outcome: Option<Leg>,
    pub income: Option<Leg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Classification {
    Expense,
    Income,
    Transfer,
    Exchange,
    Refund,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Expense => "expense",
            Classification::Income => "income",
            Classification::Transfer => "transfer",
            Classification::Exchange => "exchange",
            Classification::Refund => "refund",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub payee: Option<String>,
    pub memo: Option<String>,
    pub category: Option<CategoryPath>,
    pub classification: Classification,
    pub postings: Vec<Posting>,
}

impl Transaction {
    pub fn narration(&self) -> &str {
        self.payee
            .as_deref()
            .or(self.memo.as_deref())
            .unwrap_or("")
    }

    /// Whether the postings of each currency sum up to zero.
    pub fn is_balanced(&self) -> bool {
        let mut sums: HashMap<&str, Decimal> = HashMap::new();
        for posting in &self.postings {
            *sums.entry(posting.currency.as_str()).or_default() += posting.amount;
        }
        sums.values().all(|sum| sum.is_zero())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub account: String,
    pub amount: Decimal,
    pub currency: String,
}

impl Posting {
    pub fn new(account: impl Into<String>, amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            amount,
            currency: currency.into(),
        }
    }
}
