use std::collections::{BTreeMap, HashMap};

use super::refund::{NoRefunds, RefundPolicy};
use crate::ir::CategoryPath;

pub const DEFAULT_BASE_ACCOUNT: &str = "Assets:ZenMoney";
pub const DEFAULT_EXPENSE_ACCOUNT: &str = "Expenses:Unknown";
pub const DEFAULT_INCOME_ACCOUNT: &str = "Income:Unknown";

/// How ZenMoney account and category names map to beancount accounts.
///
/// Immutable once built, so a single instance can be shared by all rows of an import.
/// Lookups never fail: names without a mapping resolve to the configured defaults.
#[derive(Debug)]
pub struct AccountMapping {
    account_map: HashMap<String, String>,
    category_map: HashMap<String, String>,
    base_account: String,
    default_account: Option<String>,
    default_expense: String,
    default_income: String,
    refund_policy: Box<dyn RefundPolicy>,
}

impl AccountMapping {
    pub fn new(account_map: HashMap<String, String>) -> Self {
        Self {
            account_map,
            category_map: HashMap::new(),
            base_account: DEFAULT_BASE_ACCOUNT.to_string(),
            default_account: None,
            default_expense: DEFAULT_EXPENSE_ACCOUNT.to_string(),
            default_income: DEFAULT_INCOME_ACCOUNT.to_string(),
            refund_policy: Box::new(NoRefunds),
        }
    }

    /// Keys are normalized the same way as categories of records, so `Food/Groceries`
    /// and `Food / Groceries` are the same key. If several keys normalize to the same
    /// category, the first one in key order wins.
    pub fn with_category_map(mut self, category_map: BTreeMap<String, String>) -> Self {
        let mut normalized = HashMap::new();
        for (category, account) in category_map {
            let Some(category) = CategoryPath::parse(&category) else {
                continue;
            };
            normalized.entry(category.to_string()).or_insert(account);
        }
        self.category_map = normalized;
        self
    }

    pub fn with_base_account(mut self, base_account: impl Into<String>) -> Self {
        self.base_account = base_account.into();
        self
    }

    pub fn with_default_account(mut self, default_account: impl Into<String>) -> Self {
        self.default_account = Some(default_account.into());
        self
    }

    pub fn with_default_expense(mut self, default_expense: impl Into<String>) -> Self {
        self.default_expense = default_expense.into();
        self
    }

    pub fn with_default_income(mut self, default_income: impl Into<String>) -> Self {
        self.default_income = default_income.into();
        self
    }

    pub fn with_refund_policy(mut self, refund_policy: impl RefundPolicy + 'static) -> Self {
        self.refund_policy = Box::new(refund_policy);
        self
    }

    pub fn default_expense(&self) -> &str {
        &self.default_expense
    }

    pub fn default_income(&self) -> &str {
        &self.default_income
    }

    pub fn refund_policy(&self) -> &dyn RefundPolicy {
        self.refund_policy.as_ref()
    }

    /// Beancount account for a ZenMoney account name. Exact matches only.
    ///
    /// Unmapped names go to the default account. Without a default account, they get a
    /// placeholder under the base account, e.g. `Assets:ZenMoney:Unknown:Bank:USD`
    /// for `Unknown Bank - USD`, so they stand out in the ledger.
    pub fn resolve_account(&self, account_name: &str) -> String {
        if let Some(account) = self.account_map.get(account_name) {
            return account.clone();
        }
        if let Some(default_account) = &self.default_account {
            log::debug!("No mapping for account {account_name:?}, using {default_account}");
            return default_account.clone();
        }
        let placeholder = format!("{}:{}", self.base_account, placeholder_name(account_name));
        log::warn!("No mapping for account {account_name:?}, using placeholder {placeholder}");
        placeholder
    }

    /// Beancount account for a ZenMoney category. The most specific mapped prefix of the
    /// category wins, so mapping `Food` covers `Food / Groceries` unless that one has its own
    /// mapping. Categories without any mapped prefix, and records without category, go to `default`.
    pub fn resolve_category(&self, category: Option<&CategoryPath>, default: &str) -> String {
        let Some(category) = category else {
            return default.to_string();
        };
        if let Some(account) = category
            .prefixes()
            .find_map(|prefix| self.category_map.get(&prefix))
        {
            return account.clone();
        }
        log::debug!("No mapping for category {:?}, using {default}", category.to_string());
        default.to_string()
    }
}

/// `Unknown Bank - USD` becomes `Unknown:Bank:USD`
fn placeholder_name(account_name: &str) -> String {
    let parts: Vec<String> = account_name
        .split(|c: char| c == '-' || c == ':' || c.is_whitespace())
        .map(|part| part.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|part| !part.is_empty())
        .map(|part| capitalize(&part))
        .collect();
    if parts.is_empty() {
        "Unknown".to_string()
    } else {
        parts.join(":")
    }
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
