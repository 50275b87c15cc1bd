use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{hash_map::Entry, BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use crate::classify::{
    AccountMapping, MarkerRefundPolicy, DEFAULT_BASE_ACCOUNT, DEFAULT_EXPENSE_ACCOUNT,
    DEFAULT_INCOME_ACCOUNT,
};
use crate::export::beancount_account;
use crate::ir::CategoryPath;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Unmapped accounts get a placeholder below this account, unless `default_account` is set
    #[serde(default = "default_base_account")]
    pub base_account: AccountConfig,
    #[serde(default)]
    pub default_account: Option<AccountConfig>,
    #[serde(default = "default_expense_account")]
    pub default_expense: AccountConfig,
    #[serde(default = "default_income_account")]
    pub default_income: AccountConfig,
    /// ZenMoney account name -> beancount account. Empty entries are treated as unmapped.
    #[serde(default)]
    pub accounts: BTreeMap<String, AccountConfig>,
    /// ZenMoney category -> beancount account. Empty entries are treated as unmapped.
    #[serde(default)]
    pub categories: BTreeMap<String, AccountConfig>,
    /// Outcome records whose category or comment contains one of these are refunds
    #[serde(default)]
    pub refund_markers: Vec<String>,
}

fn default_base_account() -> AccountConfig {
    AccountConfig(DEFAULT_BASE_ACCOUNT.to_string())
}

fn default_expense_account() -> AccountConfig {
    AccountConfig(DEFAULT_EXPENSE_ACCOUNT.to_string())
}

fn default_income_account() -> AccountConfig {
    AccountConfig(DEFAULT_INCOME_ACCOUNT.to_string())
}

impl Config {
    /// A config without any mappings, with an empty entry for each given account and category
    pub fn new_skeleton(
        account_names: impl IntoIterator<Item = String>,
        category_names: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            base_account: default_base_account(),
            default_account: None,
            default_expense: default_expense_account(),
            default_income: default_income_account(),
            accounts: account_names
                .into_iter()
                .map(|name| (name, AccountConfig(String::new())))
                .collect(),
            categories: category_names
                .into_iter()
                .map(|name| (name, AccountConfig(String::new())))
                .collect(),
            refund_markers: vec![],
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading config {}...", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::info!("Loading config {}...done", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_yaml::to_string(self)?;
        std::fs::write(path, serialized)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let named_accounts = [
            ("base_account", Some(&self.base_account)),
            ("default_account", self.default_account.as_ref()),
            ("default_expense", Some(&self.default_expense)),
            ("default_income", Some(&self.default_income)),
        ];
        for (name, account) in named_accounts {
            if let Some(account) = account {
                account
                    .validate()
                    .with_context(|| anyhow!("Error in {}: {}", name, account.0))?;
            }
        }
        for (name, account) in self.accounts.iter().chain(&self.categories) {
            if !account.is_empty() {
                account
                    .validate()
                    .with_context(|| anyhow!("Error in mapping for {}: {}", name, account.0))?;
            }
        }
        self.validate_category_keys()
    }

    /// `Food/Groceries` and `Food / Groceries` are the same category, so they can't map to
    /// different accounts.
    fn validate_category_keys(&self) -> Result<()> {
        let mut seen: HashMap<String, (&str, &str)> = HashMap::new();
        for (name, account) in &self.categories {
            if account.is_empty() {
                continue;
            }
            let Some(category) = CategoryPath::parse(name) else {
                continue;
            };
            let account = account.0.trim();
            match seen.entry(category.to_string()) {
                Entry::Occupied(entry) => {
                    let (other_name, other_account) = *entry.get();
                    if other_account != account {
                        bail!(
                            "Categories {other_name:?} and {name:?} are the same category but map to different accounts: {other_account}, {account}",
                        );
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert((name.as_str(), account));
                }
            }
        }
        Ok(())
    }

    pub fn to_mapping(&self) -> AccountMapping {
        let mapping = AccountMapping::new(mapped_entries(&self.accounts))
            .with_category_map(mapped_entries(&self.categories))
            .with_base_account(&self.base_account.0)
            .with_default_expense(&self.default_expense.0)
            .with_default_income(&self.default_income.0);
        let mapping = match &self.default_account {
            Some(default_account) => mapping.with_default_account(&default_account.0),
            None => mapping,
        };
        if self.refund_markers.is_empty() {
            mapping
        } else {
            mapping.with_refund_policy(MarkerRefundPolicy::new(&self.refund_markers))
        }
    }

    /// Account and category names present in the export but not in the config
    pub fn unmapped_names(
        &self,
        account_names: &BTreeSet<String>,
        category_names: &BTreeSet<String>,
    ) -> Vec<String> {
        let unmapped = |names: &BTreeSet<String>, map: &BTreeMap<String, AccountConfig>| {
            names
                .iter()
                .filter(|name| map.get(*name).map_or(true, AccountConfig::is_empty))
                .cloned()
                .collect::<Vec<_>>()
        };
        let mut result = unmapped(account_names, &self.accounts);
        result.extend(unmapped(category_names, &self.categories));
        result
    }
}

fn mapped_entries<M: FromIterator<(String, String)>>(map: &BTreeMap<String, AccountConfig>) -> M {
    map.iter()
        .filter(|(_, account)| !account.is_empty())
        .map(|(name, account)| (name.clone(), account.0.trim().to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig(pub String);

impl AccountConfig {
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        beancount_account(self.0.trim())?;
        Ok(())
    }
}

/// Open a config with an entry for each account and category name in the editor, and return
/// what the user saved.
pub fn prompt_edit_config(
    account_names: impl IntoIterator<Item = String>,
    category_names: impl IntoIterator<Item = String>,
) -> Result<Config> {
    let initial_config = Config::new_skeleton(account_names, category_names);
    let serialized = serde_yaml::to_string(&initial_config)?;
    let Some(edited) = dialoguer::Editor::new().extension(".yaml").edit(&serialized)? else {
        bail!("You did not save the edits, please try again");
    };
    Config::parse(&edited)
}
