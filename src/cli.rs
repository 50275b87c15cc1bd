use anyhow::{anyhow, bail, Result};
use std::path::Path;

use crate::args::{Args, Command};
use crate::classify::AccountMapping;
use crate::config::{self, Config};
use crate::import::{self, Row};
use crate::ir::Transaction;
use crate::{convert_record, export, operations};

pub fn main(args: Args) -> Result<()> {
    match args.command {
        Command::Convert {
            from_csv,
            config,
            strict,
        } => main_convert(&from_csv, &config, strict),
        Command::InitConfig { from_csv, config } => main_init_config(&from_csv, &config),
    }
}

fn main_convert(from_csv: &Path, config_path: &Path, strict: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    let rows = import::load_file(from_csv)?;

    let unmapped = config.unmapped_names(
        &import::account_names(&rows),
        &import::category_names(&rows),
    );
    if !unmapped.is_empty() {
        log::warn!(
            "{} account and category names have no mapping and will use defaults: {}",
            unmapped.len(),
            unmapped.join(", "),
        );
    }

    let transactions = convert_rows(&rows, &config.to_mapping(), strict)?;
    let transactions = operations::sort_transactions_by_date(transactions);
    operations::report_unbalanced_transactions(&transactions);
    for (classification, count) in operations::count_by_classification(&transactions) {
        log::info!("{classification}: {count}");
    }

    export::print_exported_transactions(&transactions)
}

/// Rows that fail to convert are skipped with a warning, or abort the conversion if `strict` is set.
fn convert_rows(rows: &[Row], mapping: &AccountMapping, strict: bool) -> Result<Vec<Transaction>> {
    let mut transactions = Vec::with_capacity(rows.len());
    let mut num_skipped = 0;
    for row in rows {
        match convert_record(&row.record, mapping) {
            Ok(transaction) => transactions.push(transaction),
            Err(err) if strict => {
                return Err(anyhow!(err).context(format!("Failed to convert line {}", row.line)));
            }
            Err(err) => {
                log::warn!("Skipping line {}: {}", row.line, err);
                num_skipped += 1;
            }
        }
    }
    log::info!(
        "Converted {} rows, skipped {}",
        transactions.len(),
        num_skipped
    );
    Ok(transactions)
}

fn main_init_config(from_csv: &Path, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        bail!("Config file {} already exists", config_path.display());
    }
    let rows = import::load_file(from_csv)?;
    let config = config::prompt_edit_config(
        import::account_names(&rows),
        import::category_names(&rows),
    )?;
    config.save(config_path)?;
    log::info!("Saved config to {}", config_path.display());
    Ok(())
}
