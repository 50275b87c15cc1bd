use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Convert ZenMoney CSV exports to beancount.
#[derive(Parser, Debug)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a ZenMoney CSV export and print the beancount transactions
    Convert {
        /// Path to the ZenMoney CSV export
        #[clap(short, long)]
        from_csv: PathBuf,

        /// Path to the account mapping config
        #[clap(short, long)]
        config: PathBuf,

        /// Stop at the first row that can't be converted instead of skipping it
        #[clap(long)]
        strict: bool,
    },

    /// Create an account mapping config for the accounts and categories in a ZenMoney CSV export
    InitConfig {
        /// Path to the ZenMoney CSV export
        #[clap(short, long)]
        from_csv: PathBuf,

        /// Where to write the config
        #[clap(short, long)]
        config: PathBuf,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
