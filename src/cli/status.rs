//! Status command implementation

use anyhow::Result;
use clap::Args;
use console::style;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::config::Config;
use crate::{backup, ledger};

#[derive(Args)]
pub struct StatusArgs {
    /// RES backup file (defaults to the configured backup path)
    #[arg(value_name = "BACKUP")]
    pub backup: Option<PathBuf>,

    /// Ledger CSV file (defaults to the configured ledger path)
    #[arg(value_name = "LEDGER")]
    pub ledger: Option<PathBuf>,
}

pub fn run(args: StatusArgs, cfg: &Config) -> Result<()> {
    let backup_path = args.backup.unwrap_or_else(|| cfg.backup_path.clone());
    let ledger_path = args.ledger.unwrap_or_else(|| cfg.ledger_path.clone());

    if !ledger_path.exists() {
        anyhow::bail!("ledger file not found: {}", ledger_path.display());
    }

    let backup_subs: BTreeSet<String> =
        backup::extract_subreddits(&backup_path)?.into_iter().collect();
    let ledger_subs = ledger::load(&ledger_path)?;

    let only_in_backup: Vec<&String> = backup_subs.difference(&ledger_subs).collect();
    let only_in_ledger: Vec<&String> = ledger_subs.difference(&backup_subs).collect();
    let in_both: Vec<&String> = backup_subs.intersection(&ledger_subs).collect();

    println!("{}", style("Subreddit comparison").bold());
    println!("  Backup: {}", backup_path.display());
    println!("  Ledger: {}", ledger_path.display());
    println!();
    print_section("Only in backup", &only_in_backup);
    print_section("Only in ledger", &only_in_ledger);
    print_section("In both", &in_both);

    Ok(())
}

fn print_section(title: &str, names: &[&String]) {
    println!("{} ({}):", style(title).cyan(), names.len());
    if names.is_empty() {
        println!("  None");
    } else {
        let joined = names.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ");
        println!("  {joined}");
    }
    println!();
}
