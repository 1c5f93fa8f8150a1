use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use tally_core::{
    Asset, AssetKind, Backup, Currency, IncomeStream, MonthToken, Transaction, TxnKind,
    check_rollover, ids, parse_amount_or_zero, parse_backup,
};

mod config;
mod render;
mod store;

use store::Store;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Personal finance tracker with AI-assisted entry")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default config.toml under ~/.tally
    Init,

    /// Record a transaction
    Add {
        description: String,

        /// Amount; non-numeric input is recorded as 0
        #[arg(long)]
        amount: String,

        /// CNY or USD
        #[arg(long, default_value = "CNY")]
        currency: String,

        #[arg(long, default_value = "uncategorized")]
        category: String,

        /// Date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Record as income instead of expense
        #[arg(long)]
        income: bool,
    },

    /// List transactions, newest first
    List {
        /// Restrict to one month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },

    /// Delete a transaction by id (no-op if absent)
    Delete { id: String },

    /// Manage bank/account assets
    Asset {
        #[command(subcommand)]
        command: AssetCommand,
    },

    /// Manage the fixed monthly financial model
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Run the monthly rollover check and print derived figures
    Summary,

    /// Export all stores to a backup JSON file
    Export { file: PathBuf },

    /// Import a backup file, replacing all stores
    Import {
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// AI-assisted features (requires ANTHROPIC_API_KEY or OPENAI_API_KEY)
    Ai {
        #[command(subcommand)]
        command: AiCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AssetCommand {
    /// Add an account
    Add {
        name: String,

        /// Balance; non-numeric input is recorded as 0
        #[arg(long)]
        balance: String,

        #[arg(long, default_value = "CNY")]
        currency: String,

        /// Mark as a credit account (balance may go negative)
        #[arg(long)]
        credit: bool,
    },

    /// Update an account in place (unset flags keep current values)
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        balance: Option<String>,

        #[arg(long)]
        currency: Option<String>,
    },

    /// Delete an account by id (no-op if absent)
    Delete { id: String },

    List,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Set monthly salary income
    SetSalary {
        amount: String,
        #[arg(long, default_value = "CNY")]
        currency: String,
    },

    /// Set monthly rental income
    SetRental {
        amount: String,
        #[arg(long, default_value = "CNY")]
        currency: String,
    },

    /// Set fixed monthly deductions (CNY)
    SetFixed {
        #[arg(long)]
        social_security: Option<String>,
        #[arg(long)]
        loan: Option<String>,
    },

    /// Set the USD→CNY exchange rate
    SetRate { rate: String },

    Show,
}

#[derive(Subcommand, Debug)]
enum AiCommand {
    /// Turn free text into a transaction ("lunch with Li, 45 yuan")
    Add {
        text: String,

        /// Currency assumed when the text names none
        #[arg(long, default_value = "CNY")]
        currency: String,
    },

    /// Ask for spending advice over the current financial summary
    Analyze,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Init => config::init_config()?,

        Command::Add {
            description,
            amount,
            currency,
            category,
            date,
            income,
        } => {
            let mut store = Store::open_default()?;
            let txn = Transaction::new(
                ids::mint("txn"),
                description,
                parse_amount_or_zero(&amount),
                Currency::parse_or_cny(&currency),
                category,
                date.unwrap_or_else(|| today()),
                if income { TxnKind::Income } else { TxnKind::Expense },
            );
            let (id, amount, code) = (txn.id.clone(), txn.amount, txn.currency.code());
            store.add_transaction(txn)?;
            println!("Recorded {id} ({amount:.2} {code})");
        }

        Command::List { month } => {
            let store = Store::open_default()?;
            let txns: Vec<_> = match month {
                Some(m) => {
                    let token: MonthToken = m.parse()?;
                    store
                        .ledger
                        .transactions
                        .iter()
                        .filter(|t| MonthToken::from_date(t.date) == token)
                        .cloned()
                        .collect()
                }
                None => store.ledger.transactions.clone(),
            };
            if txns.is_empty() {
                println!("No transactions.");
            } else {
                println!("{}", render::transaction_table(&txns));
            }
        }

        Command::Delete { id } => {
            let mut store = Store::open_default()?;
            store.delete_transaction(&id)?;
            println!("Deleted {id} (if it existed).");
        }

        Command::Asset { command } => run_asset(command)?,
        Command::Config { command } => run_config(command)?,

        Command::Summary => {
            let mut store = Store::open_default()?;
            let month = evaluate_rollover(&mut store)?;
            render::print_summary(&store.ledger, month);
        }

        Command::Export { file } => {
            let store = Store::open_default()?;
            let backup = Backup::from_ledger(&store.ledger, Utc::now());
            let json = serde_json::to_string_pretty(&backup)?;
            std::fs::write(&file, json).with_context(|| format!("write {}", file.display()))?;
            println!(
                "Exported {} transactions, {} assets to {}",
                backup.transactions.len(),
                backup.assets.len(),
                file.display()
            );
        }

        Command::Import { file, yes } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("read {}", file.display()))?;
            // Validate before touching any store; a bad file changes nothing.
            let backup = parse_backup(&json)?;
            if !yes && !confirm("Replace ALL local data with this backup? [y/N] ")? {
                println!("Import cancelled.");
                return Ok(());
            }
            let mut store = Store::open_default()?;
            let (t, a) = (backup.transactions.len(), backup.assets.len());
            store.replace_all(backup.into_ledger())?;
            println!("Imported {t} transactions, {a} assets.");
        }

        Command::Ai { command } => run_ai(command).await?,
    }

    Ok(())
}

fn app_timezone() -> Result<Tz> {
    let cfg = config::load_config()?;
    cfg.timezone
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone in config.toml: {}", cfg.timezone))
}

fn today() -> NaiveDate {
    match app_timezone() {
        Ok(tz) => Utc::now().with_timezone(&tz).date_naive(),
        Err(_) => Utc::now().date_naive(),
    }
}

/// The rollover check runs before any financial evaluation; a committed
/// snapshot persists immediately.
fn evaluate_rollover(store: &mut Store) -> Result<MonthToken> {
    let month = MonthToken::from_date(today());
    let assets = store.ledger.assets.clone();
    let mut fired = false;
    store.update_config(|cfg| fired = check_rollover(cfg, &assets, month))?;
    if fired {
        println!(
            "(rolled over: baseline now {:.2} CNY as of {month})\n",
            store.ledger.config.last_month_total_assets
        );
    }
    Ok(month)
}

fn run_asset(command: AssetCommand) -> Result<()> {
    let mut store = Store::open_default()?;
    match command {
        AssetCommand::Add {
            name,
            balance,
            currency,
            credit,
        } => {
            let asset = Asset::new(
                ids::mint("ast"),
                name,
                parse_amount_or_zero(&balance),
                Currency::parse_or_cny(&currency),
                if credit { AssetKind::Credit } else { AssetKind::Savings },
            );
            let (id, name) = (asset.id.clone(), asset.name.clone());
            store.add_asset(asset)?;
            println!("Added {id} ({name})");
        }

        AssetCommand::Update {
            id,
            name,
            balance,
            currency,
        } => {
            let Some(existing) = store.ledger.find_asset(&id).cloned() else {
                bail!("no asset with id {id} (see: tally asset list)");
            };
            let merged = Asset {
                id: existing.id.clone(),
                name: name.unwrap_or(existing.name),
                balance: balance
                    .map(|b| parse_amount_or_zero(&b))
                    .unwrap_or(existing.balance),
                currency: currency
                    .map(|c| Currency::parse_or_cny(&c))
                    .unwrap_or(existing.currency),
                kind: existing.kind,
            };
            store.update_asset(merged)?;
            println!("Updated {id}.");
        }

        AssetCommand::Delete { id } => {
            store.delete_asset(&id)?;
            println!("Deleted {id} (if it existed).");
        }

        AssetCommand::List => {
            if store.ledger.assets.is_empty() {
                println!("No assets.");
            } else {
                println!(
                    "{}",
                    render::asset_table(&store.ledger.assets, store.ledger.config.usd_cny_rate)
                );
            }
        }
    }
    Ok(())
}

fn run_config(command: ConfigCommand) -> Result<()> {
    let mut store = Store::open_default()?;
    match command {
        ConfigCommand::SetSalary { amount, currency } => {
            store.update_config(|c| {
                c.salary =
                    IncomeStream::new(parse_amount_or_zero(&amount), Currency::parse_or_cny(&currency));
            })?;
            println!("Salary updated.");
        }
        ConfigCommand::SetRental { amount, currency } => {
            store.update_config(|c| {
                c.rental =
                    IncomeStream::new(parse_amount_or_zero(&amount), Currency::parse_or_cny(&currency));
            })?;
            println!("Rental income updated.");
        }
        ConfigCommand::SetFixed {
            social_security,
            loan,
        } => {
            store.update_config(|c| {
                if let Some(s) = social_security {
                    c.social_security = parse_amount_or_zero(&s);
                }
                if let Some(l) = loan {
                    c.loan = parse_amount_or_zero(&l);
                }
            })?;
            println!("Fixed deductions updated.");
        }
        ConfigCommand::SetRate { rate } => {
            let r = parse_amount_or_zero(&rate);
            if r <= 0.0 {
                bail!("exchange rate must be a positive number, got {rate:?}");
            }
            store.update_config(|c| c.usd_cny_rate = r)?;
            println!("USD→CNY rate set to {r}.");
        }
        ConfigCommand::Show => {
            let c = &store.ledger.config;
            println!(
                "salary:          {:.2} {}",
                c.salary.amount,
                c.salary.currency.code()
            );
            println!(
                "rental:          {:.2} {}",
                c.rental.amount,
                c.rental.currency.code()
            );
            println!("social security: {:.2} CNY", c.social_security);
            println!("loan:            {:.2} CNY", c.loan);
            println!("usd/cny rate:    {:.2}", c.usd_cny_rate);
            println!(
                "last snapshot:   {} ({:.2} CNY)",
                c.last_snapshot_month, c.last_month_total_assets
            );
        }
    }
    Ok(())
}

async fn run_ai(command: AiCommand) -> Result<()> {
    let app_cfg = config::load_config()?;
    let Some(llm) = config::llm_config(&app_cfg)? else {
        bail!("AI features are disabled: set ANTHROPIC_API_KEY or OPENAI_API_KEY");
    };

    match command {
        AiCommand::Add { text, currency } => {
            let default_currency = Currency::parse_or_cny(&currency);
            let parsed = tally_ai::parse_entry(&llm, &text, default_currency).await;

            // The store is mutated only after the round trip has fully
            // resolved; an interrupted call changes nothing.
            let mut store = Store::open_default()?;
            let txn = Transaction::new(
                ids::mint("txn"),
                parsed.description,
                parsed.amount,
                parsed.currency,
                parsed.category,
                today(),
                parsed.kind,
            );
            let line = format!(
                "Recorded {}: {} {:.2} {} [{}]",
                txn.id,
                txn.description,
                txn.amount,
                txn.currency.code(),
                txn.category
            );
            let no_amount = txn.amount == 0.0;
            store.add_transaction(txn)?;
            println!("{line}");
            if no_amount {
                println!("(could not extract an amount; saved with 0 — edit or re-add)");
            }
        }

        AiCommand::Analyze => {
            let mut store = Store::open_default()?;
            let month = evaluate_rollover(&mut store)?;
            let summary = tally_core::build_summary(&store.ledger, month, 20);
            match tally_ai::analyze(&llm, &summary).await {
                Ok(text) => render::print_advice(&tally_ai::parse_markdown(&text)),
                Err(e) => println!("AI service unavailable: {e:#}"),
            }
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
