//! Terminal output: tabled listings, the summary block, and rendering of
//! structured advisory nodes.

use tabled::{Table, Tabled};

use tally_ai::{Inline, Node};
use tally_core::{Asset, Ledger, MonthToken, Transaction, distribution_percent};

#[derive(Tabled)]
struct TxnRow {
    id: String,
    date: String,
    kind: &'static str,
    amount: String,
    category: String,
    description: String,
}

#[derive(Tabled)]
struct AssetRow {
    id: String,
    name: String,
    kind: &'static str,
    balance: String,
    share: String,
}

pub fn transaction_table(txns: &[Transaction]) -> String {
    let rows: Vec<TxnRow> = txns
        .iter()
        .map(|t| TxnRow {
            id: t.id.clone(),
            date: t.date.to_string(),
            kind: if t.is_expense() { "expense" } else { "income" },
            amount: format!("{:.2} {}", t.amount, t.currency.code()),
            category: t.category.clone(),
            description: t.description.clone(),
        })
        .collect();
    Table::new(rows).to_string()
}

pub fn asset_table(assets: &[Asset], usd_cny_rate: f64) -> String {
    let rows: Vec<AssetRow> = assets
        .iter()
        .map(|a| AssetRow {
            id: a.id.clone(),
            name: a.name.clone(),
            kind: match a.kind {
                tally_core::AssetKind::Savings => "savings",
                tally_core::AssetKind::Credit => "credit",
            },
            balance: format!("{:.2} {}", a.balance, a.currency.code()),
            share: format!("{:.1}%", distribution_percent(a, assets, usd_cny_rate)),
        })
        .collect();
    Table::new(rows).to_string()
}

pub fn print_summary(ledger: &Ledger, month: MonthToken) {
    let cfg = &ledger.config;
    let total = tally_core::total_assets_cny(&ledger.assets, cfg.usd_cny_rate);
    let growth = tally_core::asset_growth(&ledger.assets, cfg);
    let consumption = tally_core::derived_consumption(&ledger.assets, cfg);
    let spent = tally_core::variable_expense(&ledger.transactions, month, cfg.usd_cny_rate);

    println!("# Summary for {month}\n");
    println!("Total assets:         {total:>12.2} CNY");
    println!(
        "Growth since {}:  {growth:>12.2} CNY",
        cfg.last_snapshot_month
    );
    println!("Derived consumption:  {consumption:>12.2} CNY");
    println!("Recorded expenses:    {spent:>12.2} CNY");
    println!("USD rate:             {:>12.2}", cfg.usd_cny_rate);

    if !ledger.assets.is_empty() {
        println!("\n{}", asset_table(&ledger.assets, cfg.usd_cny_rate));
    }
}

fn render_inlines(spans: &[Inline]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Inline::Text(t) => out.push_str(t),
            Inline::Strong(t) => {
                out.push_str("\x1b[1m");
                out.push_str(t);
                out.push_str("\x1b[0m");
            }
        }
    }
    out
}

/// Print advisory nodes. Only the allow-listed node set exists, so this is
/// the entire rendering surface for remote text.
pub fn print_advice(nodes: &[Node]) {
    for node in nodes {
        match node {
            Node::Heading { level, text } => {
                println!("\n{} {}", "#".repeat(*level as usize), text);
            }
            Node::Bullet(spans) => println!("  - {}", render_inlines(spans)),
            Node::Paragraph(spans) => println!("{}", render_inlines(spans)),
        }
    }
}
