//! # Supplier Statement Printer
//!
//! Loads the demo data set and prints supplier statements ("extratos").
//!
//! ## Usage
//! ```bash
//! # Every supplier, as of today
//! cargo run -p brecho-store --bin extrato
//!
//! # One supplier, as of a fixed date, as JSON
//! cargo run -p brecho-store --bin extrato -- --supplier f1 --today 2024-09-15 --json
//! ```
//!
//! Consignment terms follow the `BRECHO_*` environment variables
//! (see [`brecho_store::StoreConfig::from_env`]).

use std::env;

use brecho_core::status::display_status_with;
use brecho_core::{ConsignmentPolicy, SupplierStatement};
use brecho_store::{Store, StoreConfig};
use chrono::{Local, NaiveDate};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut supplier: Option<String> = None;
    let mut today = Local::now().date_naive();
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--supplier" | "-s" => {
                if i + 1 < args.len() {
                    supplier = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--today" | "-t" => {
                if i + 1 < args.len() {
                    today = NaiveDate::parse_from_str(&args[i + 1], "%Y-%m-%d")?;
                    i += 1;
                }
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("Brechó Supplier Statements");
                println!();
                println!("Usage: extrato [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --supplier <ID>   Only this supplier (default: all)");
                println!("  -t, --today <DATE>    Reference date, YYYY-MM-DD (default: today)");
                println!("      --json            Print statements as JSON");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = StoreConfig::from_env().seed_demo(true);
    let store = Store::open(config, today).await;

    let ids: Vec<String> = match supplier {
        Some(id) => vec![id],
        None => store
            .suppliers()
            .list()
            .await
            .into_iter()
            .map(|s| s.id)
            .collect(),
    };

    let mut statements = Vec::with_capacity(ids.len());
    for id in &ids {
        match store.suppliers().statement(id).await {
            Some(statement) => statements.push(statement),
            None => eprintln!("Supplier not found: {id}"),
        }
    }
    info!(count = statements.len(), %today, "Statements computed");

    if json {
        println!("{}", serde_json::to_string_pretty(&statements)?);
        return Ok(());
    }

    let policy = store.policy();
    for statement in &statements {
        print_statement(statement, today, &policy);
    }

    Ok(())
}

fn print_statement(
    statement: &SupplierStatement,
    today: NaiveDate,
    policy: &ConsignmentPolicy,
) {
    println!("Extrato: {} ({})", statement.supplier.name, statement.supplier.id);
    println!("========================================");
    println!("Itens vendidos: {}", statement.sold_items.len());
    for item in &statement.sold_items {
        println!(
            "  {:<8} {:>12}  {}",
            item.supplier_code,
            item.sale_price.to_string(),
            display_status_with(item, today, policy).label()
        );
    }
    println!("Crédito em loja: {} (bruto {})", statement.credit_balance, statement.gross_credit);
    println!("Dinheiro:        {} (bruto {})", statement.cash_balance, statement.gross_cash);
    println!("Pagamentos:");
    for entry in &statement.payment_history {
        let date = entry
            .date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<10} {:>12}  {:?} {:?}",
            date,
            entry.amount.to_string(),
            entry.kind,
            entry.status
        );
    }
    println!();
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=brecho=trace` - Show trace for brecho crates only
/// - Default: INFO level, DEBUG for brecho crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,brecho=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
