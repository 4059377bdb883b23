use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use serde::Serialize;
use thiserror::Error;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use merch_shop::admin::{self, AdminView, ExportError, StatusFilter};
use merch_shop::csv::{CsvError, read_events};
use merch_shop::order::UnknownStatus;
use merch_shop::repository::{JsonFileRepository, RepositoryError};
use merch_shop::{Order, OrderId, OrderStatus, Product, Session};

const STORE_ENV: &str = "MERCH_SHOP_STORE";
const DEFAULT_STORE: &str = "orders.json";

const USAGE: &str = "usage: merch-shop <command>

commands:
  catalog                    list products and prices
  checkout <events.csv>      run a scripted shopping session
  orders [status|all]        list orders, newest first
  summary                    order metrics
  set-status <id> <status>   change an order's status
  export [status|all]        write orders as csv";

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Csv(#[from] CsvError),
    #[error("failed to write csv: {0}")]
    CsvWrite(#[from] csv::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Status(#[from] UnknownStatus),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Serialize)]
struct CatalogRow {
    product: &'static str,
    price: String,
    sized: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let store = env::var(STORE_ENV).unwrap_or_else(|_| DEFAULT_STORE.to_string());
    let repo = JsonFileRepository::new(store);

    match run(&args, repo).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage(message)) => {
            eprintln!("{message}\n\n{USAGE}");
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String], repo: JsonFileRepository) -> Result<(), CliError> {
    let command = args
        .first()
        .ok_or_else(|| CliError::Usage("missing command".to_string()))?;

    match command.as_str() {
        "catalog" => print_catalog(),
        "checkout" => {
            let path = args
                .get(1)
                .ok_or_else(|| CliError::Usage("checkout needs an events file".to_string()))?;
            checkout(path.clone(), &repo).await
        }
        "orders" => {
            let filter = parse_filter(args.get(1))?;
            let mut view = AdminView::new(repo);
            view.load().await?;
            print_orders(view.filtered(filter))
        }
        "summary" => {
            let mut view = AdminView::new(repo);
            view.load().await?;
            let summary = view.summary();
            let mut out = io::stdout().lock();
            writeln!(out, "total orders:     {}", summary.total_orders)?;
            writeln!(out, "total revenue:    {}", summary.total_revenue)?;
            writeln!(out, "pending orders:   {}", summary.pending_count)?;
            writeln!(out, "unique customers: {}", summary.unique_customer_count)?;
            Ok(())
        }
        "set-status" => {
            let (Some(id), Some(status)) = (args.get(1), args.get(2)) else {
                return Err(CliError::Usage(
                    "set-status needs an order id and a status".to_string(),
                ));
            };
            let status: OrderStatus = status.parse()?;
            let mut view = AdminView::new(repo);
            let order = view.update_status(&OrderId::from(id.as_str()), status).await?;
            println!("order {} is now {}", order.id, order.status);
            Ok(())
        }
        "export" => {
            let filter = parse_filter(args.get(1))?;
            let mut view = AdminView::new(repo);
            view.load().await?;
            io::stdout().lock().write_all(view.export_csv(filter)?.as_bytes())?;
            Ok(())
        }
        other => Err(CliError::Usage(format!("unknown command '{other}'"))),
    }
}

fn parse_filter(arg: Option<&String>) -> Result<StatusFilter, CliError> {
    Ok(arg.map(|s| s.parse()).transpose()?.unwrap_or_default())
}

fn print_catalog() -> Result<(), CliError> {
    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    for product in Product::ALL {
        writer
            .serialize(CatalogRow {
                product: product.name(),
                price: product.price().to_string(),
                sized: product.is_clothing(),
            })?;
    }
    writer.flush()?;
    Ok(())
}

/// Stream the scripted events through a session, then print the placed orders.
async fn checkout(path: String, repo: &JsonFileRepository) -> Result<(), CliError> {
    let events = read_events(path)?;
    let (event_sender, event_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in events {
            match result {
                Ok(event) => {
                    if event_sender.send(event).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    let mut session = Session::new();
    let placed = session.run(ReceiverStream::new(event_receiver), repo).await;
    if session.checkout_visible() {
        warn!(
            total = %session.total(),
            "session ended with an unsubmitted cart"
        );
    }

    io::stdout()
        .lock()
        .write_all(admin::export_csv(&placed)?.as_bytes())?;
    Ok(())
}

fn print_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    for order in orders {
        writeln!(
            out,
            "{:<6} {}  {:<10} {:<28} {:>9}  ({} + {} fee)",
            order.id,
            order.created_date.format("%b %-d, %Y"),
            order.status,
            order.customer_email,
            order.total_amount.to_string(),
            order.subtotal,
            order.setup_fee,
        )?;
        for item in &order.items {
            let sizes: Vec<&str> = item.sizes.iter().map(|s| s.as_str()).collect();
            if sizes.is_empty() {
                writeln!(out, "         {} x{}", item.name, item.quantity)?;
            } else {
                writeln!(
                    out,
                    "         {} x{} [{}]",
                    item.name,
                    item.quantity,
                    sizes.join(", ")
                )?;
            }
        }
        if let Some(notes) = &order.notes {
            writeln!(out, "         notes: {notes}")?;
        }
    }
    Ok(())
}
