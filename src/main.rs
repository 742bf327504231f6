use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use orderflow::application::fulfillment::FulfillmentService;
use orderflow::application::order_engine::{OrderEngine, OrderEngineConfig};
use orderflow::application::payment_engine::{
    DEFAULT_GATEWAY_BASE_URL, PaymentEngine, PaymentEngineConfig,
};
use orderflow::domain::ports::{CatalogReaderBox, CatalogStore, OrderStoreBox, PaymentStoreBox};
use orderflow::infrastructure::in_memory::{
    InMemoryCatalog, InMemoryOrderStore, InMemoryPaymentStore,
};
use orderflow::interfaces::csv::command_reader::CommandReader;
use orderflow::interfaces::csv::product_reader::ProductReader;
use orderflow::interfaces::csv::report_writer::ReportWriter;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Command script CSV file
    input: PathBuf,

    /// Catalog CSV file loaded before the script runs
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Records to print once the script has run
    #[arg(long, value_enum, default_value_t = Report::Orders)]
    report: Report,

    /// Base URL used to build payment redirect locators
    #[arg(long, default_value = DEFAULT_GATEWAY_BASE_URL)]
    gateway_url: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Report {
    Orders,
    Payments,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .init();

    let cli = Cli::parse();

    let service = match &cli.db_path {
        Some(db_path) => open_persistent(db_path, &cli).await?,
        None => open_in_memory(&cli).await?,
    };

    // Replay the command script
    let file = File::open(&cli.input).into_diagnostic()?;
    let (mut applied, mut rejected) = (0usize, 0usize);
    for command in CommandReader::new(file).commands() {
        match command {
            Ok(command) => {
                let name = command.name();
                match service.apply(command).await {
                    Ok(_) => applied += 1,
                    Err(e) => {
                        rejected += 1;
                        if e.is_rejection() {
                            tracing::warn!(command = name, error = %e, "failed to apply command");
                        } else {
                            tracing::error!(command = name, error = %e, "failed to apply command");
                        }
                    }
                }
            }
            Err(e) => {
                rejected += 1;
                tracing::warn!(error = %e, "failed to read command");
            }
        }
    }
    tracing::info!(applied, rejected, "replay finished");

    match cli.report {
        Report::Orders => {
            let orders = service.all_orders().await.into_diagnostic()?;
            ReportWriter::new(io::stdout().lock())
                .write_orders(&orders)
                .into_diagnostic()?;
        }
        Report::Payments => {
            let payments = service.all_payments().await.into_diagnostic()?;
            ReportWriter::new(io::stdout().lock())
                .write_payments(&payments)
                .into_diagnostic()?;
        }
    }

    Ok(())
}

async fn open_in_memory(cli: &Cli) -> Result<FulfillmentService> {
    let catalog = InMemoryCatalog::new();
    load_catalog(&catalog, cli.catalog.as_deref()).await?;
    let orders = InMemoryOrderStore::new();

    assemble(
        Box::new(catalog),
        Box::new(orders.clone()),
        Box::new(orders),
        Box::new(InMemoryPaymentStore::new()),
        &cli.gateway_url,
    )
}

#[cfg(feature = "storage-rocksdb")]
async fn open_persistent(db_path: &Path, cli: &Cli) -> Result<FulfillmentService> {
    use orderflow::infrastructure::rocksdb::RocksDBStore;

    let store = RocksDBStore::open(db_path).into_diagnostic()?;
    load_catalog(&store, cli.catalog.as_deref()).await?;

    assemble(
        Box::new(store.clone()),
        Box::new(store.clone()),
        Box::new(store.clone()),
        Box::new(store),
        &cli.gateway_url,
    )
}

#[cfg(not(feature = "storage-rocksdb"))]
async fn open_persistent(db_path: &Path, cli: &Cli) -> Result<FulfillmentService> {
    tracing::warn!(
        db_path = %db_path.display(),
        "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
    );
    open_in_memory(cli).await
}

fn assemble(
    catalog: CatalogReaderBox,
    engine_orders: OrderStoreBox,
    payment_orders: OrderStoreBox,
    payments: PaymentStoreBox,
    gateway_url: &str,
) -> Result<FulfillmentService> {
    let orders = OrderEngine::from_config(
        OrderEngineConfig::default()
            .with_order_store(engine_orders)
            .with_catalog(catalog),
    )
    .into_diagnostic()?;

    let payments = PaymentEngine::from_config(
        PaymentEngineConfig::default()
            .with_payment_store(payments)
            .with_order_store(payment_orders)
            .with_gateway_base_url(gateway_url),
    )
    .into_diagnostic()?;

    Ok(FulfillmentService::new(orders, payments))
}

async fn load_catalog<C: CatalogStore>(catalog: &C, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::open(path).into_diagnostic()?;
    let mut loaded = 0usize;
    for product in ProductReader::new(file).products() {
        match product {
            Ok(product) => {
                catalog.put_product(product).await.into_diagnostic()?;
                loaded += 1;
            }
            Err(e) => tracing::warn!(error = %e, "failed to read product"),
        }
    }
    tracing::info!(loaded, path = %path.display(), "catalog loaded");
    Ok(())
}
