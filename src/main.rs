use std::sync::Arc;
use std::{env, fs::File, path::Path};

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use wager_engine::domain::EventStatus;
use wager_engine::{
    BetEngine, CsvReader, Error, MemoryCatalog, MemoryLedger, Processor, TracingDlq, Wallet,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let file_path = env::args()
        .nth(1)
        .ok_or("usage: wager_engine <instructions.csv>")?;
    let file = File::open(Path::new(&file_path))?;

    let store = Arc::new(MemoryLedger::new());
    let catalog = Arc::new(MemoryCatalog::new());
    seed_demo_catalog(&catalog)?;

    let wallet = Wallet::new(store.clone());
    let engine = BetEngine::new(store.clone(), catalog.clone());
    let ingestion = CsvReader::new(file)?;

    let mut processor = Processor::new(ingestion, wallet, engine, store, TracingDlq::default());
    processor.process().await?;
    processor.flush();

    Ok(())
}

/// One upcoming match with the default win/draw market, so instruction
/// files have options 1..=3 to bet on.
fn seed_demo_catalog(catalog: &MemoryCatalog) -> Result<(), Error> {
    let event = catalog.add_event(
        "Football",
        "Manchester United",
        "Liverpool",
        Utc::now() + Duration::hours(2),
        EventStatus::Upcoming,
    );
    catalog.add_option(event.id, "win", "home", Decimal::new(210, 2))?;
    catalog.add_option(event.id, "win", "away", Decimal::new(320, 2))?;
    catalog.add_option(event.id, "win", "draw", Decimal::new(350, 2))?;
    Ok(())
}
