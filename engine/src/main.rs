// cryptodata entry point
use anyhow::Context;
use clap::Parser;
use engine::cli::{Cli, Commands};
use engine::client::{KrakenClient, MarketDataClient};
use engine::config::EngineSettings;
use engine::data::AssetDirectory;
use engine::indicators::AnnotatedTable;
use engine::output::{write_table, CsvRow};
use engine::services::{Connection, Dashboard};
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn emit<R: CsvRow>(table: &AnnotatedTable<R>, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_table(table, file)?;
            info!(path = %path.display(), rows = table.len(), "Wrote table");
        }
        None => write_table(table, io::stdout().lock())?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = EngineSettings::load(cli.config.as_deref()).context("loading settings")?;
    let names_path = cli.asset_names.clone().unwrap_or_else(|| settings.asset_names_path.clone());
    let directory = AssetDirectory::load_from_csv(&names_path)
        .with_context(|| format!("loading asset names from {}", names_path.display()))?;
    info!(assets = directory.len(), "Starting cryptodata");

    let client: Arc<dyn MarketDataClient> = Arc::new(KrakenClient::new(&settings.api)?);
    let dashboard = Dashboard::new(client, &settings)?;

    match cli.command {
        Commands::Status => {
            let report = dashboard.connection().await?;
            match report.connection {
                Connection::Online => println!("connected, server time {}", report.server_time),
                Connection::Degraded(status) => {
                    println!("degraded ({}), server time {}", status, report.server_time)
                }
            }
        }
        Commands::Assets => {
            let catalog = dashboard.catalog(&directory).await?;
            for asset in catalog.assets() {
                println!("{}\t{}\t{}", asset.name, asset.code, asset.altname);
            }
        }
        Commands::Quotes { asset } => {
            let catalog = dashboard.catalog(&directory).await?;
            let selected = catalog
                .find_asset(&asset)
                .with_context(|| format!("unknown asset '{}'", asset))?;
            for quote in catalog.quotes_for(&selected.code) {
                println!("{}", quote);
            }
        }
        Commands::Trades { asset, quote, timeframe, output } => {
            let catalog = dashboard.catalog(&directory).await?;
            let selected = catalog
                .find_asset(&asset)
                .with_context(|| format!("unknown asset '{}'", asset))?;
            let pair = catalog.pair_code(&selected.code, &quote)?;

            let result = dashboard.run(&pair, timeframe).await?;
            if let Some(price) = result.last_price {
                info!(pair = %result.pair, price, "Last price");
            }
            emit(&result.table, output.as_deref())?;
        }
        Commands::Ohlc { pairs, interval, output } => {
            let table = dashboard.ohlc_overview(&pairs, interval).await?;
            emit(&table, output.as_deref())?;
        }
    }

    Ok(())
}
