use clap::{Parser, Subcommand};
use shared::models::{OhlcInterval, TimeFrame};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cryptodata")]
#[command(about = "Crypto market dashboard data: trades, OHLC bars, SMA and RSI", long_about = None)]
pub struct Cli {
    /// JSON settings file; defaults apply when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Asset names CSV (`code,name`), overrides the settings file
    #[arg(long, global = true)]
    pub asset_names: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show server time and API status
    Status,
    /// List the selectable assets
    Assets,
    /// List quote currencies for an asset
    Quotes {
        /// Display name, asset code or altname
        asset: String,
    },
    /// Fetch trades for a pair over a time frame and annotate them
    Trades {
        asset: String,
        quote: String,
        /// hour, day, week, month or year
        #[arg(short, long, default_value = "day")]
        timeframe: TimeFrame,
        /// Write CSV here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fetch OHLC bars for one or more pairs and annotate them per pair
    Ohlc {
        #[arg(required = true)]
        pairs: Vec<String>,
        /// 1m, 5m, 15m, 30m, 1h, 4h, 1d, 1w or 15d
        #[arg(short, long, default_value = "1h")]
        interval: OhlcInterval,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
