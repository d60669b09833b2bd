// CSV rendering of annotated tables.
use shared::models::{OhlcBar, OrderType, Side, Trade};
use std::io::Write;

use crate::error::Result;
use crate::indicators::AnnotatedTable;

/// A row that knows its own CSV columns.
pub trait CsvRow {
    fn headers() -> &'static [&'static str];
    fn fields(&self) -> Vec<String>;
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl CsvRow for Trade {
    fn headers() -> &'static [&'static str] {
        &["pair", "time", "price", "volume", "side", "order_type", "misc"]
    }

    fn fields(&self) -> Vec<String> {
        let side = match self.side {
            Some(Side::Buy) => "buy",
            Some(Side::Sell) => "sell",
            None => "",
        };
        let order_type = match self.order_type {
            Some(OrderType::Market) => "market",
            Some(OrderType::Limit) => "limit",
            None => "",
        };
        vec![
            self.pair.clone(),
            self.time.to_rfc3339(),
            number(self.price),
            number(self.volume),
            side.to_string(),
            order_type.to_string(),
            self.misc.clone(),
        ]
    }
}

impl CsvRow for OhlcBar {
    fn headers() -> &'static [&'static str] {
        &["pair_name", "time", "open", "high", "low", "close", "vwap", "volume", "trade_count"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.pair_name.clone(),
            self.time.to_rfc3339(),
            number(self.open),
            number(self.high),
            number(self.low),
            number(self.close),
            number(self.vwap),
            number(self.volume),
            self.trade_count.to_string(),
        ]
    }
}

/// Row columns followed by one column per indicator; undefined values are
/// written as empty cells.
pub fn write_table<R: CsvRow, W: Write>(table: &AnnotatedTable<R>, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = R::headers().iter().map(|h| h.to_string()).collect();
    header.extend(table.indicators.iter().map(|i| i.name.clone()));
    wtr.write_record(&header)?;

    for (idx, row) in table.rows.iter().enumerate() {
        let mut record = row.fields();
        record.extend(table.indicators.iter().map(|i| number(i.values.get(idx).copied().flatten())));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
