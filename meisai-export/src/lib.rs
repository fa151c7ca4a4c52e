//! meisai-export: CSV export of extracted statement rows.

use std::path::Path;

use meisai_core::{Period, TransactionRow};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Deterministic export name for one card's statement:
/// `<year><zero-padded month><card display name>.csv`.
pub fn export_file_name(period: Period, card_name: &str) -> String {
    format!("{}{}.csv", period.label(), card_name)
}

/// Write one statement export. The header row always goes out, so a period
/// with no postable purchases still yields a header-only file. An existing
/// file of the same name is truncated, making repeat runs idempotent.
pub fn write_statement_csv(path: &Path, rows: &[TransactionRow]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["date", "shop", "pay"])?;
    for row in rows {
        writer.write_record([row.date.as_str(), row.shop.as_str(), row.amount.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}
