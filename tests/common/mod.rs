#![allow(dead_code)]

use rust_decimal::Decimal;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tradematch::domain::discrepancy::Discrepancy;
use tradematch::domain::error::ReconError;
use tradematch::domain::trade::{TradeDate, TradeRecord, TradeSource};
use tradematch::ports::report_port::ReportPort;
use tradematch::ports::trade_source_port::TradeSourcePort;

pub struct MockTradeSource {
    pub trades: Vec<TradeRecord>,
    pub error: Option<String>,
    pub calls: RefCell<usize>,
}

impl MockTradeSource {
    pub fn new(trades: Vec<TradeRecord>) -> Self {
        Self {
            trades,
            error: None,
            calls: RefCell::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            trades: vec![],
            error: Some(reason.to_string()),
            calls: RefCell::new(0),
        }
    }
}

impl TradeSourcePort for MockTradeSource {
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, ReconError> {
        *self.calls.borrow_mut() += 1;
        match &self.error {
            Some(reason) => Err(ReconError::TradeSource {
                reason: reason.clone(),
            }),
            None => Ok(self.trades.clone()),
        }
    }
}

/// Records what it was asked to write, then fails like a full disk.
pub struct FailingReportPort {
    pub attempts: RefCell<Vec<(usize, PathBuf)>>,
}

impl FailingReportPort {
    pub fn new() -> Self {
        Self {
            attempts: RefCell::new(vec![]),
        }
    }
}

impl ReportPort for FailingReportPort {
    fn write(&self, discrepancies: &[Discrepancy], output_path: &Path) -> Result<(), ReconError> {
        self.attempts
            .borrow_mut()
            .push((discrepancies.len(), output_path.to_path_buf()));
        Err(ReconError::persistence(
            output_path,
            std::io::Error::other("no space left on device"),
        ))
    }
}

pub fn internal_trade(id: &str, notional: Decimal) -> TradeRecord {
    TradeRecord {
        id: id.to_string(),
        trade_date: Some(TradeDate::parse("2024-01-15")),
        counterparty: Some("Deutsche Bank".to_string()),
        instrument: Some("USD/EUR".to_string()),
        notional,
        currency: Some("USD".to_string()),
        status: Some("Confirmed".to_string()),
        source: TradeSource::Internal,
        message_type: None,
    }
}

pub fn external_trade(id: &str, notional: Decimal) -> TradeRecord {
    TradeRecord {
        source: TradeSource::ExternalCsv,
        ..internal_trade(id, notional)
    }
}

pub const CSV_HEADER: &str = "Trade ID,Trade Date,Counterparty,Instrument,Notional,Currency\n";

pub fn csv_row(id: &str, notional: &str) -> String {
    format!("{id},2024-01-15,Deutsche Bank,USD/EUR,{notional},USD\n")
}

pub fn mt300(reference: &str, buy: &str, sell: &str) -> String {
    format!(
        "{{1:F01BANKUS33AXXX0000000000}}{{2:I300BANKDEFFXXXXN}}{{4:\n\
         :15A:MT300\n\
         :20:{reference}\n\
         :30T:20240115\n\
         :33B:{buy}\n\
         :53B:{sell}\n\
         :50A:DEUTSCHE\n\
         -}}\n"
    )
}

pub fn mt103(reference: &str, amount: &str) -> String {
    format!(
        "{{1:F01BANKUS33AXXX0000000000}}{{2:I103BANKDEFFXXXXN}}{{4:\n\
         :20:{reference}\n\
         :30:240115\n\
         :32A:240115{amount}\n\
         :50K:DEUTSCHE\n\
         -}}\n"
    )
}

/// Writes `content` to `name` inside a fresh temp dir.
pub fn write_fixture(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    (dir, path)
}

pub fn internal_json(trades: &[(&str, &str)]) -> String {
    let rows: Vec<String> = trades
        .iter()
        .map(|(id, notional)| {
            format!(
                r#"{{"id": "{id}", "tradeDate": "2024-01-15", "counterparty": "Deutsche Bank", "instrument": "USD/EUR", "notional": {notional}, "currency": "USD", "status": "Confirmed"}}"#
            )
        })
        .collect();
    format!("[{}]", rows.join(",\n"))
}
