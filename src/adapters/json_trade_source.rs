//! File-backed authoritative trade source.
//!
//! Reads a JSON array of internal trades, as exported by the upstream
//! trading system. Field names are accepted in either `camelCase` or
//! `snake_case` (`tradeDate` / `trade_date`, `id` / `trade_id`).

use crate::domain::error::ReconError;
use crate::domain::trade::{parse_amount, TradeDate, TradeRecord, TradeSource};
use crate::ports::trade_source_port::TradeSourcePort;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InternalTradeRow {
    id: Option<Value>,
    trade_id: Option<Value>,
    #[serde(rename = "tradeId")]
    trade_id_camel: Option<Value>,
    #[serde(alias = "tradeDate")]
    trade_date: Option<String>,
    counterparty: Option<String>,
    instrument: Option<String>,
    notional: Option<Value>,
    currency: Option<String>,
    status: Option<String>,
}

pub struct JsonTradeSource {
    path: PathBuf,
}

impl JsonTradeSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn parse_str(content: &str) -> Result<Vec<TradeRecord>, ReconError> {
        let rows: Vec<InternalTradeRow> =
            serde_json::from_str(content).map_err(|e| ReconError::TradeSource {
                reason: format!("invalid trades JSON: {e}"),
            })?;
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| convert(i + 1, row))
            .collect()
    }
}

fn convert(position: usize, row: InternalTradeRow) -> Result<TradeRecord, ReconError> {
    let id = [row.id, row.trade_id, row.trade_id_camel]
        .into_iter()
        .find_map(id_text)
        .ok_or_else(|| ReconError::TradeSource {
            reason: format!("trade {position} has no id"),
        })?;

    let notional = match row.notional {
        Some(Value::Number(n)) => parse_amount(&n.to_string()).unwrap_or(Decimal::ZERO),
        Some(Value::String(s)) => parse_amount(&s).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    };

    Ok(TradeRecord {
        id,
        trade_date: TradeDate::from_field(row.trade_date.as_deref()),
        counterparty: row.counterparty,
        instrument: row.instrument,
        notional,
        currency: row.currency.filter(|c| !c.trim().is_empty()),
        status: row.status,
        source: TradeSource::Internal,
        message_type: None,
    })
}

fn id_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl TradeSourcePort for JsonTradeSource {
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, ReconError> {
        let content = fs::read_to_string(&self.path).map_err(|e| ReconError::io(&self.path, e))?;
        let trades = Self::parse_str(&content)?;
        tracing::info!(trades = trades.len(), path = %self.path.display(), "loaded internal trades");
        Ok(trades)
    }
}
