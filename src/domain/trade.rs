//! Canonical trade record shared by both sides of a reconciliation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Date layouts tried, in order, before a date is kept verbatim.
/// Slash-separated dates with the year last are read month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Where a record came from. Assigned at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSource {
    Internal,
    ExternalCsv,
    ExternalSwift,
}

impl TradeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSource::Internal => "internal",
            TradeSource::ExternalCsv => "external_csv",
            TradeSource::ExternalSwift => "external_swift",
        }
    }
}

impl fmt::Display for TradeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trade date: either a calendar date or the original text when no known
/// layout matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeDate {
    Date(NaiveDate),
    Raw(String),
}

impl TradeDate {
    pub fn parse(input: &str) -> Self {
        match parse_calendar_date(input.trim()) {
            Some(date) => TradeDate::Date(date),
            None => TradeDate::Raw(input.to_string()),
        }
    }

    /// Parses an optional field; blank text means no date.
    pub fn from_field(input: Option<&str>) -> Option<Self> {
        input
            .filter(|s| !s.trim().is_empty())
            .map(TradeDate::parse)
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            TradeDate::Date(d) => Some(*d),
            TradeDate::Raw(_) => None,
        }
    }
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDate::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            TradeDate::Raw(s) => f.write_str(s),
        }
    }
}

impl Serialize for TradeDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    if input.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(input, fmt) {
            return Some(d);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Normalizes a date to `YYYY-MM-DD`, returning the input unchanged when it
/// cannot be read as a date.
pub fn normalize_date(input: &str) -> String {
    TradeDate::parse(input).to_string()
}

/// Matching key for a trade id.
pub fn normalize_key(id: &str) -> String {
    id.trim().to_uppercase()
}

/// Parses an amount, ignoring thousands separators. `None` when unreadable.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// The canonical unit on both sides of reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub id: String,
    pub trade_date: Option<TradeDate>,
    pub counterparty: Option<String>,
    pub instrument: Option<String>,
    pub notional: Decimal,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub source: TradeSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
}

impl TradeRecord {
    pub fn new(id: impl Into<String>, source: TradeSource) -> Self {
        Self {
            id: id.into(),
            trade_date: None,
            counterparty: None,
            instrument: None,
            notional: Decimal::ZERO,
            currency: None,
            status: None,
            source,
            message_type: None,
        }
    }

    pub fn key(&self) -> String {
        normalize_key(&self.id)
    }
}
