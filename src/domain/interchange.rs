//! Interchange (MT) message segmentation and field extraction.
//!
//! A raw file holds zero or more messages, each spanning from a `{1:` block
//! start to the first `-}` that follows it. Only MT103 and MT300 fields are
//! read; every other type yields a record carrying just its id.

use crate::domain::parse_result::{ParsedTrades, WarningLocation};
use crate::domain::trade::{parse_amount, TradeDate, TradeRecord, TradeSource};
use regex::Regex;

pub const BLOCK_START: &str = "{1:";
pub const BLOCK_END: &str = "-}";

const DEFAULT_STATUS: &str = "Confirmed";

/// Candidate messages in file order, plus spans that were opened but never
/// closed.
#[derive(Debug, Default)]
pub struct Segments<'a> {
    pub messages: Vec<&'a str>,
    pub unterminated: Vec<usize>,
}

/// Splits raw text into messages. Text outside `{1:` ... `-}` spans is
/// ignored. A span interrupted by a new `{1:` before its `-}` is dropped and
/// its byte offset recorded.
pub fn split_messages(content: &str) -> Segments<'_> {
    let mut segments = Segments::default();
    let mut pos = 0;

    while let Some(found) = content[pos..].find(BLOCK_START) {
        let start = pos + found;
        let body_start = start + BLOCK_START.len();
        let rest = &content[body_start..];
        let next_start = rest.find(BLOCK_START);
        let span = &rest[..next_start.unwrap_or(rest.len())];

        match span.find(BLOCK_END) {
            Some(end) => {
                let stop = body_start + end + BLOCK_END.len();
                segments.messages.push(&content[start..stop]);
                pos = stop;
            }
            None => {
                segments.unterminated.push(start);
                match next_start {
                    Some(n) => pos = body_start + n,
                    None => break,
                }
            }
        }
    }

    segments
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageType {
    Mt103,
    Mt300,
    Other(String),
}

impl MessageType {
    fn from_digits(digits: &str) -> Self {
        match digits {
            "103" => MessageType::Mt103,
            "300" => MessageType::Mt300,
            other => MessageType::Other(format!("MT{other}")),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageType::Mt103 => "MT103",
            MessageType::Mt300 => "MT300",
            MessageType::Other(s) => s,
        }
    }
}

/// One currency leg: `<CCY><amount>`.
#[derive(Debug, Clone, PartialEq)]
struct Leg {
    currency: String,
    amount: Option<rust_decimal::Decimal>,
}

/// Compiled field patterns. Build once and reuse across messages.
pub struct InterchangeReader {
    mt_token: Regex,
    app_header: Regex,
    reference: Regex,
    mt103_date: Regex,
    mt103_amount: Regex,
    counterparty: Regex,
    mt300_date: Regex,
    buy_leg: Regex,
    sell_leg: Regex,
}

impl InterchangeReader {
    pub fn new() -> Result<Self, regex::Error> {
        const AMOUNT: &str = r"([0-9,]+(?:\.[0-9]+)?)";
        Ok(Self {
            mt_token: Regex::new(r"MT([0-9]{3})(?:[^0-9]|$)")?,
            app_header: Regex::new(r"\{2:[IO]([0-9]{3})")?,
            reference: Regex::new(r"(?m)(?:^|:)20:([A-Za-z0-9/.\-]+)")?,
            mt103_date: Regex::new(r"(?m)(?:^|:)30:([0-9]{2})([0-9]{2})([0-9]{2})")?,
            mt103_amount: Regex::new(&format!(
                r"(?m)(?:^|:)32A:[0-9]{{6}}([A-Z]{{3}}){AMOUNT}"
            ))?,
            counterparty: Regex::new(r"(?m)(?:^|:)50[AK]:/?([A-Za-z0-9]+)")?,
            mt300_date: Regex::new(r"(?m)(?:^|:)30T:([0-9]{4})([0-9]{2})([0-9]{2})")?,
            buy_leg: Regex::new(&format!(r"(?m)(?:^|:)33B:([A-Z]{{3}}){AMOUNT}"))?,
            sell_leg: Regex::new(&format!(r"(?m)(?:^|:)53B:([A-Z]{{3}}){AMOUNT}"))?,
        })
    }

    /// Segments `content` and extracts one record per message.
    pub fn read(&self, content: &str) -> ParsedTrades {
        let segments = split_messages(content);
        let mut parsed = ParsedTrades::default();

        for offset in segments.unterminated {
            parsed.warn(
                WarningLocation::Offset(offset),
                "message opened with {1: but never closed with -}; discarded",
            );
        }

        for (i, message) in segments.messages.iter().enumerate() {
            let index = i + 1;
            let message_type = self.message_type(message);
            if message_type.is_none() {
                parsed.warn(WarningLocation::Message(index), "no message type found");
            }
            let record = self.extract(index, message, message_type.as_ref());
            if let Some(MessageType::Other(t)) = &message_type {
                tracing::debug!(index, message_type = %t, "unsupported message type, fields skipped");
            }
            parsed.records.push(record);
        }

        tracing::info!(
            messages = parsed.records.len(),
            warnings = parsed.warnings.len(),
            "parsed interchange messages"
        );
        parsed
    }

    /// First `MT` followed by exactly three digits, else the application
    /// header block's type.
    pub fn message_type(&self, message: &str) -> Option<MessageType> {
        self.mt_token
            .captures(message)
            .or_else(|| self.app_header.captures(message))
            .and_then(|c| c.get(1))
            .map(|m| MessageType::from_digits(m.as_str()))
    }

    fn extract(
        &self,
        index: usize,
        message: &str,
        message_type: Option<&MessageType>,
    ) -> TradeRecord {
        let id = self
            .capture(&self.reference, message, 1)
            .map(|r| r.trim_end_matches('-').to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| format!("SWIFT-{index}"));

        let mut record = TradeRecord::new(id, TradeSource::ExternalSwift);
        record.status = Some(DEFAULT_STATUS.to_string());
        record.message_type = message_type.map(|t| t.as_str().to_string());

        match message_type {
            Some(MessageType::Mt103) => self.extract_mt103(message, &mut record),
            Some(MessageType::Mt300) => self.extract_mt300(message, &mut record),
            _ => {}
        }
        record
    }

    fn extract_mt103(&self, message: &str, record: &mut TradeRecord) {
        if let Some(c) = self.mt103_date.captures(message) {
            let text = format!("20{}-{}-{}", &c[1], &c[2], &c[3]);
            record.trade_date = Some(TradeDate::parse(&text));
        }
        if let Some(leg) = self.leg(&self.mt103_amount, message) {
            if let Some(amount) = leg.amount {
                record.notional = amount;
            }
            record.currency = Some(leg.currency);
        }
        record.counterparty = self.capture(&self.counterparty, message, 1).map(String::from);
    }

    fn extract_mt300(&self, message: &str, record: &mut TradeRecord) {
        if let Some(c) = self.mt300_date.captures(message) {
            let text = format!("{}-{}-{}", &c[1], &c[2], &c[3]);
            record.trade_date = Some(TradeDate::parse(&text));
        }
        let buy = self.leg(&self.buy_leg, message);
        let sell = self.leg(&self.sell_leg, message);
        if let (Some(b), Some(s)) = (&buy, &sell) {
            record.instrument = Some(format!("{}/{}", b.currency, s.currency));
        }
        if let Some(b) = buy {
            if let Some(amount) = b.amount {
                record.notional = amount;
            }
            record.currency = Some(b.currency);
        }
        record.counterparty = self.capture(&self.counterparty, message, 1).map(String::from);
    }

    fn leg(&self, pattern: &Regex, message: &str) -> Option<Leg> {
        let c = pattern.captures(message)?;
        Some(Leg {
            currency: c[1].to_string(),
            amount: parse_amount(&c[2]),
        })
    }

    fn capture<'m>(&self, pattern: &Regex, message: &'m str, group: usize) -> Option<&'m str> {
        pattern
            .captures(message)
            .and_then(|c| c.get(group))
            .map(|m| m.as_str())
    }
}
