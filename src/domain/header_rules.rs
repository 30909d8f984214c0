//! Column header normalization for tabular trade files.
//!
//! Headers are lower-cased, trimmed, and have whitespace runs collapsed to
//! `_`, then matched against an ordered rule table. The first rule with a
//! pattern contained in the header decides the canonical name; headers no
//! rule matches pass through in their normalized form.

pub const TRADE_ID: &str = "trade_id";
pub const TRADE_DATE: &str = "trade_date";
pub const NOTIONAL: &str = "notional";
pub const COUNTERPARTY: &str = "counterparty";
pub const INSTRUMENT: &str = "instrument";
pub const CURRENCY: &str = "currency";
pub const STATUS: &str = "status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRule {
    pub patterns: &'static [&'static str],
    pub canonical: &'static str,
}

pub const HEADER_RULES: &[HeaderRule] = &[
    HeaderRule {
        patterns: &["trade_id", "tradeid", "id"],
        canonical: TRADE_ID,
    },
    HeaderRule {
        patterns: &["trade_date", "tradedate", "date"],
        canonical: TRADE_DATE,
    },
    HeaderRule {
        patterns: &["notional", "amount", "value"],
        canonical: NOTIONAL,
    },
    HeaderRule {
        patterns: &["counterparty", "cpty"],
        canonical: COUNTERPARTY,
    },
    HeaderRule {
        patterns: &["instrument", "inst"],
        canonical: INSTRUMENT,
    },
];

/// Lower-case, trim, and collapse whitespace runs to underscores.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

pub fn canonical_header_with(raw: &str, rules: &[HeaderRule]) -> String {
    let normalized = normalize_header(raw);
    rules
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| normalized.contains(p)))
        .map(|rule| rule.canonical.to_string())
        .unwrap_or(normalized)
}

pub fn canonical_header(raw: &str) -> String {
    canonical_header_with(raw, HEADER_RULES)
}
