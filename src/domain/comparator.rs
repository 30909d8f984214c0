//! Keyed matching of two trade sets with tolerant field comparison.
//!
//! Both sides are reduced to key -> record maps in first-seen key order. When
//! a side repeats a key, the later record replaces the earlier one and the
//! collapse is reported as a [`DuplicateKey`]. The output is emitted in two
//! passes: every left key (missing on the right, or mismatched), then every
//! right-only key.

use crate::domain::discrepancy::{Discrepancy, FieldDiff, TradeField};
use crate::domain::trade::{TradeDate, TradeRecord};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;

/// 0.01
pub const DEFAULT_NOTIONAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// A key that appeared more than once on one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateKey {
    pub side: Side,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    pub discrepancies: Vec<Discrepancy>,
    /// Keys present on both sides with no field differences.
    pub clean_matches: usize,
    pub duplicate_keys: Vec<DuplicateKey>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparator {
    tolerance: Decimal,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIONAL_TOLERANCE)
    }
}

impl Comparator {
    pub fn new(tolerance: Decimal) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    pub fn compare(&self, left: &[TradeRecord], right: &[TradeRecord]) -> Vec<Discrepancy> {
        self.compare_detailed(left, right).discrepancies
    }

    pub fn compare_detailed(&self, left: &[TradeRecord], right: &[TradeRecord]) -> Comparison {
        let mut comparison = Comparison::default();
        let left_map = index_by_key(left, Side::Left, &mut comparison.duplicate_keys);
        let right_map = index_by_key(right, Side::Right, &mut comparison.duplicate_keys);

        for (key, left_trade) in &left_map {
            match right_map.get(key) {
                None => comparison.discrepancies.push(Discrepancy::MissingOnRight {
                    key: key.clone(),
                    left: (*left_trade).clone(),
                }),
                Some(right_trade) => {
                    let field_diffs = self.field_diffs(left_trade, right_trade);
                    if field_diffs.is_empty() {
                        comparison.clean_matches += 1;
                    } else {
                        comparison.discrepancies.push(Discrepancy::FieldMismatch {
                            key: key.clone(),
                            left: (*left_trade).clone(),
                            right: (*right_trade).clone(),
                            field_diffs,
                        });
                    }
                }
            }
        }

        for (key, right_trade) in &right_map {
            if !left_map.contains_key(key) {
                comparison.discrepancies.push(Discrepancy::MissingOnLeft {
                    key: key.clone(),
                    right: (*right_trade).clone(),
                });
            }
        }

        tracing::info!(
            left = left_map.len(),
            right = right_map.len(),
            clean = comparison.clean_matches,
            discrepancies = comparison.discrepancies.len(),
            "comparison complete"
        );
        comparison
    }

    /// Differences between two records sharing a key, in a fixed field order.
    pub fn field_diffs(&self, left: &TradeRecord, right: &TradeRecord) -> Vec<FieldDiff> {
        let mut diffs = Vec::new();

        let within_tolerance = left
            .notional
            .checked_sub(right.notional)
            .is_some_and(|d| d.abs() <= self.tolerance);
        if !within_tolerance {
            diffs.push(FieldDiff {
                field: TradeField::Notional,
                left_value: left.notional.to_string(),
                right_value: right.notional.to_string(),
            });
        }

        let left_date = date_text(left.trade_date.as_ref());
        let right_date = date_text(right.trade_date.as_ref());
        if left_date != right_date {
            diffs.push(FieldDiff {
                field: TradeField::TradeDate,
                left_value: left_date,
                right_value: right_date,
            });
        }

        for (field, l, r) in [
            (
                TradeField::Counterparty,
                left.counterparty.as_deref(),
                right.counterparty.as_deref(),
            ),
            (
                TradeField::Instrument,
                left.instrument.as_deref(),
                right.instrument.as_deref(),
            ),
        ] {
            let (l, r) = (trimmed(l), trimmed(r));
            if l.to_uppercase() != r.to_uppercase() {
                diffs.push(FieldDiff {
                    field,
                    left_value: l.to_string(),
                    right_value: r.to_string(),
                });
            }
        }

        let (l, r) = (
            trimmed(left.currency.as_deref()),
            trimmed(right.currency.as_deref()),
        );
        if !l.is_empty() && !r.is_empty() && l.to_uppercase() != r.to_uppercase() {
            diffs.push(FieldDiff {
                field: TradeField::Currency,
                left_value: l.to_string(),
                right_value: r.to_string(),
            });
        }

        diffs
    }
}

/// Compares with the default 0.01 notional tolerance.
pub fn compare(left: &[TradeRecord], right: &[TradeRecord]) -> Vec<Discrepancy> {
    Comparator::default().compare(left, right)
}

fn index_by_key<'a>(
    records: &'a [TradeRecord],
    side: Side,
    duplicates: &mut Vec<DuplicateKey>,
) -> IndexMap<String, &'a TradeRecord> {
    let mut map = IndexMap::with_capacity(records.len());
    for record in records {
        let key = record.key();
        if map.insert(key.clone(), record).is_some() {
            tracing::warn!(?side, %key, "duplicate trade key, keeping the later record");
            duplicates.push(DuplicateKey { side, key });
        }
    }
    map
}

fn trimmed(value: Option<&str>) -> &str {
    value.map(str::trim).unwrap_or("")
}

fn date_text(date: Option<&TradeDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}
