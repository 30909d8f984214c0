//! Discrepancy records produced by the comparator.

use crate::domain::trade::TradeRecord;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    FieldMismatch,
    MissingOnRight,
    MissingOnLeft,
}

impl DiscrepancyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscrepancyKind::FieldMismatch => "field_mismatch",
            DiscrepancyKind::MissingOnRight => "missing_on_right",
            DiscrepancyKind::MissingOnLeft => "missing_on_left",
        }
    }
}

impl fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compared fields, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeField {
    Notional,
    TradeDate,
    Counterparty,
    Instrument,
    Currency,
}

impl TradeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeField::Notional => "notional",
            TradeField::TradeDate => "trade_date",
            TradeField::Counterparty => "counterparty",
            TradeField::Instrument => "instrument",
            TradeField::Currency => "currency",
        }
    }
}

impl fmt::Display for TradeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub field: TradeField,
    pub left_value: String,
    pub right_value: String,
}

/// One per key that did not reconcile cleanly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Discrepancy {
    FieldMismatch {
        key: String,
        left: TradeRecord,
        right: TradeRecord,
        field_diffs: Vec<FieldDiff>,
    },
    MissingOnRight {
        key: String,
        left: TradeRecord,
    },
    MissingOnLeft {
        key: String,
        right: TradeRecord,
    },
}

impl Discrepancy {
    pub fn kind(&self) -> DiscrepancyKind {
        match self {
            Discrepancy::FieldMismatch { .. } => DiscrepancyKind::FieldMismatch,
            Discrepancy::MissingOnRight { .. } => DiscrepancyKind::MissingOnRight,
            Discrepancy::MissingOnLeft { .. } => DiscrepancyKind::MissingOnLeft,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Discrepancy::FieldMismatch { key, .. }
            | Discrepancy::MissingOnRight { key, .. }
            | Discrepancy::MissingOnLeft { key, .. } => key,
        }
    }

    pub fn left(&self) -> Option<&TradeRecord> {
        match self {
            Discrepancy::FieldMismatch { left, .. } | Discrepancy::MissingOnRight { left, .. } => {
                Some(left)
            }
            Discrepancy::MissingOnLeft { .. } => None,
        }
    }

    pub fn right(&self) -> Option<&TradeRecord> {
        match self {
            Discrepancy::FieldMismatch { right, .. } | Discrepancy::MissingOnLeft { right, .. } => {
                Some(right)
            }
            Discrepancy::MissingOnRight { .. } => None,
        }
    }

    /// Empty unless this is a field mismatch.
    pub fn field_diffs(&self) -> &[FieldDiff] {
        match self {
            Discrepancy::FieldMismatch { field_diffs, .. } => field_diffs,
            _ => &[],
        }
    }
}

/// Per-kind totals, ordered by first appearance.
pub fn count_by_kind(discrepancies: &[Discrepancy]) -> Vec<(DiscrepancyKind, usize)> {
    let mut counts: Vec<(DiscrepancyKind, usize)> = Vec::new();
    for d in discrepancies {
        let kind = d.kind();
        match counts.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, n)) => *n += 1,
            None => counts.push((kind, 1)),
        }
    }
    counts
}
