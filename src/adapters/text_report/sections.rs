//! Section renderers for the plain-text reconciliation report.
//!
//! Each function appends one section to the output buffer. Layout is fixed
//! so the same discrepancies always render to the same text.

use crate::domain::discrepancy::{count_by_kind, Discrepancy, FieldDiff};
use crate::domain::trade::TradeRecord;

pub const RULE: &str = "========================================";
pub const TITLE: &str = "TRADE RECONCILIATION REPORT";
pub const GENERATED_PREFIX: &str = "Generated: ";

const NONE: &str = "(none)";

pub fn render_header(out: &mut String, generated_at: &str) {
    out.push_str(&format!("{RULE}\n"));
    out.push_str(&format!("{TITLE}\n"));
    out.push_str(&format!("{GENERATED_PREFIX}{generated_at}\n"));
    out.push_str(&format!("{RULE}\n"));
    out.push('\n');
}

pub fn render_summary(out: &mut String, discrepancies: &[Discrepancy]) {
    out.push_str("SUMMARY\n-------\n");
    out.push_str(&format!("Total Discrepancies: {}\n", discrepancies.len()));
    for (kind, count) in count_by_kind(discrepancies) {
        out.push_str(&format!("{kind}: {count}\n"));
    }
    out.push('\n');
}

pub fn render_details(out: &mut String, discrepancies: &[Discrepancy]) {
    out.push_str("DETAILS\n-------\n");
    if discrepancies.is_empty() {
        out.push_str("No discrepancies found.\n");
        return;
    }
    for (i, d) in discrepancies.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("{}. Trade ID: {}\n", i + 1, d.key()));
        out.push_str(&format!("   Type: {}\n", d.kind()));
        match d {
            Discrepancy::FieldMismatch { field_diffs, .. } => {
                for diff in field_diffs {
                    render_field_diff(out, diff);
                }
            }
            Discrepancy::MissingOnRight { left, .. } => {
                out.push_str("   Trade exists on the left but not on the right\n");
                out.push_str("   Left Data:\n");
                render_record(out, left);
            }
            Discrepancy::MissingOnLeft { right, .. } => {
                out.push_str("   Trade exists on the right but not on the left\n");
                out.push_str("   Right Data:\n");
                render_record(out, right);
            }
        }
    }
}

pub fn render_field_diff(out: &mut String, diff: &FieldDiff) {
    out.push_str(&format!("   Field: {}\n", diff.field));
    out.push_str(&format!("     Left: {}\n", display_or_none(&diff.left_value)));
    out.push_str(&format!("     Right: {}\n", display_or_none(&diff.right_value)));
}

/// Key-value dump of every record field, in declaration order.
pub fn render_record(out: &mut String, record: &TradeRecord) {
    let date = record.trade_date.as_ref().map(|d| d.to_string());
    let notional = record.notional.to_string();
    let rows: [(&str, Option<&str>); 9] = [
        ("id", Some(record.id.as_str())),
        ("trade_date", date.as_deref()),
        ("counterparty", record.counterparty.as_deref()),
        ("instrument", record.instrument.as_deref()),
        ("notional", Some(notional.as_str())),
        ("currency", record.currency.as_deref()),
        ("status", record.status.as_deref()),
        ("source", Some(record.source.as_str())),
        ("message_type", record.message_type.as_deref()),
    ];
    for (name, value) in rows {
        out.push_str(&format!("     {name}: {}\n", value.unwrap_or(NONE)));
    }
}

fn display_or_none(value: &str) -> &str {
    if value.is_empty() { NONE } else { value }
}
