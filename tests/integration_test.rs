//! End-to-end reconciliation tests.
//!
//! Tests cover:
//! - The reference scenarios against real files on disk
//! - Tolerance boundary and key normalization across parsers
//! - Error taxonomy (unsupported format, I/O, trade source, persistence)
//! - Report output through the file adapter
//! - Completeness and determinism of comparison (proptest)

mod common;

use common::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tradematch::adapters::interchange_adapter::InterchangeAdapter;
use tradematch::adapters::text_report::{self, TextReportAdapter};
use tradematch::domain::comparator::Comparator;
use tradematch::domain::discrepancy::{Discrepancy, DiscrepancyKind, TradeField};
use tradematch::domain::error::ReconError;
use tradematch::domain::trade::TradeSource;
use tradematch::ports::trade_file_port::TradeFilePort;
use tradematch::reconciliation::ReconciliationEngine;

mod reference_scenarios {
    use super::*;

    #[test]
    fn notional_within_tolerance_is_clean() {
        let csv = format!("{CSV_HEADER}{}", csv_row("TRD-1", "1000000.005"));
        let (_dir, path) = write_fixture("ext.csv", &csv);
        let left = vec![internal_trade("TRD-1", dec!(1000000))];

        let result = ReconciliationEngine::default()
            .reconcile(&left, &path, "tabular")
            .unwrap();
        assert!(result.is_clean());
        assert_eq!(result.clean_matches, 1);
        assert_eq!(result.matched, 1);
    }

    #[test]
    fn notional_outside_tolerance_is_one_field_diff() {
        let csv = format!("{CSV_HEADER}{}", csv_row("TRD-1", "1000050"));
        let (_dir, path) = write_fixture("ext.csv", &csv);
        let left = vec![internal_trade("TRD-1", dec!(1000000))];

        let result = ReconciliationEngine::default()
            .reconcile(&left, &path, "tabular")
            .unwrap();
        assert_eq!(result.discrepancies.len(), 1);
        let d = &result.discrepancies[0];
        assert_eq!(d.kind(), DiscrepancyKind::FieldMismatch);
        assert_eq!(d.field_diffs().len(), 1);
        assert_eq!(d.field_diffs()[0].field, TradeField::Notional);
    }

    #[test]
    fn empty_right_side_is_missing_on_right() {
        let (_dir, path) = write_fixture("ext.csv", CSV_HEADER);
        let left = vec![internal_trade("TRD-1", dec!(1000000))];

        let result = ReconciliationEngine::default()
            .reconcile(&left, &path, "csv")
            .unwrap();
        assert_eq!(result.right_count, 0);
        match &result.discrepancies[..] {
            [Discrepancy::MissingOnRight { key, left }] => {
                assert_eq!(key, "TRD-1");
                assert_eq!(left.source, TradeSource::Internal);
            }
            other => panic!("unexpected discrepancies: {other:?}"),
        }
        assert!(result.discrepancies[0].right().is_none());
    }

    #[test]
    fn ad_hoc_headers_are_normalized() {
        let (_dir, path) = write_fixture(
            "ext.csv",
            "Trade ID,Date,Amount,Cpty\nTRD-1,2024-01-15,1000000,Deutsche Bank\n",
        );
        let result = ReconciliationEngine::default()
            .reconcile(
                &[tradematch::domain::trade::TradeRecord {
                    instrument: None,
                    currency: None,
                    ..internal_trade("TRD-1", dec!(1000000))
                }],
                &path,
                "tabular",
            )
            .unwrap();
        assert!(result.is_clean(), "{:?}", result.discrepancies);
    }

    #[test]
    fn mt300_legs_become_instrument_and_notional() {
        let (_dir, path) =
            write_fixture("ext.fin", &mt300("FX-1", "USD1,000,000.00", "EUR920,000.00"));
        let parsed = InterchangeAdapter::new().unwrap().parse_file(&path).unwrap();
        assert_eq!(parsed.records.len(), 1);
        let r = &parsed.records[0];
        assert_eq!(r.instrument.as_deref(), Some("USD/EUR"));
        assert_eq!(r.notional, dec!(1000000.00));
        assert_eq!(r.currency.as_deref(), Some("USD"));
        assert_eq!(r.source, TradeSource::ExternalSwift);
        assert_eq!(r.message_type.as_deref(), Some("MT300"));
    }
}

mod tolerance_and_keys {
    use super::*;

    fn notional_diffs(left: Decimal, right: Decimal) -> usize {
        let diffs = Comparator::default().field_diffs(
            &internal_trade("A", left),
            &external_trade("A", right),
        );
        diffs.iter().filter(|d| d.field == TradeField::Notional).count()
    }

    #[test]
    fn boundary_is_inclusive() {
        assert_eq!(notional_diffs(dec!(100000.00), dec!(100000.01)), 0);
        assert_eq!(notional_diffs(dec!(100000.00), dec!(100000.02)), 1);
        assert_eq!(notional_diffs(dec!(100000.01), dec!(100000.00)), 0);
    }

    #[test]
    fn extreme_notionals_reconcile_without_overflow() {
        let csv = format!("{CSV_HEADER}{}", csv_row("TRD-1", "-79228162514264337593543950335"));
        let (_dir, path) = write_fixture("ext.csv", &csv);
        let result = ReconciliationEngine::default()
            .reconcile(&[internal_trade("TRD-1", Decimal::MAX)], &path, "tabular")
            .unwrap();
        assert_eq!(result.discrepancies.len(), 1);
        assert_eq!(result.discrepancies[0].field_diffs()[0].field, TradeField::Notional);
    }

    #[test]
    fn custom_tolerance_widens_match() {
        let engine = ReconciliationEngine::new(Comparator::new(dec!(100)));
        let csv = format!("{CSV_HEADER}{}", csv_row("TRD-1", "1000050"));
        let (_dir, path) = write_fixture("ext.csv", &csv);
        let result = engine
            .reconcile(&[internal_trade("TRD-1", dec!(1000000))], &path, "tabular")
            .unwrap();
        assert!(result.is_clean());
    }

    #[test]
    fn ids_match_across_case_and_whitespace() {
        let csv = format!("{CSV_HEADER}{}", csv_row(" trd-001 ", "5"));
        let (_dir, path) = write_fixture("ext.csv", &csv);
        let result = ReconciliationEngine::default()
            .reconcile(&[internal_trade("TRD-001", dec!(5))], &path, "tabular")
            .unwrap();
        assert!(result.is_clean());
    }

    #[test]
    fn interchange_reference_matches_internal_id() {
        let content = format!(
            "{}{}",
            mt103("TRD-7", "USD250,000"),
            mt300("TRD-8", "USD1,000,000.00", "EUR920,000.00")
        );
        let (_dir, path) = write_fixture("ext.fin", &content);
        let mut left = vec![
            internal_trade("TRD-7", dec!(250000)),
            internal_trade("TRD-8", dec!(1000000)),
        ];
        left[0].instrument = None;
        for t in &mut left {
            t.counterparty = Some("deutsche".into());
        }

        let result = ReconciliationEngine::default()
            .reconcile(&left, &path, "swift")
            .unwrap();
        assert_eq!(result.right_count, 2);
        assert!(result.is_clean(), "{:?}", result.discrepancies);
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn unsupported_format_never_touches_file() {
        let err = ReconciliationEngine::default()
            .reconcile(&[], Path::new("/nonexistent/trades.xlsx"), "xlsx")
            .unwrap_err();
        assert!(matches!(err, ReconError::UnsupportedFormat { format } if format == "xlsx"));
    }

    #[test]
    fn unsupported_format_checked_before_source_fetch() {
        let source = MockTradeSource::new(vec![]);
        let err = ReconciliationEngine::default()
            .reconcile_from_source(&source, Path::new("/nonexistent"), "pdf")
            .unwrap_err();
        assert!(matches!(err, ReconError::UnsupportedFormat { .. }));
        assert_eq!(*source.calls.borrow(), 0);
    }

    #[test]
    fn unreadable_file_is_io_error() {
        for format in ["tabular", "interchange"] {
            let err = ReconciliationEngine::default()
                .reconcile(&[], Path::new("/nonexistent/ext.dat"), format)
                .unwrap_err();
            assert!(matches!(err, ReconError::Io { .. }), "{format}: {err}");
        }
    }

    #[test]
    fn trade_source_failure_is_surfaced() {
        let (_dir, path) = write_fixture("ext.csv", CSV_HEADER);
        let err = ReconciliationEngine::default()
            .reconcile_from_source(&MockTradeSource::failing("upstream timeout"), &path, "csv")
            .unwrap_err();
        assert!(matches!(err, ReconError::TradeSource { reason } if reason == "upstream timeout"));
    }

    #[test]
    fn persistence_failure_keeps_result() {
        let (_dir, path) = write_fixture("ext.csv", CSV_HEADER);
        let engine = ReconciliationEngine::default();
        let result = engine
            .reconcile(&[internal_trade("TRD-1", dec!(1))], &path, "csv")
            .unwrap();
        let snapshot = result.clone();

        let port = FailingReportPort::new();
        let err = engine
            .generate_report(&result, Path::new("/reports/out.txt"), &port)
            .unwrap_err();
        assert!(matches!(err, ReconError::Persistence { .. }));
        assert_eq!(port.attempts.borrow().len(), 1);
        assert_eq!(port.attempts.borrow()[0].0, 1);
        assert_eq!(result, snapshot);
    }

    #[test]
    fn malformed_rows_and_messages_are_warnings() {
        let content = format!(
            "{{1:F01TRUNCATED\n{}{{1:A}}{{4:\n:20:NOTYPE\n-}}",
            mt103("PAY-1", "USD10")
        );
        let (_dir, path) = write_fixture("ext.fin", &content);
        let result = ReconciliationEngine::default()
            .reconcile(&[], &path, "mt")
            .unwrap();
        assert_eq!(result.right_count, 2);
        assert_eq!(result.warnings.len(), 2);
    }
}

mod report_output {
    use super::*;

    #[test]
    fn report_written_through_engine() {
        let csv = format!(
            "{CSV_HEADER}{}{}",
            csv_row("TRD-1", "1000050"),
            csv_row("TRD-3", "10")
        );
        let (dir, path) = write_fixture("ext.csv", &csv);
        let engine = ReconciliationEngine::default();
        let left = vec![
            internal_trade("TRD-1", dec!(1000000)),
            internal_trade("TRD-2", dec!(5)),
        ];
        let result = engine.reconcile(&left, &path, "tabular").unwrap();
        assert_eq!(result.matched, -1);

        let out = dir.path().join("out").join("report.txt");
        let written = engine
            .generate_report(&result, &out, &TextReportAdapter::new())
            .unwrap();
        assert_eq!(written, out);

        let report = fs::read_to_string(&out).unwrap();
        assert!(report.contains("Total Discrepancies: 3\n"));
        assert!(report.contains("field_mismatch: 1\n"));
        assert!(report.contains("missing_on_right: 1\n"));
        assert!(report.contains("missing_on_left: 1\n"));
        assert!(report.contains("1. Trade ID: TRD-1\n"));
        assert!(report.contains("3. Trade ID: TRD-3\n"));
        assert!(report.contains("     Left: 1000000\n     Right: 1000050\n"));
    }

    #[test]
    fn report_is_deterministic_without_timestamp() {
        let left = vec![internal_trade("A", dec!(1)), internal_trade("B", dec!(2))];
        let right = vec![external_trade("b", dec!(3)), external_trade("C", dec!(4))];
        let first = Comparator::default().compare(&left, &right);
        let second = Comparator::default().compare(&left, &right);
        assert_eq!(
            text_report::strip_timestamp(&text_report::render(&first, "t1")),
            text_report::strip_timestamp(&text_report::render(&second, "t2"))
        );
    }
}

mod properties {
    use super::*;

    fn trades(ids: Vec<(u8, u32)>, external: bool) -> Vec<tradematch::domain::trade::TradeRecord> {
        ids.into_iter()
            .map(|(id, n)| {
                let id = format!("trd-{id}");
                let notional = Decimal::from(n);
                if external {
                    external_trade(&id, notional)
                } else {
                    internal_trade(&id, notional)
                }
            })
            .collect()
    }

    proptest! {
        #[test]
        fn every_key_lands_in_exactly_one_bucket(
            left in prop::collection::vec((0u8..12, 0u32..3), 0..10),
            right in prop::collection::vec((0u8..12, 0u32..3), 0..10),
        ) {
            let left = trades(left, false);
            let right = trades(right, true);
            let comparison = Comparator::default().compare_detailed(&left, &right);

            let union: HashSet<String> = left.iter().chain(right.iter()).map(|t| t.key()).collect();
            let keys: Vec<&str> = comparison.discrepancies.iter().map(|d| d.key()).collect();
            let distinct: HashSet<&str> = keys.iter().copied().collect();

            prop_assert_eq!(distinct.len(), keys.len());
            prop_assert!(distinct.iter().all(|k| union.contains(*k)));
            prop_assert_eq!(comparison.clean_matches + keys.len(), union.len());
        }

        #[test]
        fn comparison_is_deterministic(
            left in prop::collection::vec((0u8..8, 0u32..3), 0..8),
            right in prop::collection::vec((0u8..8, 0u32..3), 0..8),
        ) {
            let left = trades(left, false);
            let right = trades(right, true);
            let a = Comparator::default().compare(&left, &right);
            let b = Comparator::default().compare(&left, &right);
            prop_assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );
        }
    }
}
