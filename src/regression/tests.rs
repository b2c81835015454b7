// Scenario tests for performance regression detection
//
// Tables mirror the benchmark CSVs produced by the performance test runner:
// one row per (spreading factor, oversampling, window) profile.

use super::*;

fn table(rows: &[(&str, f64, f64)]) -> PerfTable {
    PerfTable::from_rows(rows.iter().map(|(p, pps, cps)| PerfRow::new(*p, *pps, *cps))).unwrap()
}

/// Scenario: throughput dropped, cost unchanged
/// Expected: regression flagged
#[test]
fn test_throughput_drop_is_regression() {
    let baseline = table(&[("p1", 100.0, 10.0)]);
    let candidate = table(&[("p1", 90.0, 10.0)]);

    let regressed = detect(&baseline, &candidate);
    assert_eq!(regressed.len(), 1);
    assert_eq!(regressed[0].profile, "p1");
    assert!(regressed[0].throughput_dropped());
    assert!(!regressed[0].cost_increased());
}

/// Scenario: identical measurements
/// Expected: equality is not a regression
#[test]
fn test_equal_measurements_pass() {
    let baseline = table(&[("p1", 100.0, 10.0)]);
    let candidate = table(&[("p1", 100.0, 10.0)]);

    assert!(detect(&baseline, &candidate).is_empty());
    assert_eq!(
        assess_regression(&baseline, &candidate),
        RegressionVerdict::NoRegression { compared: 1 }
    );
}

/// Scenario: cycles per symbol rose while throughput improved
/// Expected: either metric alone is enough to regress
#[test]
fn test_cost_increase_alone_is_regression() {
    let baseline = table(&[("sf7_osr1", 1000.0, 400.0)]);
    let candidate = table(&[("sf7_osr1", 1100.0, 400.5)]);

    let regressed = detect(&baseline, &candidate);
    assert_eq!(regressed.len(), 1);
    assert!(regressed[0].cost_increased());
}

/// Scenario: every profile strictly faster and cheaper
/// Expected: no regressions
#[test]
fn test_strict_improvement_never_regresses() {
    let baseline = table(&[("a", 10.0, 5.0), ("b", 200.0, 80.0), ("c", 1.5, 9000.0)]);
    let candidate = table(&[("a", 10.1, 4.9), ("b", 250.0, 60.0), ("c", 1.6, 8999.0)]);

    assert!(detect(&baseline, &candidate).is_empty());
}

/// Scenario: new benchmark profile added, old one retired
/// Expected: neither is judged
#[test]
fn test_unmatched_profiles_ignored() {
    let baseline = table(&[("retired", 100.0, 10.0), ("kept", 100.0, 10.0)]);
    let candidate = table(&[("kept", 100.0, 10.0), ("brand_new", 1.0, 1e9)]);

    let verdict = assess_regression(&baseline, &candidate);
    assert_eq!(verdict, RegressionVerdict::NoRegression { compared: 1 });
}

/// Scenario: several profiles regress
/// Expected: all are reported, in candidate order
#[test]
fn test_all_regressions_collected_in_candidate_order() {
    let baseline = table(&[("a", 100.0, 10.0), ("b", 100.0, 10.0), ("c", 100.0, 10.0)]);
    let candidate = table(&[("c", 99.0, 10.0), ("b", 100.0, 10.0), ("a", 100.0, 11.0)]);

    let verdict = assess_regression(&baseline, &candidate);
    match verdict {
        RegressionVerdict::Regression { ref regressed } => {
            let names: Vec<&str> = regressed.iter().map(|r| r.profile.as_str()).collect();
            assert_eq!(names, vec!["c", "a"]);
        }
        _ => panic!("Expected Regression verdict"),
    }
    assert!(verdict.is_regression());
}

/// Scenario: tables parsed from the benchmark CSV format
/// Expected: same verdict as constructing rows directly
#[test]
fn test_csv_tables_end_to_end() {
    let baseline = PerfTable::from_csv_str(
        "profile,pps,cycles_per_symbol\nsf7,1200.00,350.00\nsf9,300.00,1400.00\n",
    )
    .unwrap();
    let candidate = PerfTable::from_csv_str(
        "profile,pps,cycles_per_symbol\nsf7,1210.00,349.00\nsf9,295.50,1400.00\n",
    )
    .unwrap();

    let report = assess_regression(&baseline, &candidate).to_report_string();
    assert_eq!(
        report,
        "REGRESSION DETECTED\nsf9: pps 300.00->295.50, cycles/sym 1400.00->1400.00\n"
    );
}
