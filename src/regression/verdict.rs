// Regression verdict for a baseline/candidate performance comparison

use crate::regression::table::{PerfRow, PerfTable};

/// A profile that got worse than its baseline
#[derive(Debug, Clone, PartialEq)]
pub struct RegressedProfile {
    pub profile: String,
    pub baseline: PerfRow,
    pub candidate: PerfRow,
}

impl RegressedProfile {
    /// Throughput dropped below baseline
    pub fn throughput_dropped(&self) -> bool {
        self.candidate.pps < self.baseline.pps
    }

    /// Cost per symbol rose above baseline
    pub fn cost_increased(&self) -> bool {
        self.candidate.cycles_per_symbol > self.baseline.cycles_per_symbol
    }

    /// Report line: `<profile>: pps <b>-><n>, cycles/sym <b>-><n>`
    pub fn to_report_line(&self) -> String {
        format!(
            "{}: pps {:.2}->{:.2}, cycles/sym {:.2}->{:.2}",
            self.profile,
            self.baseline.pps,
            self.candidate.pps,
            self.baseline.cycles_per_symbol,
            self.candidate.cycles_per_symbol
        )
    }
}

/// Final verdict for a performance comparison
#[derive(Debug, Clone, PartialEq)]
pub enum RegressionVerdict {
    /// No profile is worse than its baseline
    NoRegression { compared: usize },

    /// At least one profile regressed
    Regression { regressed: Vec<RegressedProfile> },
}

impl RegressionVerdict {
    pub fn is_regression(&self) -> bool {
        matches!(self, RegressionVerdict::Regression { .. })
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        match self {
            RegressionVerdict::NoRegression { .. } => "No regressions detected.\n".to_string(),
            RegressionVerdict::Regression { regressed } => {
                let mut report = String::from("REGRESSION DETECTED\n");
                for profile in regressed {
                    report.push_str(&profile.to_report_line());
                    report.push('\n');
                }
                report
            }
        }
    }
}

/// Profiles in `candidate` that are worse than `baseline`, in candidate order
///
/// A profile regresses iff `pps` strictly dropped or `cycles_per_symbol`
/// strictly rose. Profiles missing from either table are skipped.
///
/// # Example
/// ```
/// use loravec::regression::{detect, PerfRow, PerfTable};
///
/// let baseline = PerfTable::from_rows([PerfRow::new("p1", 100.0, 10.0)]).unwrap();
/// let candidate = PerfTable::from_rows([PerfRow::new("p1", 90.0, 10.0)]).unwrap();
///
/// let regressed = detect(&baseline, &candidate);
/// assert_eq!(regressed.len(), 1);
/// assert!(regressed[0].throughput_dropped());
/// ```
pub fn detect(baseline: &PerfTable, candidate: &PerfTable) -> Vec<RegressedProfile> {
    candidate
        .iter()
        .filter_map(|cand| {
            let base = baseline.get(&cand.profile)?;
            let regressed = RegressedProfile {
                profile: cand.profile.clone(),
                baseline: base.clone(),
                candidate: cand.clone(),
            };
            (regressed.throughput_dropped() || regressed.cost_increased()).then_some(regressed)
        })
        .collect()
}

/// Run [`detect`] and wrap the outcome in a verdict
pub fn assess_regression(baseline: &PerfTable, candidate: &PerfTable) -> RegressionVerdict {
    let regressed = detect(baseline, candidate);
    if regressed.is_empty() {
        let compared = candidate
            .iter()
            .filter(|row| baseline.get(&row.profile).is_some())
            .count();
        tracing::info!("Compared {} profiles, no regressions", compared);
        RegressionVerdict::NoRegression { compared }
    } else {
        for profile in &regressed {
            tracing::warn!("Regressed profile {}", profile.profile);
        }
        RegressionVerdict::Regression { regressed }
    }
}
