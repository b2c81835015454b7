// Performance regression detection against a recorded baseline
//
// Each benchmark profile reports throughput (`pps`, higher is better) and
// cost (`cycles_per_symbol`, lower is better). A profile regresses when the
// candidate is strictly worse on either metric; equality never regresses.
//
// Only profiles present in both tables are judged:
// - candidate-only profiles have nothing to regress against
// - baseline-only profiles are treated as discontinued
//
// Every regressed profile is collected before the verdict is reported.

mod table;
mod verdict;

pub use table::{PerfRow, PerfTable};
pub use verdict::{assess_regression, detect, RegressedProfile, RegressionVerdict};

#[cfg(test)]
mod tests;
