//! What-if comparisons.
//!
//! Runs the simulator more than once over the same debts and reports how the
//! outcomes differ. Each run is independent, so nothing here needs to share
//! state with the simulator.

use super::{
    schedule::{ScheduleResult, SimulationOptions, simulate},
    strategy::Strategy,
    round_cents,
};
use crate::{errors::Result, models::Debt};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Difference between two schedules over the same debts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleComparison {
    pub baseline_months: u32,
    pub candidate_months: u32,
    /// Positive when the candidate finishes sooner
    pub months_saved: i64,
    /// Positive when the candidate pays less interest
    pub interest_saved: f64,
    pub baseline_payoff_date: NaiveDate,
    pub candidate_payoff_date: NaiveDate,
}

/// One strategy's schedule in a side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyOutcome {
    pub strategy: Strategy,
    pub result: ScheduleResult,
}

#[must_use]
pub fn compare_schedules(baseline: &ScheduleResult, candidate: &ScheduleResult) -> ScheduleComparison {
    ScheduleComparison {
        baseline_months: baseline.months,
        candidate_months: candidate.months,
        months_saved: i64::from(baseline.months) - i64::from(candidate.months),
        interest_saved: round_cents(baseline.total_interest - candidate.total_interest),
        baseline_payoff_date: baseline.payoff_date,
        candidate_payoff_date: candidate.payoff_date,
    }
}

/// Runs every applicable strategy and returns the outcomes cheapest first
/// (by total interest, then by months).
///
/// Custom ordering is only included when every outstanding debt has a
/// priority number.
///
/// # Errors
/// Propagates the first simulation error.
pub fn compare_strategies(
    debts: &[Debt],
    extra_payment: f64,
    options: &SimulationOptions,
) -> Result<Vec<StrategyOutcome>> {
    let custom_applicable = debts
        .iter()
        .filter(|debt| !debt.is_paid_off())
        .all(|debt| debt.custom_priority_order.is_some());

    let mut outcomes = Vec::with_capacity(Strategy::ALL.len());
    for strategy in Strategy::ALL {
        if strategy == Strategy::Custom && !custom_applicable {
            debug!("Skipping custom strategy, not every debt has a priority");
            continue;
        }
        let result = simulate(debts, extra_payment, strategy, options)?;
        outcomes.push(StrategyOutcome { strategy, result });
    }

    outcomes.sort_by(|a, b| {
        a.result
            .total_interest
            .total_cmp(&b.result.total_interest)
            .then(a.result.months.cmp(&b.result.months))
    });
    Ok(outcomes)
}

/// Compares paying only the minimums against paying `extra_payment` on top
/// with `strategy`.
///
/// # Errors
/// Propagates simulation errors from either run, including `NonAmortizing`
/// when the minimums alone never clear the debts.
pub fn compare_with_minimums_only(
    debts: &[Debt],
    extra_payment: f64,
    strategy: Strategy,
    options: &SimulationOptions,
) -> Result<ScheduleComparison> {
    let baseline = simulate(debts, 0.0, strategy, options)?;
    let candidate = simulate(debts, extra_payment, strategy, options)?;
    Ok(compare_schedules(&baseline, &candidate))
}
