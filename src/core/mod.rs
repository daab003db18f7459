//! Core business logic - payoff ordering, minimum payments and the schedule simulator.
//!
//! Everything in here is pure and synchronous: no I/O, no shared state. The
//! same inputs always produce the same output, so callers are free to cache a
//! schedule keyed on its full input or to run several what-if simulations
//! side by side.

/// What-if comparisons between schedules and strategies
pub mod comparison;
/// Minimum-payment policy and validation of entered minimums
pub mod minimum_payment;
/// Per-debt payoff summaries and text formatting
pub mod report;
/// Month-by-month payoff simulation
pub mod schedule;
/// Debt ordering strategies (snowball, avalanche, custom)
pub mod strategy;

pub use comparison::{
    ScheduleComparison, StrategyOutcome, compare_schedules, compare_strategies,
    compare_with_minimums_only,
};
pub use minimum_payment::{MinimumPaymentConfig, minimum_payment, validate_minimum_payment};
pub use report::{DebtPayoffSummary, summarize_payoffs};
pub use schedule::{
    DebtPaymentLine, MonthRecord, ScheduleResult, SimulationOptions, generate_schedule, simulate,
};
pub use strategy::{Strategy, UnsetPriority};

/// Anything below one cent counts as paid off.
pub const BALANCE_TOLERANCE: f64 = 0.01;

/// Rounds a currency amount to whole cents.
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(10.005_000_1), 10.01);
        assert_eq!(round_cents(10.004), 10.0);
        assert_eq!(round_cents(0.1 + 0.2), 0.3);
        assert_eq!(round_cents(-0.004), 0.0);
    }
}
