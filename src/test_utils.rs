//! Shared test utilities for the payoff planner.
//!
//! Debt builders with sensible defaults and a fixed simulation start date so
//! schedules are reproducible across runs.

use crate::{
    core::SimulationOptions,
    models::{Debt, DebtId, DebtType},
};
use chrono::NaiveDate;

/// Start date used by every simulation in the test suite.
#[must_use]
pub fn test_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// Default options anchored on [`test_start_date`].
#[must_use]
pub fn test_options() -> SimulationOptions {
    SimulationOptions::starting_on(test_start_date())
}

/// Creates a credit card with no explicit minimum.
///
/// # Defaults
/// * `due_day`: 1
/// * `original_balance`: same as `balance`
#[must_use]
pub fn card(id: DebtId, name: &str, balance: f64, interest_rate: f64) -> Debt {
    Debt::new(id, name, DebtType::CreditCard, balance, interest_rate)
}

/// Creates a consumer loan with no explicit minimum.
#[must_use]
pub fn loan(id: DebtId, name: &str, balance: f64, interest_rate: f64) -> Debt {
    Debt::new(id, name, DebtType::ConsumerLoan, balance, interest_rate)
}

/// A small mixed portfolio where snowball and avalanche disagree on the
/// first target.
#[must_use]
pub fn sample_debts() -> Vec<Debt> {
    vec![
        loan(1, "Student loan", 1500.0, 4.5).with_minimum_payment(100.0),
        card(2, "Visa", 6000.0, 22.9)
            .with_minimum_payment(180.0)
            .with_due_day(15),
        loan(3, "Car loan", 9000.0, 7.0).with_minimum_payment(250.0),
    ]
}
