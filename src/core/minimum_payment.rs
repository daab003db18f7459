//! Minimum-payment policy.
//!
//! Computes the contractual monthly minimum for a debt from its type, balance
//! and rate. The same function backs both the simulator (when a debt has no
//! explicit minimum) and validation of user-entered minimums.

use super::round_cents;
use crate::{
    errors::{Error, Result},
    models::{Debt, DebtType},
};
use serde::{Deserialize, Serialize};

/// Tunable parameters for the minimum-payment formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimumPaymentConfig {
    /// Share of the balance due each month on a credit card (0.03 = 3%)
    pub credit_card_percentage: f64,
    /// Absolute floor for a credit card minimum
    pub credit_card_minimum_amount: f64,
    /// Term over which a consumer loan's minimum fully retires the balance
    pub consumer_loan_payoff_months: u32,
}

impl Default for MinimumPaymentConfig {
    fn default() -> Self {
        Self {
            credit_card_percentage: 0.03,
            credit_card_minimum_amount: 300.0,
            consumer_loan_payoff_months: 60,
        }
    }
}

impl MinimumPaymentConfig {
    /// # Errors
    /// Returns `Error::InvalidInput` for a negative or non-finite amount or a
    /// zero payoff term.
    pub fn validate(&self) -> Result<()> {
        if !self.credit_card_percentage.is_finite()
            || !(0.0..=1.0).contains(&self.credit_card_percentage)
        {
            return Err(Error::invalid(format!(
                "credit card percentage {} must be between 0 and 1",
                self.credit_card_percentage
            )));
        }
        if !self.credit_card_minimum_amount.is_finite() || self.credit_card_minimum_amount < 0.0 {
            return Err(Error::invalid(format!(
                "credit card minimum amount {} must be non-negative",
                self.credit_card_minimum_amount
            )));
        }
        if self.consumer_loan_payoff_months == 0 {
            return Err(Error::invalid("consumer loan payoff months must be at least 1"));
        }
        Ok(())
    }
}

/// Computes the minimum monthly payment, rounded to cents.
///
/// * Credit card: `max(balance * percentage, minimum_amount)`
/// * Consumer loan: level annuity payment retiring `balance` over
///   `consumer_loan_payoff_months` at `interest_rate / 100 / 12` per month
#[must_use]
pub fn minimum_payment(
    debt_type: DebtType,
    balance: f64,
    interest_rate: f64,
    config: &MinimumPaymentConfig,
) -> f64 {
    match debt_type {
        DebtType::CreditCard => round_cents(
            (balance * config.credit_card_percentage).max(config.credit_card_minimum_amount),
        ),
        DebtType::ConsumerLoan => {
            let months = config.consumer_loan_payoff_months.max(1);
            round_cents(annuity_payment(balance, interest_rate / 100.0 / 12.0, months))
        }
    }
}

fn annuity_payment(balance: f64, monthly_rate: f64, months: u32) -> f64 {
    let n = f64::from(months);
    if monthly_rate == 0.0 {
        return balance / n;
    }
    (monthly_rate * balance) / (1.0 - (1.0 + monthly_rate).powf(-n))
}

/// Minimum the simulator uses for `debt`: its explicit minimum if set,
/// otherwise the policy floor for its starting balance.
#[must_use]
pub fn effective_minimum(debt: &Debt, config: &MinimumPaymentConfig) -> f64 {
    debt.minimum_payment.map_or_else(
        || minimum_payment(debt.debt_type, debt.balance, debt.interest_rate, config),
        round_cents,
    )
}

/// Rejects an entered minimum payment that is below the policy floor.
///
/// The floor never exceeds the balance itself, so a small debt may always be
/// cleared in one payment.
///
/// # Errors
/// Returns `Error::InvalidInput` with the required floor in the message.
pub fn validate_minimum_payment(
    debt: &Debt,
    entered: f64,
    config: &MinimumPaymentConfig,
) -> Result<()> {
    if !entered.is_finite() || entered < 0.0 {
        return Err(Error::invalid(format!(
            "minimum payment {entered} must be a non-negative amount"
        )));
    }

    let floor = minimum_payment(debt.debt_type, debt.balance, debt.interest_rate, config)
        .min(round_cents(debt.balance));
    if round_cents(entered) < floor {
        return Err(Error::invalid(format!(
            "minimum payment for '{}' must be at least {floor:.2}",
            debt.name
        )));
    }
    Ok(())
}
