//! Debt records consumed by the payoff simulator.
//!
//! A `Debt` is an immutable snapshot: the simulator copies the numbers it needs
//! and never writes back, so the same slice can feed any number of runs.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable debt identifier. All correlation between schedule output and debt
/// records goes through this, never through the display name.
pub type DebtId = i64;

/// Kind of debt; selects the minimum-payment formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtType {
    /// Revolving credit: percentage of balance with an absolute floor.
    CreditCard,
    /// Installment loan: level annuity payment over a fixed term.
    ConsumerLoan,
}

impl DebtType {
    /// Machine key as used in plan files.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::ConsumerLoan => "consumer_loan",
        }
    }
}

impl fmt::Display for DebtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: DebtId,
    pub name: String,
    #[serde(rename = "type")]
    pub debt_type: DebtType,
    /// Current outstanding principal
    pub balance: f64,
    /// Balance when tracking started; only used for progress reporting
    #[serde(default)]
    pub original_balance: f64,
    /// Nominal annual percentage rate (0-100)
    pub interest_rate: f64,
    /// Contractual monthly minimum; derived from the policy when absent
    #[serde(default)]
    pub minimum_payment: Option<f64>,
    #[serde(default = "default_due_day")]
    pub due_day: u32,
    #[serde(default)]
    pub custom_priority_order: Option<i32>,
}

const fn default_due_day() -> u32 {
    1
}

impl Debt {
    /// Creates a debt with no explicit minimum payment, due on the 1st.
    #[must_use]
    pub fn new(
        id: DebtId,
        name: impl Into<String>,
        debt_type: DebtType,
        balance: f64,
        interest_rate: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            debt_type,
            balance,
            original_balance: balance,
            interest_rate,
            minimum_payment: None,
            due_day: default_due_day(),
            custom_priority_order: None,
        }
    }

    #[must_use]
    pub const fn with_minimum_payment(mut self, minimum_payment: f64) -> Self {
        self.minimum_payment = Some(minimum_payment);
        self
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.custom_priority_order = Some(priority);
        self
    }

    #[must_use]
    pub const fn with_due_day(mut self, due_day: u32) -> Self {
        self.due_day = due_day;
        self
    }

    #[must_use]
    pub const fn with_original_balance(mut self, original_balance: f64) -> Self {
        self.original_balance = original_balance;
        self
    }

    /// Whether the debt is settled (below one cent).
    #[must_use]
    pub fn is_paid_off(&self) -> bool {
        self.balance < crate::core::BALANCE_TOLERANCE
    }

    /// Balance used as the 100% mark for progress reporting.
    ///
    /// Falls back to the current balance when no original balance was recorded
    /// or when the debt has grown past it.
    #[must_use]
    pub fn progress_basis(&self) -> f64 {
        self.original_balance.max(self.balance)
    }

    /// Checks the field ranges a simulation relies on.
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid(format!("debt {} has an empty name", self.id)));
        }
        if !self.balance.is_finite() || self.balance < 0.0 {
            return Err(Error::invalid(format!(
                "debt '{}' has invalid balance {}",
                self.name, self.balance
            )));
        }
        if !self.original_balance.is_finite() || self.original_balance < 0.0 {
            return Err(Error::invalid(format!(
                "debt '{}' has invalid original balance {}",
                self.name, self.original_balance
            )));
        }
        if !self.interest_rate.is_finite() || !(0.0..=100.0).contains(&self.interest_rate) {
            return Err(Error::invalid(format!(
                "debt '{}' has interest rate {} outside 0-100",
                self.name, self.interest_rate
            )));
        }
        if let Some(minimum) = self.minimum_payment {
            if !minimum.is_finite() || minimum < 0.0 {
                return Err(Error::invalid(format!(
                    "debt '{}' has invalid minimum payment {minimum}",
                    self.name
                )));
            }
        }
        if !(1..=31).contains(&self.due_day) {
            return Err(Error::invalid(format!(
                "debt '{}' has due day {} outside 1-31",
                self.name, self.due_day
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_sane_debt() -> Result<()> {
        Debt::new(1, "Visa", DebtType::CreditCard, 5000.0, 19.9).validate()
    }

    #[test]
    fn test_validate_rejects_negative_balance() {
        let debt = Debt::new(1, "Visa", DebtType::CreditCard, -1.0, 19.9);
        assert!(matches!(debt.validate(), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_validate_rejects_rate_out_of_range() {
        let debt = Debt::new(1, "Visa", DebtType::CreditCard, 100.0, 120.0);
        assert!(matches!(debt.validate(), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_due_day() {
        let debt = Debt::new(1, "Visa", DebtType::CreditCard, 100.0, 10.0).with_due_day(32);
        assert!(matches!(debt.validate(), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let debt = Debt::new(7, "  ", DebtType::ConsumerLoan, 100.0, 10.0);
        assert!(matches!(debt.validate(), Err(Error::InvalidInput { .. })));
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_progress_basis_falls_back_to_balance() {
        let debt = Debt::new(1, "Loan", DebtType::ConsumerLoan, 800.0, 5.0).with_original_balance(0.0);
        assert_eq!(debt.progress_basis(), 800.0);

        let debt = debt.with_original_balance(1000.0);
        assert_eq!(debt.progress_basis(), 1000.0);
    }

    #[test]
    fn test_deserialize_from_toml() -> Result<()> {
        let debt: Debt = toml::from_str(
            r#"
                id = 3
                name = "Car loan"
                type = "consumer_loan"
                balance = 12000.0
                interest_rate = 6.5
                due_day = 15
            "#,
        )
        .map_err(|e| Error::Config {
            message: e.to_string(),
        })?;

        assert_eq!(debt.debt_type, DebtType::ConsumerLoan);
        assert_eq!(debt.due_day, 15);
        assert!(debt.minimum_payment.is_none());
        assert!(debt.custom_priority_order.is_none());
        Ok(())
    }
}
