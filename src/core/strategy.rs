//! Debt ordering strategies.
//!
//! A strategy decides which debt receives the extra payment each month. The
//! ordering functions are pure: they never touch their input and always hand
//! back a fresh sequence with the same debts in it. Sorting is stable, so debts
//! that tie on the strategy's key keep the order they came in.

use crate::{
    errors::{Error, Result},
    models::Debt,
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};

/// Repayment strategy used to rank debts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Lowest balance first.
    Snowball,
    /// Highest interest rate first.
    Avalanche,
    /// Lowest user-assigned priority number first.
    Custom,
}

/// Where custom ordering places debts that have no priority number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsetPriority {
    /// Unnumbered debts go ahead of every numbered one.
    First,
    /// Unnumbered debts go after every numbered one.
    #[default]
    Last,
}

/// The fields a strategy looks at. Implemented by `Debt` and by the
/// simulator's per-run working state so both can be ranked the same way.
pub trait PayoffCandidate {
    fn balance(&self) -> f64;
    fn interest_rate(&self) -> f64;
    fn priority(&self) -> Option<i32>;
}

impl PayoffCandidate for Debt {
    fn balance(&self) -> f64 {
        self.balance
    }

    fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    fn priority(&self) -> Option<i32> {
        self.custom_priority_order
    }
}

impl Strategy {
    pub const ALL: [Self; 3] = [Self::Snowball, Self::Avalanche, Self::Custom];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Snowball => "snowball",
            Self::Avalanche => "avalanche",
            Self::Custom => "custom",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Snowball => "Snowball",
            Self::Avalanche => "Avalanche",
            Self::Custom => "Custom order",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Snowball => {
                "Pay off the smallest balance first for quick wins, then roll that payment onto the next debt."
            }
            Self::Avalanche => {
                "Pay off the highest interest rate first to minimize the total interest paid."
            }
            Self::Custom => "Pay off debts in the order you choose.",
        }
    }

    /// Returns the indices of `items` in payoff order (position 0 is the
    /// debt that receives the extra payment).
    pub fn rank<T: PayoffCandidate>(self, items: &[T], unset: UnsetPriority) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..items.len()).collect();
        indices.sort_by(|&a, &b| self.compare(&items[a], &items[b], unset));
        indices
    }

    /// Orders debts by this strategy, placing unnumbered debts last for
    /// custom ordering.
    #[must_use]
    pub fn order(self, debts: &[Debt]) -> Vec<Debt> {
        self.order_with(debts, UnsetPriority::default())
    }

    #[must_use]
    pub fn order_with(self, debts: &[Debt], unset: UnsetPriority) -> Vec<Debt> {
        self.rank(debts, unset)
            .into_iter()
            .map(|index| debts[index].clone())
            .collect()
    }

    fn compare<T: PayoffCandidate>(self, a: &T, b: &T, unset: UnsetPriority) -> Ordering {
        match self {
            Self::Snowball => a.balance().total_cmp(&b.balance()),
            Self::Avalanche => b.interest_rate().total_cmp(&a.interest_rate()),
            Self::Custom => match (a.priority(), b.priority()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (None, None) => Ordering::Equal,
                (None, Some(_)) => match unset {
                    UnsetPriority::First => Ordering::Less,
                    UnsetPriority::Last => Ordering::Greater,
                },
                (Some(_), None) => match unset {
                    UnsetPriority::First => Ordering::Greater,
                    UnsetPriority::Last => Ordering::Less,
                },
            },
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snowball" => Ok(Self::Snowball),
            "avalanche" => Ok(Self::Avalanche),
            "custom" => Ok(Self::Custom),
            other => Err(Error::invalid(format!(
                "unknown strategy '{other}' (expected snowball, avalanche or custom)"
            ))),
        }
    }
}
