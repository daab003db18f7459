//! Plan file loading from TOML.
//!
//! The plan file holds the debts to simulate together with the repayment
//! settings and the minimum-payment policy. Every section is optional; a
//! missing section falls back to the same defaults the library uses.
//!
//! ```toml
//! [plan]
//! strategy = "avalanche"
//! extra_payment = 250.0
//!
//! [minimum_payment]
//! credit_card_percentage = 0.03
//!
//! [[debts]]
//! id = 1
//! name = "Visa"
//! type = "credit_card"
//! balance = 4200.0
//! interest_rate = 21.9
//! ```

use crate::{
    core::{
        MinimumPaymentConfig, SimulationOptions, Strategy, UnsetPriority,
        schedule::DEFAULT_MAX_MONTHS,
    },
    errors::{Error, Result},
    models::Debt,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

const PLAN_PATH_VAR: &str = "DEBT_PLAN_PATH";
const DEFAULT_PLAN_PATH: &str = "debts.toml";

/// Configuration structure representing the entire plan file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanFile {
    #[serde(default)]
    pub plan: PlanSettings,
    #[serde(default)]
    pub minimum_payment: MinimumPaymentConfig,
    #[serde(default)]
    pub debts: Vec<Debt>,
}

/// The `[plan]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlanSettings {
    pub strategy: Strategy,
    /// Monthly amount on top of all minimum payments
    pub extra_payment: f64,
    pub start_month_offset: u32,
    pub cascade_extra: bool,
    pub unset_priority: UnsetPriority,
    pub max_months: u32,
    /// Simulation "today"; the current date when absent
    pub start_date: Option<NaiveDate>,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            strategy: Strategy::Avalanche,
            extra_payment: 0.0,
            start_month_offset: 0,
            cascade_extra: true,
            unset_priority: UnsetPriority::default(),
            max_months: DEFAULT_MAX_MONTHS,
            start_date: None,
        }
    }
}

impl PlanFile {
    /// Builds simulator options from the plan and policy sections.
    #[must_use]
    pub fn simulation_options(&self) -> SimulationOptions {
        let start_date = self
            .plan
            .start_date
            .unwrap_or_else(|| Utc::now().date_naive());

        SimulationOptions::starting_on(start_date)
            .with_offset(self.plan.start_month_offset)
            .with_cascade(self.plan.cascade_extra)
            .with_unset_priority(self.plan.unset_priority)
            .with_max_months(self.plan.max_months)
            .with_minimum_payment(self.minimum_payment)
    }

    /// Validates every debt and the policy, and checks ids are unique.
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` for the first problem found.
    pub fn validate(&self) -> Result<()> {
        if !self.plan.extra_payment.is_finite() || self.plan.extra_payment < 0.0 {
            return Err(Error::invalid(format!(
                "extra payment {} must be a non-negative amount",
                self.plan.extra_payment
            )));
        }
        if self.plan.max_months == 0 {
            return Err(Error::invalid("max months must be at least 1"));
        }
        self.minimum_payment.validate()?;

        let mut ids = HashSet::with_capacity(self.debts.len());
        for debt in &self.debts {
            debt.validate()?;
            if !ids.insert(debt.id) {
                return Err(Error::invalid(format!("duplicate debt id {}", debt.id)));
            }
        }
        Ok(())
    }
}

/// Parses and validates plan file contents.
///
/// # Errors
/// Returns `Error::Config` when the TOML is malformed and
/// `Error::InvalidInput` when a value is out of range.
pub fn parse_plan(contents: &str) -> Result<PlanFile> {
    let plan: PlanFile = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse plan file: {e}"),
    })?;
    plan.validate()?;
    Ok(plan)
}

/// Loads a plan file from disk.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid or a required debt field is missing
/// - A debt or setting fails validation
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<PlanFile> {
    let path_ref = path.as_ref();
    debug!("Attempting to load plan from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read plan file {path_ref:?}: {e}"),
    })?;

    let plan = parse_plan(&contents)?;
    info!(
        debts = plan.debts.len(),
        strategy = %plan.plan.strategy,
        "Loaded plan from {:?}",
        path_ref
    );
    Ok(plan)
}

/// Location of the plan file: `DEBT_PLAN_PATH` if set, else `./debts.toml`.
///
/// # Errors
/// Returns `Error::EnvVar` if the variable is set but not valid unicode.
pub fn default_plan_path() -> Result<PathBuf> {
    Ok(super::read_env(PLAN_PATH_VAR)?
        .map_or_else(|| PathBuf::from(DEFAULT_PLAN_PATH), PathBuf::from))
}
