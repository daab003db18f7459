//! Environment variable overrides.
//!
//! Lets a deployment tweak the minimum-payment policy and the monthly extra
//! payment without editing the plan file. Values are read after `.env` has
//! been loaded, so either source works.

use super::plan::PlanFile;
use crate::errors::{Error, Result};
use std::{env::VarError, str::FromStr};
use tracing::info;

pub const CREDIT_CARD_PERCENTAGE_VAR: &str = "MIN_PAYMENT_CREDIT_CARD_PERCENTAGE";
pub const CREDIT_CARD_MINIMUM_VAR: &str = "MIN_PAYMENT_CREDIT_CARD_MINIMUM";
pub const LOAN_PAYOFF_MONTHS_VAR: &str = "MIN_PAYMENT_LOAN_PAYOFF_MONTHS";
pub const EXTRA_PAYMENT_VAR: &str = "DEBT_EXTRA_PAYMENT";

/// Reads an environment variable, treating "not set" as `None`.
///
/// # Errors
/// Returns `Error::EnvVar` if the variable is set but not valid unicode.
pub fn read_env(key: &str) -> Result<Option<String>> {
    match std::env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Applies overrides from the process environment.
///
/// # Errors
/// See [`apply_overrides_from`].
pub fn apply_env_overrides(plan: &mut PlanFile) -> Result<()> {
    apply_overrides_from(plan, read_env)
}

/// Applies overrides using `lookup` to resolve variable names, then
/// re-validates the plan.
///
/// # Errors
/// Returns `Error::Config` if a value does not parse, or whatever `lookup`
/// or validation returns.
pub fn apply_overrides_from<F>(plan: &mut PlanFile, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Result<Option<String>>,
{
    if let Some(value) = parse_override(&lookup, CREDIT_CARD_PERCENTAGE_VAR)? {
        plan.minimum_payment.credit_card_percentage = value;
    }
    if let Some(value) = parse_override(&lookup, CREDIT_CARD_MINIMUM_VAR)? {
        plan.minimum_payment.credit_card_minimum_amount = value;
    }
    if let Some(value) = parse_override(&lookup, LOAN_PAYOFF_MONTHS_VAR)? {
        plan.minimum_payment.consumer_loan_payoff_months = value;
    }
    if let Some(value) = parse_override(&lookup, EXTRA_PAYMENT_VAR)? {
        plan.plan.extra_payment = value;
    }
    plan.validate()
}

fn parse_override<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Result<Option<String>>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key)? else {
        return Ok(None);
    };
    let value = raw.trim().parse::<T>().map_err(|e| Error::Config {
        message: format!("Invalid value '{raw}' for {key}: {e}"),
    })?;
    info!("Applied override from {key}");
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(
        vars: HashMap<&'static str, &'static str>,
    ) -> impl Fn(&str) -> Result<Option<String>> {
        move |key: &str| Ok(vars.get(key).map(ToString::to_string))
    }

    #[test]
    fn test_no_overrides_leaves_plan_untouched() -> Result<()> {
        let mut plan = PlanFile::default();
        apply_overrides_from(&mut plan, lookup_in(HashMap::new()))?;

        assert_eq!(plan.minimum_payment.credit_card_percentage, 0.03);
        assert_eq!(plan.plan.extra_payment, 0.0);
        Ok(())
    }

    #[test]
    fn test_overrides_replace_values() -> Result<()> {
        let mut plan = PlanFile::default();
        let vars = HashMap::from([
            (CREDIT_CARD_PERCENTAGE_VAR, "0.05"),
            (CREDIT_CARD_MINIMUM_VAR, " 40 "),
            (LOAN_PAYOFF_MONTHS_VAR, "36"),
            (EXTRA_PAYMENT_VAR, "125.50"),
        ]);
        apply_overrides_from(&mut plan, lookup_in(vars))?;

        assert_eq!(plan.minimum_payment.credit_card_percentage, 0.05);
        assert_eq!(plan.minimum_payment.credit_card_minimum_amount, 40.0);
        assert_eq!(plan.minimum_payment.consumer_loan_payoff_months, 36);
        assert_eq!(plan.plan.extra_payment, 125.5);
        Ok(())
    }

    #[test]
    fn test_unparsable_override_is_config_error() {
        let mut plan = PlanFile::default();
        let result = apply_overrides_from(
            &mut plan,
            lookup_in(HashMap::from([(LOAN_PAYOFF_MONTHS_VAR, "soon")])),
        );
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_out_of_range_override_is_rejected() {
        let mut plan = PlanFile::default();
        let result = apply_overrides_from(
            &mut plan,
            lookup_in(HashMap::from([(EXTRA_PAYMENT_VAR, "-10")])),
        );
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_read_env_missing_variable() -> Result<()> {
        assert_eq!(read_env("DEBT_PLANNER_SURELY_UNSET_VARIABLE")?, None);
        Ok(())
    }
}
