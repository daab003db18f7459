//! Report generation from a computed schedule.
//!
//! This module turns a `ScheduleResult` into per-debt payoff summaries and
//! the plain-text views printed by the binary. All functions are pure and
//! return structured data or strings.

use super::{
    BALANCE_TOLERANCE,
    schedule::{MonthRecord, ScheduleResult},
    round_cents,
};
use crate::models::{Debt, DebtId};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

/// How and when one debt gets paid off.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPayoffSummary {
    pub debt_id: DebtId,
    pub name: String,
    pub starting_balance: f64,
    /// Month number the debt reaches zero; 0 means it was already paid off
    pub payoff_month: u32,
    pub payoff_date: Option<NaiveDate>,
    pub total_paid: f64,
    pub total_interest: f64,
}

impl DebtPayoffSummary {
    #[must_use]
    pub const fn already_paid_off(&self) -> bool {
        self.payoff_month == 0
    }
}

/// Builds one summary per debt, in the order the debts are given.
///
/// Debts that were at zero when the schedule was generated report month 0.
/// Debts missing from the schedule for any other reason are skipped.
#[must_use]
pub fn summarize_payoffs(debts: &[Debt], result: &ScheduleResult) -> Vec<DebtPayoffSummary> {
    debts
        .iter()
        .filter_map(|debt| {
            if debt.is_paid_off() {
                return Some(DebtPayoffSummary {
                    debt_id: debt.id,
                    name: debt.name.clone(),
                    starting_balance: 0.0,
                    payoff_month: 0,
                    payoff_date: None,
                    total_paid: 0.0,
                    total_interest: 0.0,
                });
            }

            let payoff = result.schedule.iter().find(|record| {
                record
                    .line(debt.id)
                    .is_some_and(|line| line.amount > 0.0 && line.remaining < BALANCE_TOLERANCE)
            })?;
            let (total_paid, total_interest) = result
                .lines_for(debt.id)
                .fold((0.0, 0.0), |(paid, interest), line| {
                    (paid + line.amount, interest + line.interest)
                });

            Some(DebtPayoffSummary {
                debt_id: debt.id,
                name: debt.name.clone(),
                starting_balance: debt.balance,
                payoff_month: payoff.month,
                payoff_date: Some(payoff.date),
                total_paid: round_cents(total_paid),
                total_interest: round_cents(total_interest),
            })
        })
        .collect()
}

/// Formats an amount as currency with thousands separators, e.g. `$12,345.67`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Generates a progress bar string like `[████████░░] 80.0%`.
///
/// # Arguments
/// * `progress_percent` - Progress percentage (0-100)
/// * `bar_length` - Length of the bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // clamped_progress ∈ [0, 100] and length is small, so the cast cannot lose anything
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!(
        "[{}{}] {progress_percent:.1}%",
        "█".repeat(filled),
        "░".repeat(empty)
    )
}

/// One-paragraph summary of a schedule.
#[must_use]
pub fn format_schedule_summary(result: &ScheduleResult) -> String {
    if result.is_empty() {
        return "No outstanding debts - nothing to pay off.".to_string();
    }

    let mut summary = format!(
        "{} plan with {} extra per month\n",
        result.strategy.name(),
        format_currency(result.extra_payment)
    );
    let _ = writeln!(
        summary,
        "  Debt-free in {} months ({})",
        result.months,
        result.payoff_date.format("%B %Y")
    );
    let _ = writeln!(
        summary,
        "  Total paid: {} | Total interest: {}",
        format_currency(result.total_paid()),
        format_currency(result.total_interest)
    );
    summary
}

/// Per-debt payoff table.
#[must_use]
pub fn format_payoff_table(summaries: &[DebtPayoffSummary]) -> String {
    let mut table = String::new();
    for summary in summaries {
        if summary.already_paid_off() {
            let _ = writeln!(table, "  {:<20} already paid off", summary.name);
            continue;
        }
        let date = summary
            .payoff_date
            .map_or_else(String::new, |d| d.format("%b %Y").to_string());
        let _ = writeln!(
            table,
            "  {:<20} month {:>4} ({date}) | paid {} | interest {}",
            summary.name,
            summary.payoff_month,
            format_currency(summary.total_paid),
            format_currency(summary.total_interest)
        );
    }
    table
}

/// Lines for a single month, marking the extra-payment target with `*`.
#[must_use]
pub fn format_month(record: &MonthRecord) -> String {
    let mut out = format!(
        "Month {} - {} | paid {} {}\n",
        record.month,
        record.date.format("%Y-%m-%d"),
        format_currency(record.total_paid),
        format_progress_bar(record.progress, None)
    );
    for line in record.payments.iter().filter(|line| line.amount > 0.0) {
        let marker = if line.is_priority { "*" } else { " " };
        let _ = writeln!(
            out,
            "  {marker} {:<20} {:>12} (interest {:>10}) due {:>2} -> {}",
            line.name,
            format_currency(line.amount),
            format_currency(line.interest),
            line.due_day,
            format_currency(line.remaining)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::{schedule::simulate, strategy::Strategy},
        errors::Result,
        test_utils::*,
    };

    #[test]
    fn test_summaries_cover_every_debt() -> Result<()> {
        let debts = vec![
            card(1, "Closed", 0.0, 20.0).with_original_balance(400.0),
            card(2, "Small", 200.0, 0.0).with_minimum_payment(100.0),
            card(3, "Large", 1000.0, 0.0).with_minimum_payment(100.0),
        ];
        let result = simulate(&debts, 0.0, Strategy::Snowball, &test_options())?;

        let summaries = summarize_payoffs(&debts, &result);

        assert_eq!(summaries.len(), 3);
        assert!(summaries[0].already_paid_off());
        assert_eq!(summaries[0].payoff_date, None);
        assert_eq!(summaries[1].payoff_month, 2);
        assert_eq!(summaries[1].total_paid, 200.0);
        assert_eq!(summaries[2].payoff_month, 6);
        assert_eq!(summaries[2].payoff_date, Some(result.payoff_date));
        Ok(())
    }

    #[test]
    fn test_summary_interest_matches_schedule_total() -> Result<()> {
        let debts = sample_debts();
        let result = simulate(&debts, 150.0, Strategy::Avalanche, &test_options())?;

        let summaries = summarize_payoffs(&debts, &result);
        let interest: f64 = summaries.iter().map(|s| s.total_interest).sum();

        assert!((interest - result.total_interest).abs() < 0.01);
        Ok(())
    }

    #[test]
    fn test_payoff_month_includes_offset() -> Result<()> {
        let debts = vec![card(1, "Visa", 300.0, 0.0).with_minimum_payment(100.0)];
        let options = test_options().with_offset(12);
        let result = simulate(&debts, 0.0, Strategy::Snowball, &options)?;

        let summaries = summarize_payoffs(&debts, &result);
        assert_eq!(summaries[0].payoff_month, 15);
        Ok(())
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(1234.567), "$1,234.57");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-250.0), "-$250.00");
    }

    #[test]
    fn test_format_progress_bar_half() {
        assert_eq!(format_progress_bar(50.0, Some(10)), "[█████░░░░░] 50.0%");
    }

    #[test]
    fn test_format_progress_bar_clamps() {
        assert_eq!(format_progress_bar(150.0, Some(4)), "[████] 150.0%");
        assert_eq!(format_progress_bar(-5.0, Some(4)), "[░░░░] -5.0%");
    }

    #[test]
    fn test_format_schedule_summary_empty() -> Result<()> {
        let result = simulate(&[], 0.0, Strategy::Snowball, &test_options())?;
        assert_eq!(
            format_schedule_summary(&result),
            "No outstanding debts - nothing to pay off."
        );
        Ok(())
    }

    #[test]
    fn test_format_schedule_summary() -> Result<()> {
        let debts = vec![card(1, "Visa", 300.0, 0.0).with_minimum_payment(100.0)];
        let result = simulate(&debts, 0.0, Strategy::Snowball, &test_options())?;

        let summary = format_schedule_summary(&result);
        assert!(summary.starts_with("Snowball plan with $0.00 extra per month"));
        assert!(summary.contains("Debt-free in 3 months (April 2024)"));
        assert!(summary.contains("Total paid: $300.00 | Total interest: $0.00"));
        Ok(())
    }

    #[test]
    fn test_format_month_marks_priority() -> Result<()> {
        let debts = vec![
            card(1, "Small", 200.0, 0.0).with_minimum_payment(100.0),
            card(2, "Large", 1000.0, 0.0).with_minimum_payment(100.0),
        ];
        let result = simulate(&debts, 50.0, Strategy::Snowball, &test_options())?;

        let first = result.first_month().map(format_month).unwrap_or_default();
        assert!(first.contains("* Small"));
        assert!(first.contains("  Large"));
        Ok(())
    }
}
