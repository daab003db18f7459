//! Payment schedule simulation.
//!
//! Projects a set of debts forward month by month under a repayment strategy:
//! 1. Re-rank the debts that still owe money (balances move, so snowball order can change)
//! 2. Accrue a month of interest on each of them
//! 3. Pay every debt its minimum, never more than it takes to clear it
//! 4. Spend the extra-payment pool on the ranked debts, top first
//! 5. Split each payment into interest and principal and reduce the balance
//!
//! The extra-payment pool is the caller's monthly extra budget plus the
//! minimums of every debt already paid off in an earlier month. All amounts
//! are kept in whole cents.

use super::{
    BALANCE_TOLERANCE,
    minimum_payment::{MinimumPaymentConfig, effective_minimum},
    round_cents,
    strategy::{PayoffCandidate, Strategy, UnsetPriority},
};
use crate::{
    errors::{Error, Result},
    models::{Debt, DebtId},
};
use chrono::{Months, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, instrument, trace, warn};

/// Hard stop for a run; reaching it means the plan never pays off.
pub const DEFAULT_MAX_MONTHS: u32 = 1200;

/// One debt's share of one simulated month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPaymentLine {
    pub debt_id: DebtId,
    pub name: String,
    /// Total paid this month
    pub amount: f64,
    /// Interest portion of `amount`
    pub interest: f64,
    /// Principal portion of `amount`
    pub principal: f64,
    /// Balance after this month's payment
    pub remaining: f64,
    /// Whether this debt was the strategy's extra-payment target this month
    pub is_priority: bool,
    #[serde(rename = "due_day")]
    pub due_day: u32,
}

/// A single simulated month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRecord {
    /// 1-based month number, shifted by the start-month offset
    pub month: u32,
    pub date: NaiveDate,
    pub payments: Vec<DebtPaymentLine>,
    pub total_paid: f64,
    /// Percent of the combined original balances paid off so far
    pub progress: f64,
}

impl MonthRecord {
    #[must_use]
    pub fn line(&self, debt_id: DebtId) -> Option<&DebtPaymentLine> {
        self.payments.iter().find(|line| line.debt_id == debt_id)
    }

    /// The line flagged as this month's extra-payment target, if any.
    #[must_use]
    pub fn priority_line(&self) -> Option<&DebtPaymentLine> {
        self.payments.iter().find(|line| line.is_priority)
    }
}

/// Complete projected payoff schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    /// Number of simulated months until every debt is cleared
    pub months: u32,
    pub total_interest: f64,
    pub payoff_date: NaiveDate,
    pub schedule: Vec<MonthRecord>,
    pub strategy: Strategy,
    pub extra_payment: f64,
}

impl ScheduleResult {
    fn empty(strategy: Strategy, extra_payment: f64, start_date: NaiveDate) -> Self {
        Self {
            months: 0,
            total_interest: 0.0,
            payoff_date: start_date,
            schedule: Vec::new(),
            strategy,
            extra_payment,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }

    /// The first projected month, which drives "what to pay next" views.
    #[must_use]
    pub fn first_month(&self) -> Option<&MonthRecord> {
        self.schedule.first()
    }

    /// Sum of every payment across the schedule.
    #[must_use]
    pub fn total_paid(&self) -> f64 {
        round_cents(self.schedule.iter().map(|m| m.total_paid).sum())
    }

    /// Month number (as stamped on the records) in which `debt_id` reaches
    /// zero. `None` if the debt never appears in the schedule, which is the
    /// case for debts that were already paid off when the run started.
    #[must_use]
    pub fn payoff_month(&self, debt_id: DebtId) -> Option<u32> {
        self.schedule.iter().find_map(|record| {
            record
                .line(debt_id)
                .filter(|line| line.amount > 0.0 && line.remaining < BALANCE_TOLERANCE)
                .map(|_| record.month)
        })
    }

    /// All lines for one debt, in month order.
    pub fn lines_for(&self, debt_id: DebtId) -> impl Iterator<Item = &DebtPaymentLine> + '_ {
        self.schedule
            .iter()
            .filter_map(move |record| record.line(debt_id))
    }
}

/// Knobs for a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    /// "Today": month records are dated relative to this
    pub start_date: NaiveDate,
    /// Added to every record's month number
    pub start_month_offset: u32,
    pub minimum_payment: MinimumPaymentConfig,
    /// Spread leftover extra payment down the ranking within the same month
    pub cascade_extra: bool,
    pub unset_priority: UnsetPriority,
    pub max_months: u32,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self::starting_on(Utc::now().date_naive())
    }
}

impl SimulationOptions {
    #[must_use]
    pub fn starting_on(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            start_month_offset: 0,
            minimum_payment: MinimumPaymentConfig::default(),
            cascade_extra: true,
            unset_priority: UnsetPriority::default(),
            max_months: DEFAULT_MAX_MONTHS,
        }
    }

    #[must_use]
    pub const fn with_offset(mut self, start_month_offset: u32) -> Self {
        self.start_month_offset = start_month_offset;
        self
    }

    #[must_use]
    pub const fn with_cascade(mut self, cascade_extra: bool) -> Self {
        self.cascade_extra = cascade_extra;
        self
    }

    #[must_use]
    pub const fn with_minimum_payment(mut self, config: MinimumPaymentConfig) -> Self {
        self.minimum_payment = config;
        self
    }

    #[must_use]
    pub const fn with_unset_priority(mut self, unset_priority: UnsetPriority) -> Self {
        self.unset_priority = unset_priority;
        self
    }

    #[must_use]
    pub const fn with_max_months(mut self, max_months: u32) -> Self {
        self.max_months = max_months;
        self
    }
}

/// Per-run working copy of a debt.
#[derive(Debug)]
struct Account<'a> {
    debt: &'a Debt,
    balance: f64,
    minimum: f64,
}

impl Account<'_> {
    fn is_active(&self) -> bool {
        self.balance >= BALANCE_TOLERANCE
    }

    fn monthly_interest(&self) -> f64 {
        round_cents(self.balance * (self.debt.interest_rate / 100.0) / 12.0)
    }
}

impl PayoffCandidate for Account<'_> {
    fn balance(&self) -> f64 {
        self.balance
    }

    fn interest_rate(&self) -> f64 {
        self.debt.interest_rate
    }

    fn priority(&self) -> Option<i32> {
        self.debt.custom_priority_order
    }
}

/// Amounts worked out for one account in the current month.
#[derive(Debug, Clone, Copy, Default)]
struct MonthlyAllocation {
    interest: f64,
    need: f64,
    payment: f64,
}

/// Generates a payoff schedule starting today with default options.
///
/// # Errors
/// See [`simulate`].
pub fn generate_schedule(
    debts: &[Debt],
    extra_payment: f64,
    strategy: Strategy,
    start_month_offset: u32,
) -> Result<ScheduleResult> {
    let options = SimulationOptions::default().with_offset(start_month_offset);
    simulate(debts, extra_payment, strategy, &options)
}

/// Simulates paying off `debts` with `extra_payment` on top of the minimums
/// each month, ranked by `strategy`.
///
/// Debts that are already at zero take no part. An empty (or fully paid)
/// set of debts yields an empty schedule ending on the start date.
///
/// # Errors
/// * `Error::InvalidInput` - negative or non-finite extra payment, an invalid
///   debt, duplicate debt ids, or bad options
/// * `Error::NonAmortizing` - payments never clear the debts, either because a
///   month makes no progress at all or because `max_months` is reached
#[instrument(skip(debts, options), fields(debt_count = debts.len()))]
pub fn simulate(
    debts: &[Debt],
    extra_payment: f64,
    strategy: Strategy,
    options: &SimulationOptions,
) -> Result<ScheduleResult> {
    validate_inputs(debts, extra_payment, options)?;
    let extra_payment = round_cents(extra_payment);

    let mut accounts: Vec<Account<'_>> = debts
        .iter()
        .filter(|debt| !debt.is_paid_off())
        .map(|debt| Account {
            debt,
            balance: round_cents(debt.balance),
            minimum: effective_minimum(debt, &options.minimum_payment),
        })
        .collect();

    if accounts.is_empty() {
        debug!("No outstanding debts, returning empty schedule");
        return Ok(ScheduleResult::empty(
            strategy,
            extra_payment,
            options.start_date,
        ));
    }

    let progress_basis: f64 = debts.iter().map(Debt::progress_basis).sum();
    let mut freed_minimums = 0.0;
    let mut total_interest = 0.0;
    let mut schedule = Vec::new();
    let mut month: u32 = 0;

    while accounts.iter().any(Account::is_active) {
        if month >= options.max_months {
            warn!(
                max_months = options.max_months,
                "Iteration cap reached before all debts were paid off"
            );
            return Err(non_amortizing(&accounts, month));
        }
        month += 1;

        let order: Vec<usize> = strategy
            .rank(&accounts, options.unset_priority)
            .into_iter()
            .filter(|&index| accounts[index].is_active())
            .collect();
        let top = order.first().copied();

        let mut allocations = vec![MonthlyAllocation::default(); accounts.len()];
        let mut pool = round_cents(extra_payment + freed_minimums);

        for &index in &order {
            let account = &accounts[index];
            let interest = account.monthly_interest();
            let need = round_cents(account.balance + interest);
            let payment = account.minimum.min(need);
            if options.cascade_extra {
                pool = round_cents(pool + account.minimum - payment);
            }
            allocations[index] = MonthlyAllocation {
                interest,
                need,
                payment,
            };
        }

        let recipients: &[usize] = if options.cascade_extra {
            &order
        } else {
            top.as_slice()
        };
        let mut target = None;
        for &index in recipients {
            if pool < BALANCE_TOLERANCE {
                break;
            }
            let allocation = &mut allocations[index];
            let extra = pool.min(round_cents(allocation.need - allocation.payment));
            if extra >= BALANCE_TOLERANCE && target.is_none() {
                target = Some(index);
            }
            allocation.payment = round_cents(allocation.payment + extra);
            pool = round_cents(pool - extra);
        }
        // With nothing to spread, the top-ranked debt stays the designated target.
        let target = target.or(top);

        let mut payments = Vec::with_capacity(accounts.len());
        let mut total_paid = 0.0;
        let mut principal_paid = 0.0;
        for (index, account) in accounts.iter_mut().enumerate() {
            if !account.is_active() {
                payments.push(settled_line(account.debt));
                continue;
            }

            let allocation = allocations[index];
            let interest_part = allocation.payment.min(allocation.interest);
            let principal = round_cents(allocation.payment - interest_part);
            let mut remaining = round_cents(account.balance - principal);
            if remaining.abs() < BALANCE_TOLERANCE {
                remaining = 0.0;
                freed_minimums = round_cents(freed_minimums + account.minimum);
                debug!(debt = %account.debt.name, month, "Debt paid off");
            }
            account.balance = remaining;

            total_interest += interest_part;
            total_paid += allocation.payment;
            principal_paid += principal;
            payments.push(DebtPaymentLine {
                debt_id: account.debt.id,
                name: account.debt.name.clone(),
                amount: allocation.payment,
                interest: interest_part,
                principal,
                remaining,
                is_priority: target == Some(index),
                due_day: account.debt.due_day,
            });
        }

        let outstanding: f64 = accounts.iter().map(|a| a.balance).sum();
        trace!(month, total_paid, outstanding, "Simulated month");

        // Balances unchanged means every later month would be identical.
        if principal_paid < BALANCE_TOLERANCE {
            warn!(month, "Payments do not cover interest, schedule cannot finish");
            return Err(non_amortizing(&accounts, month));
        }

        schedule.push(MonthRecord {
            month: options.start_month_offset + month,
            date: add_months(options.start_date, month)?,
            payments,
            total_paid: round_cents(total_paid),
            progress: progress_percent(progress_basis, outstanding),
        });
    }

    let total_interest = round_cents(total_interest);
    debug!(months = month, total_interest, %strategy, "Schedule complete");

    Ok(ScheduleResult {
        months: month,
        total_interest,
        payoff_date: add_months(options.start_date, month)?,
        schedule,
        strategy,
        extra_payment,
    })
}

fn validate_inputs(debts: &[Debt], extra_payment: f64, options: &SimulationOptions) -> Result<()> {
    if !extra_payment.is_finite() || extra_payment < 0.0 {
        return Err(Error::invalid(format!(
            "extra payment {extra_payment} must be a non-negative amount"
        )));
    }
    if options.max_months == 0 {
        return Err(Error::invalid("max months must be at least 1"));
    }
    if options.start_month_offset.checked_add(options.max_months).is_none() {
        return Err(Error::invalid(format!(
            "start month offset {} plus max months {} overflows the month counter",
            options.start_month_offset, options.max_months
        )));
    }
    add_months(options.start_date, options.max_months)?;
    options.minimum_payment.validate()?;

    let mut seen = HashSet::with_capacity(debts.len());
    for debt in debts {
        debt.validate()?;
        if !seen.insert(debt.id) {
            return Err(Error::invalid(format!("duplicate debt id {}", debt.id)));
        }
    }
    Ok(())
}

fn settled_line(debt: &Debt) -> DebtPaymentLine {
    DebtPaymentLine {
        debt_id: debt.id,
        name: debt.name.clone(),
        amount: 0.0,
        interest: 0.0,
        principal: 0.0,
        remaining: 0.0,
        is_priority: false,
        due_day: debt.due_day,
    }
}

fn non_amortizing(accounts: &[Account<'_>], months: u32) -> Error {
    Error::NonAmortizing {
        months,
        debts: accounts
            .iter()
            .filter(|account| account.is_active())
            .map(|account| account.debt.name.clone())
            .collect(),
    }
}

fn progress_percent(basis: f64, outstanding: f64) -> f64 {
    if basis <= 0.0 {
        return 100.0;
    }
    round_cents(((basis - outstanding) / basis * 100.0).clamp(0.0, 100.0))
}

fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| Error::invalid(format!("date {date} plus {months} months is out of range")))
}
