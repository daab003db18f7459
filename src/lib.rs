//! `debt-planner` - Debt payoff planning and schedule simulation
//!
//! This crate projects month-by-month payoff schedules for a set of debts
//! (credit cards, consumer loans) under a snowball, avalanche or custom
//! repayment order, with an optional monthly extra payment on top of the
//! minimums. The simulator is pure and deterministic: the same debts, budget,
//! strategy and options always produce the same schedule.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    // Documentation - missing docs should be added gradually
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_types_passed_by_value,
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Complexity and readability
    clippy::cognitive_complexity,
    clippy::large_enum_variant,
    clippy::match_same_arms,
    clippy::too_many_lines,

    // Style consistency
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
)]

/// Plan file and environment configuration
pub mod config;
/// Core business logic - ordering strategies, minimum payments and the schedule simulator
pub mod core;
/// Unified error types and result handling
pub mod errors;
/// Debt records consumed by the simulator
pub mod models;

pub use crate::core::{
    DebtPaymentLine, MinimumPaymentConfig, MonthRecord, ScheduleResult, SimulationOptions,
    Strategy, UnsetPriority, generate_schedule, minimum_payment, simulate,
};
pub use errors::{Error, Result};
pub use models::{Debt, DebtId, DebtType};

#[cfg(test)]
pub mod test_utils;
