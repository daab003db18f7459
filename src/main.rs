use debt_planner::{
    config,
    core::{
        Strategy, compare_strategies, compare_with_minimums_only,
        report::{
            format_currency, format_month, format_payoff_table, format_schedule_summary,
        },
        simulate, summarize_payoffs,
    },
    errors::{Error, Result},
};
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const OUTPUT_FORMAT_VAR: &str = "DEBT_PLAN_OUTPUT";
const PREVIEW_MONTHS: usize = 3;

fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables can also be set externally
    dotenv().ok();

    // 3. Load the plan and apply environment overrides
    let plan_path = config::default_plan_path()?;
    let mut plan = config::load_plan(&plan_path)
        .inspect_err(|e| error!("Failed to load plan from {:?}: {}", plan_path, e))?;
    config::apply_env_overrides(&mut plan)?;
    let options = plan.simulation_options();
    let settings = &plan.plan;

    // 4. Simulate the chosen strategy
    let result = simulate(
        &plan.debts,
        settings.extra_payment,
        settings.strategy,
        &options,
    )
    .inspect_err(|e| error!("Simulation failed: {}", e))?;
    info!(months = result.months, "Schedule generated");

    if config::read_env(OUTPUT_FORMAT_VAR)?.is_some_and(|format| format.eq_ignore_ascii_case("json")) {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    // 5. Human-readable report
    print!("{}", format_schedule_summary(&result));
    if result.is_empty() {
        return Ok(());
    }

    println!("\nPayoff by debt:");
    print!("{}", format_payoff_table(&summarize_payoffs(&plan.debts, &result)));

    println!("\nNext {PREVIEW_MONTHS} months:");
    for record in result.schedule.iter().take(PREVIEW_MONTHS) {
        print!("{}", format_month(record));
    }

    // 6. What-if comparisons
    match compare_with_minimums_only(
        &plan.debts,
        settings.extra_payment,
        settings.strategy,
        &options,
    ) {
        Ok(comparison) if comparison.months_saved > 0 => println!(
            "\nVersus minimum payments only: {} months sooner, {} less interest",
            comparison.months_saved,
            format_currency(comparison.interest_saved)
        ),
        Ok(_) => {}
        Err(Error::NonAmortizing { .. }) => {
            println!("\nMinimum payments alone would never pay these debts off.");
        }
        Err(e) => warn!("Minimum-only comparison failed: {}", e),
    }

    match compare_strategies(&plan.debts, settings.extra_payment, &options) {
        Ok(outcomes) => {
            println!("\nStrategy comparison:");
            for outcome in &outcomes {
                let marker = if outcome.strategy == settings.strategy {
                    "*"
                } else {
                    " "
                };
                println!(
                    "  {marker} {:<14} {:>4} months | interest {}",
                    outcome.strategy.name(),
                    outcome.result.months,
                    format_currency(outcome.result.total_interest)
                );
            }
            if settings.strategy != Strategy::Custom
                && !outcomes.iter().any(|o| o.strategy == Strategy::Custom)
            {
                info!("Custom order skipped: set custom_priority_order on every debt to include it");
            }
        }
        Err(e) => warn!("Strategy comparison failed: {}", e),
    }

    Ok(())
}
