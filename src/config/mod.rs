/// Environment variable overrides applied on top of the plan file
pub mod env;

/// Plan file (debts, plan settings, minimum-payment policy) loading from TOML
pub mod plan;

pub use env::{apply_env_overrides, read_env};
pub use plan::{PlanFile, PlanSettings, default_plan_path, load_plan, parse_plan};
