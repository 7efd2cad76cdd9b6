//! Recovers structured diet plans (days, meals, items, totals, tips) from
//! free-form Portuguese text.

pub mod error;
pub mod estimate;
pub mod input;
pub mod model;
pub mod parser;
pub mod report;
pub mod settings;

pub use error::{Error, Result};
pub use estimate::{estimate_macros, EstimatedMacros};
pub use model::{DayPlan, Document, MacroSummary, Meal, MealKind, Profile};
pub use parser::days::Strategy;
pub use parser::{parse, parse_with, ParseOptions};
pub use report::PlanReport;
pub use settings::Settings;
