//! Export envelope handed to renderers: the profile the plan was written
//! for, plus every day with its extracted totals and, on request, a clearly
//! separate estimate.

use serde::Serialize;

use crate::estimate::{estimate_macros, EstimatedMacros};
use crate::model::{DayPlan, Document, Profile};
use crate::parser::days::Strategy;

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    pub days: Vec<DayReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayReport {
    #[serde(flatten)]
    pub day: DayPlan,
    /// Only present when the day carries no extracted totals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_macros: Option<EstimatedMacros>,
}

impl PlanReport {
    pub fn build(profile: Option<Profile>, document: Document, with_estimates: bool) -> Self {
        let days = document
            .days
            .into_iter()
            .map(|day| {
                let estimated_macros = (with_estimates && day.macros.is_none())
                    .then(|| estimate_macros(&day.meals));
                DayReport {
                    day,
                    estimated_macros,
                }
            })
            .collect();

        PlanReport {
            profile,
            strategy: document.strategy,
            days,
        }
    }
}
