use serde::Serialize;

use crate::model::Meal;

const KCAL_PER_ITEM: u32 = 250;
const PROTEIN_G_PER_ITEM: u32 = 20;
const CARBS_G_PER_ITEM: u32 = 30;
const FAT_G_PER_ITEM: u32 = 8;

/// Rough totals guessed from item counts. Kept apart from
/// [`MacroSummary`](crate::model::MacroSummary) so a guess is never mistaken
/// for figures read from the plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EstimatedMacros {
    pub calories: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

pub fn estimate_macros(meals: &[Meal]) -> EstimatedMacros {
    let items = meals
        .iter()
        .map(|m| m.items.len())
        .fold(0u32, |acc, n| acc.saturating_add(u32::try_from(n).unwrap_or(u32::MAX)));

    EstimatedMacros {
        calories: items.saturating_mul(KCAL_PER_ITEM),
        protein_g: items.saturating_mul(PROTEIN_G_PER_ITEM),
        carbs_g: items.saturating_mul(CARBS_G_PER_ITEM),
        fat_g: items.saturating_mul(FAT_G_PER_ITEM),
    }
}
