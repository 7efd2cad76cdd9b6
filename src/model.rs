use serde::{Deserialize, Serialize};

use crate::parser::days::Strategy;

/// Structured diet plan recovered from free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub days: Vec<DayPlan>,
    /// Ladder tier that produced `days`; `None` when nothing was recovered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn meal_count(&self) -> usize {
        self.days.iter().map(|d| d.meals.len()).sum()
    }

    pub fn tip_count(&self) -> usize {
        self.days.iter().map(|d| d.tips.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPlan {
    /// 1-based position of the day marker among the winning tier's matches.
    pub index: usize,
    pub label: String,
    pub meals: Vec<Meal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macros: Option<MacroSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meal {
    /// Free-text time of day as written ("7h", "12:30", "8h30").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub name: String,
    pub kind: MealKind,
    /// Never empty.
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealKind {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
    Supper,
    PreWorkout,
    PostWorkout,
    Other,
}

/// Per-day totals as written in the text. Only built when a calorie figure
/// was found; the gram fields default to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSummary {
    pub calories: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

/// User profile collected upstream. Carried through to exports for display,
/// never inspected by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub height_cm: u32,
    pub weight_kg: f64,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    #[serde(alias = "masculino")]
    Male,
    #[serde(alias = "feminino")]
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[serde(alias = "sedentario")]
    Sedentary,
    #[serde(alias = "2x semana")]
    TwiceWeekly,
    #[serde(alias = "3x semana")]
    ThriceWeekly,
    #[serde(alias = "intenso")]
    Intense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[serde(alias = "perder_peso")]
    LoseWeight,
    #[serde(alias = "hipertrofia")]
    Hypertrophy,
    #[serde(alias = "manter_peso")]
    MaintainWeight,
}
