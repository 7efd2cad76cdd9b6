use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::model::MacroSummary;

// Either "<caption> ... N" or "N <unit>", whichever appears first.
static CALORIES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\bcalorias?\b|\bkcal\b|\bvalor\s+cal[óo]rico\b)[^\d\n]{0,24}?(\d{1,3}(?:\.\d{3})+|\d+)|(\d{1,3}(?:\.\d{3})+|\d+)[ \t]*(?:kcal|calorias?)\b",
    )
    .unwrap()
});
static PROTEIN_RE: LazyLock<Regex> = LazyLock::new(|| grams_pattern(r"prote[íi]nas?"));
static CARBS_RE: LazyLock<Regex> = LazyLock::new(|| grams_pattern(r"carboidratos?|carbs?"));
static FAT_RE: LazyLock<Regex> =
    LazyLock::new(|| grams_pattern(r"gorduras?|lip[íi]dios?|lip[íi]deos?"));

fn grams_pattern(caption: &str) -> Regex {
    // number and caption share a line
    let unit = r"[ \t]*g(?:ramas?)?\b";
    Regex::new(&format!(
        r"(?i)\b(?:{caption})\b[^\d\n]{{0,24}}?(\d+)(?:[.,]\d+)?{unit}|(\d+)(?:[.,]\d+)?{unit}[ \t]+(?:de[ \t]+)?(?:{caption})\b"
    ))
    .unwrap()
}

/// Pull day totals out of a day body. Calories gate the result: without a
/// calorie figure nothing is returned, whatever else was found.
pub fn extract(body: &str) -> Option<MacroSummary> {
    let calories = first_number(&CALORIES_RE, body)?;
    Some(MacroSummary {
        calories,
        protein_g: first_number(&PROTEIN_RE, body).unwrap_or(0),
        carbs_g: first_number(&CARBS_RE, body).unwrap_or(0),
        fat_g: first_number(&FAT_RE, body).unwrap_or(0),
    })
}

fn first_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text).and_then(|caps| parse_capture(&caps))
}

fn parse_capture(caps: &Captures) -> Option<u32> {
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
    raw.replace('.', "").parse().ok()
}
