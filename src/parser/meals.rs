use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

use super::{days, has_text, strip_bullet, tips};
use crate::model::{Meal, MealKind};

/// Meal vocabulary. Within a kind, longer spellings come first so that
/// alternation picks the longest name at a given position. Generic names
/// come last and only mark a meal; they never decide its kind.
const VOCABULARY: &[(MealKind, &str)] = &[
    (MealKind::MorningSnack, r"lanche\s+da\s+manh[ãa]|lanche\s+matinal|cola[çc][ãa]o"),
    (MealKind::AfternoonSnack, r"lanche\s+da\s+tarde|lanche\s+vespertino|caf[ée]\s+da\s+tarde"),
    (MealKind::Supper, r"lanche\s+da\s+noite|lanche\s+noturno|ceia"),
    (MealKind::Breakfast, r"caf[ée]\s+da\s+manh[ãa]|desjejum"),
    (MealKind::Lunch, r"almo[çc]o"),
    (MealKind::Dinner, r"jantar|janta"),
    (MealKind::PreWorkout, r"pr[ée][\s-]?treino"),
    (MealKind::PostWorkout, r"p[óo]s[\s-]?treino"),
    (MealKind::Other, r"lanche|refei[çc][ãa]o"),
];

const TIME: &str = r"\d{1,2}(?:h\d{0,2}|:\d{2})";
// Qualifier after a meal name: parentheticals (which may hold "12:30") or
// anything short of a colon or emphasis.
const TAIL: &str = r"(?:\([^)\n]*\)|[^:\n(*_])*?";

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let names = VOCABULARY
        .iter()
        .map(|(_, p)| *p)
        .collect::<Vec<_>>()
        .join("|");
    let lead = format!(r"(?:{TIME}[ \t]*[-–—|]?[ \t]*)?");
    Regex::new(&format!(
        concat!(
            // ✓ Label:
            r"(?mi)[✓✔☑✅][ \t]*(?P<check>(?:{time}|\([^)\n]*\)|[^:\n(✓✔☑✅])+?)[ \t]*:",
            // Almoço (12h): / **Almoço:** / - Jantar:
            r"|^[ \t]*(?:\d{{1,2}}[.)][ \t]+)?(?:#{{1,6}}[ \t]*)?(?:[-*•][ \t]+)?(?:\*\*|__)?[ \t]*",
            r"(?P<named>{lead}(?:{names})\b{tail})[ \t]*(?:\*\*|__)?[ \t]*:(?:[ \t]*(?:\*\*|__))?",
            // ### Almoço / **Jantar (20h)**
            r"|^[ \t]*(?:#{{1,6}}[ \t]*(?:\*\*|__)?|(?:[-*•][ \t]+)?(?:\*\*|__))[ \t]*",
            r"(?P<heading>{lead}(?:{names})\b{tail})[ \t]*(?:\*\*|__)?[ \t]*:?[ \t]*$",
        ),
        time = TIME,
        lead = lead,
        names = names,
        tail = TAIL,
    ))
    .unwrap()
});

static KIND_RES: LazyLock<Vec<(MealKind, Regex)>> = LazyLock::new(|| {
    VOCABULARY
        .iter()
        .filter(|(kind, _)| *kind != MealKind::Other)
        .map(|(kind, p)| (*kind, Regex::new(&format!(r"(?i)\b(?:{p})\b")).unwrap()))
        .collect()
});

static CAPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\W*(?:total|calorias?|kcal|valor\s+cal[óo]rico|prote[íi]nas?|carboidratos?|carbs?|gorduras?|lip[íi]dios?|macros?|macronutrientes|resumo)\b",
    )
    .unwrap()
});
static TOTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\W*total\b[^:\n]*:").unwrap());
static PAREN_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\(\s*(?:[àa]s\s+)?({TIME})\s*\)")).unwrap()
});
static LEAD_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)^\W*?({TIME})\b")).unwrap());
static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());

/// A recognized meal cue in a day body.
#[derive(Debug)]
struct Marker<'a> {
    start: usize,
    end: usize,
    label: &'a str,
    /// Captions ("✓ Calorias:") bound the previous meal but are not meals.
    caption: bool,
}

impl<'a> Marker<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        let whole = caps.get(0)?;
        let (label, caption) = match caps.name("check") {
            Some(m) => (m.as_str(), is_caption(m.as_str())),
            None => (caps.name("named").or_else(|| caps.name("heading"))?.as_str(), false),
        };
        Some(Marker {
            start: whole.start(),
            end: whole.end(),
            label,
            caption,
        })
    }
}

/// Meals of one day body, in order. Matching is a single leftmost-first,
/// non-overlapping pass; markers inside a tips block are ignored and meals
/// whose content yields no item are dropped.
pub fn extract(body: &str) -> Vec<Meal> {
    let blocked: Vec<Range<usize>> = tips::tip_blocks(body)
        .into_iter()
        .map(|b| b.range)
        .collect();

    let markers: Vec<Marker> = MARKER_RE
        .captures_iter(body)
        .filter_map(|caps| Marker::from_captures(&caps))
        .filter(|m| !blocked.iter().any(|r| r.contains(&m.start)))
        .collect();

    let mut meals = Vec::new();
    for (i, marker) in markers.iter().enumerate() {
        if marker.caption {
            continue;
        }
        let stop = markers.get(i + 1).map_or(body.len(), |next| next.start);
        let items = split_items(&body[marker.end..stop]);
        if items.is_empty() {
            trace!(label = marker.label, "meal without items dropped");
            continue;
        }
        meals.push(build_meal(marker.label, items));
    }
    meals
}

fn build_meal(label: &str, items: Vec<String>) -> Meal {
    let time = PAREN_TIME_RE
        .captures(label)
        .or_else(|| LEAD_TIME_RE.captures(label))
        .map(|c| c[1].to_string());
    let name = clean_name(label);
    let kind = classify(&name);
    let name = if name.is_empty() {
        "Refeição".to_string()
    } else {
        name
    };
    Meal {
        time,
        name,
        kind,
        items,
    }
}

fn clean_name(label: &str) -> String {
    let without_parens = PAREN_RE.replace_all(label, " ");
    let without_time = LEAD_TIME_RE.replace(&without_parens, "");
    let plain: String = without_time
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '#'))
        .collect();
    plain
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| matches!(c, '-' | '–' | '—' | ':' | '|' | '.') || c.is_whitespace())
        .to_string()
}

/// Vocabulary kind of the earliest meal name found in `name`.
pub fn classify(name: &str) -> MealKind {
    KIND_RES
        .iter()
        .filter_map(|(kind, re)| re.find(name).map(|m| (m.start(), *kind)))
        .min_by_key(|(start, _)| *start)
        .map_or(MealKind::Other, |(_, kind)| kind)
}

fn is_caption(label: &str) -> bool {
    CAPTION_RE.is_match(label) || tips::is_caption(label)
}

/// Content lines that belong to a meal: the remainder of the marker line and
/// the lines after it, up to a section break.
struct Content<'a> {
    head: &'a str,
    lines: Vec<&'a str>,
}

impl<'a> Content<'a> {
    fn bound(raw: &'a str) -> Self {
        let (head, rest) = raw.split_once('\n').unwrap_or((raw, ""));
        let all: Vec<&str> = rest.split('\n').collect();
        let mut lines: Vec<&str> = Vec::new();
        let mut started = has_text(head);
        let mut in_list = false;

        let mut i = 0;
        while i < all.len() {
            let line = all[i];
            if line.trim().is_empty() {
                if !started {
                    i += 1;
                    continue;
                }
                // a blank run ends the meal unless its bullet list resumes right after
                if !in_list {
                    break;
                }
                match (i + 1..all.len()).find(|&j| !all[j].trim().is_empty()) {
                    Some(j) if strip_bullet(all[j]).is_some() && !is_section_break(all[j]) => {
                        i = j;
                        continue;
                    }
                    _ => break,
                }
            }
            if is_section_break(line) {
                break;
            }
            in_list |= strip_bullet(line).is_some();
            lines.push(line);
            started = true;
            i += 1;
        }

        Content { head, lines }
    }
}

fn is_section_break(line: &str) -> bool {
    let trimmed = line.trim_start();
    // list items only close a meal when they are checkmark captions
    if let Some(rest) = strip_bullet(line) {
        return trimmed.starts_with(&['✓', '✔', '☑', '✅'][..]) && CAPTION_RE.is_match(rest);
    }
    trimmed.starts_with('#')
        || tips::is_label_line(line)
        || days::is_boundary_line(line)
        || CAPTION_RE.is_match(trimmed)
}

/// Bulleted content gives one item per bullet line; anything else is prose
/// split on `,` `;` and a standalone "e".
fn split_items(raw: &str) -> Vec<String> {
    let content = Content::bound(raw);
    let mut items = Vec::new();

    if content.lines.iter().any(|l| strip_bullet(l).is_some()) {
        for text in content.lines.iter().filter_map(|l| strip_bullet(l)) {
            push_item(&mut items, text);
        }
        return items;
    }

    for line in std::iter::once(content.head).chain(content.lines.iter().copied()) {
        for fragment in split_inline(line) {
            push_item(&mut items, fragment);
        }
    }
    items
}

fn push_item(items: &mut Vec<String>, raw: &str) {
    let text = raw
        .trim()
        .trim_matches(|c: char| c == '*' || c == '_')
        .trim();
    if !has_text(text) || TOTAL_RE.is_match(text) {
        return;
    }
    items.push(text.to_string());
}

/// Split prose on list separators. Commas between digits ("1,5") and
/// separators inside parentheses do not split.
fn split_inline(line: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;

    for (i, &(pos, c)) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|j| chars[j].1);
        let next = chars.get(i + 1).map(|&(_, n)| n);
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth > 0 {
            continue;
        }
        let separator = match c {
            ';' => true,
            ',' => !(prev.is_some_and(|p| p.is_ascii_digit()) && next.is_some_and(|n| n.is_ascii_digit())),
            'e' | 'E' => prev.map_or(true, char::is_whitespace) && next.map_or(true, char::is_whitespace),
            _ => false,
        };
        if separator {
            parts.push(&line[start..pos]);
            start = pos + c.len_utf8();
        }
    }
    parts.push(&line[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(meals: &[Meal]) -> Vec<&str> {
        meals.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn checkmark_meals_inline() {
        let meals = extract("✓Café da manhã: pão, queijo ✓Almoço: arroz; feijão e bife");
        assert_eq!(names(&meals), vec!["Café da manhã", "Almoço"]);
        assert_eq!(meals[0].items, vec!["pão", "queijo"]);
        assert_eq!(meals[1].items, vec!["arroz", "feijão", "bife"]);
    }

    #[test]
    fn time_forms() {
        let meals = extract(
            "✓Almoço (12:30): arroz\n✓Jantar (às 19h): sopa\n✓ 07:00 - Café da manhã: ovos\n✓Ceia (8h30): chá\n✓Lanche da tarde (opcional): fruta",
        );
        let times: Vec<Option<&str>> = meals.iter().map(|m| m.time.as_deref()).collect();
        assert_eq!(
            times,
            vec![Some("12:30"), Some("19h"), Some("07:00"), Some("8h30"), None]
        );
        assert_eq!(
            names(&meals),
            vec!["Almoço", "Jantar", "Café da manhã", "Ceia", "Lanche da tarde"]
        );
    }

    #[test]
    fn named_markers_without_checkmarks() {
        let body = "Café da manhã: ovos, pão\n**Almoço:** frango, arroz\n- Jantar (20h): peixe\n1. Ceia: chá";
        let meals = extract(body);
        assert_eq!(names(&meals), vec!["Café da manhã", "Almoço", "Jantar", "Ceia"]);
        assert_eq!(meals[1].items, vec!["frango", "arroz"]);
        assert_eq!(meals[2].time.as_deref(), Some("20h"));
    }

    #[test]
    fn heading_markers_with_bullets() {
        let body = "### Almoço (12h)\n- 150g de frango\n* arroz integral\n• salada\n\n### Jantar\n✓ sopa de legumes\n";
        let meals = extract(body);
        assert_eq!(names(&meals), vec!["Almoço", "Jantar"]);
        assert_eq!(meals[0].items, vec!["150g de frango", "arroz integral", "salada"]);
        assert_eq!(meals[1].items, vec!["sopa de legumes"]);
    }

    #[test]
    fn bullet_list_may_resume_after_blank_line() {
        let meals = extract("**Almoço**\n- arroz\n\n- feijão\n\nBom apetite!");
        assert_eq!(meals[0].items, vec!["arroz", "feijão"]);
    }

    #[test]
    fn total_lines_are_dropped() {
        let meals = extract("Almoço:\n- arroz\n- Total: 450 kcal\n- feijão");
        assert_eq!(meals[0].items, vec!["arroz", "feijão"]);
    }

    #[test]
    fn content_stops_at_captions_and_tips() {
        let body = "✓Jantar: peixe, salada\nCalorias: 1800 kcal\n✓Ceia: chá\n✓ Proteínas: 90g\nDicas:\n✓ Beba água: 2L";
        let meals = extract(body);
        assert_eq!(names(&meals), vec!["Jantar", "Ceia"]);
        assert_eq!(meals[0].items, vec!["peixe", "salada"]);
        assert_eq!(meals[1].items, vec!["chá"]);
    }

    #[test]
    fn marker_words_inside_content_do_not_retrigger() {
        let meals = extract("✓Almoço: arroz, sobra do jantar de ontem\n✓Jantar: sopa");
        assert_eq!(names(&meals), vec!["Almoço", "Jantar"]);
        assert_eq!(meals[0].items, vec!["arroz", "sobra do jantar de ontem"]);
    }

    #[test]
    fn empty_content_drops_the_meal() {
        assert!(extract("✓Almoço:\n✓Jantar: .").is_empty());
        assert!(extract("Almoço: ; , e").is_empty());
    }

    #[test]
    fn generic_checkmark_labels() {
        let meals = extract("✓ Refeição livre: pizza, refrigerante zero\n✓ (10h): castanhas");
        assert_eq!(meals[0].kind, MealKind::Other);
        assert_eq!(meals[0].name, "Refeição livre");
        assert_eq!(meals[1].name, "Refeição");
        assert_eq!(meals[1].time.as_deref(), Some("10h"));
    }

    #[test]
    fn decimal_commas_and_parentheses_survive() {
        let meals = extract("✓Almoço: 1,5 concha de feijão, salada (alface, tomate e pepino), arroz");
        assert_eq!(
            meals[0].items,
            vec!["1,5 concha de feijão", "salada (alface, tomate e pepino)", "arroz"]
        );
    }

    #[test]
    fn multiline_prose_content() {
        let meals = extract("Almoço: arroz, feijão,\nbife acebolado e salada\n\nObs geral");
        assert_eq!(meals[0].items, vec!["arroz", "feijão", "bife acebolado", "salada"]);
    }

    #[test]
    fn generic_names_start_their_own_meal() {
        let meals = extract("Almoço:\n- arroz\n- feijão\nLanche (15h):\n- fruta\n- castanhas\nRefeição 5: chá");
        assert_eq!(names(&meals), vec!["Almoço", "Lanche", "Refeição 5"]);
        assert_eq!(meals[0].items, vec!["arroz", "feijão"]);
        assert_eq!(meals[1].items, vec!["fruta", "castanhas"]);
        assert_eq!(meals[1].time.as_deref(), Some("15h"));
        assert_eq!(meals[1].kind, MealKind::Other);
    }

    #[test]
    fn weekday_named_item_stays_in_the_list() {
        let meals = extract("Jantar:\n- arroz\n- Sexta-feira: peixe\n- feijão");
        assert_eq!(meals[0].items, vec!["arroz", "Sexta-feira: peixe", "feijão"]);
    }

    #[test]
    fn long_blank_runs_are_skipped_once() {
        let body = format!("Almoço:\n- arroz\n{}- feijão", "\n".repeat(20_000));
        let meals = extract(&body);
        assert_eq!(meals[0].items, vec!["arroz", "feijão"]);

        let prose = format!("Almoço: arroz{}Jantar: sopa", "\n".repeat(20_000));
        let meals = extract(&prose);
        assert_eq!(names(&meals), vec!["Almoço", "Jantar"]);
        assert_eq!(meals[0].items, vec!["arroz"]);
    }

    #[test]
    fn classify_vocabulary() {
        assert_eq!(classify("Lanche da Manhã"), MealKind::MorningSnack);
        assert_eq!(classify("COLAÇÃO"), MealKind::MorningSnack);
        assert_eq!(classify("Café da tarde"), MealKind::AfternoonSnack);
        assert_eq!(classify("Pré treino"), MealKind::PreWorkout);
        assert_eq!(classify("Pos-treino"), MealKind::PostWorkout);
        assert_eq!(classify("Janta"), MealKind::Dinner);
        assert_eq!(classify("Refeição 3 - Almoço"), MealKind::Lunch);
        assert_eq!(classify("Lanche"), MealKind::Other);
        assert_eq!(classify("Refeição 2"), MealKind::Other);
    }

    #[test]
    fn split_inline_separators() {
        assert_eq!(split_inline("a, b; c e d"), vec!["a", " b", " c ", " d"]);
        assert_eq!(split_inline("ervilha e cenoura"), vec!["ervilha ", " cenoura"]);
        assert_eq!(split_inline("peixe"), vec!["peixe"]);
        assert_eq!(split_inline("Arroz E Feijão"), vec!["Arroz ", " Feijão"]);
    }
}
