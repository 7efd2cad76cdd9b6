use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

/// Display names indexed by `day number mod 7`.
const WEEKDAYS: [&str; 7] = [
    "Domingo", "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado",
];

// Optional indentation, markdown heading run and a few decoration glyphs
// ("**", "📅", "-") ahead of the marker.
const LINE_PREFIX: &str = r"^[ \t]*(?:#{1,6}[ \t]*)?(?:[^\w\s]{1,4}[ \t]*)?";
const MARKER_SUFFIX: &str = r"[ \t]*(?:\*\*|__)?[ \t]*[:.\-–—]?[ \t]*(?:\*\*|__)?";
const WEEKDAY_NAMES: &str = r"segunda|ter[çc]a|quarta|quinta|sexta|s[áa]bado|domingo";

static DAY_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?mi){LINE_PREFIX}dia[ \t]*(\d+)\b{MARKER_SUFFIX}")).unwrap()
});
static WEEKDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?mi){LINE_PREFIX}({WEEKDAY_NAMES})(?:[ \t]*-?[ \t]*feira)?\b{MARKER_SUFFIX}"
    ))
    .unwrap()
});
static LOOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:dia[ \t]*(\d+)|({WEEKDAY_NAMES})(?:[ \t]*-?[ \t]*feira)?)\b[ \t]*(?:\*\*|__)?[ \t]*:?"
    ))
    .unwrap()
});

/// Boundary-detection tiers, in ladder order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Line-anchored "Dia N" markers.
    DayNumber,
    /// Line-anchored weekday names, with or without "-feira".
    Weekday,
    /// Any day or weekday token, anywhere in a line.
    Heading,
}

/// One day's slice of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    /// 1-based position among all boundary matches of the tier, counting
    /// the ones whose span was later dropped.
    pub ordinal: usize,
    pub label: String,
    pub body: &'a str,
}

impl Strategy {
    pub const LADDER: [Strategy; 3] = [Strategy::DayNumber, Strategy::Weekday, Strategy::Heading];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::DayNumber => "day_number",
            Strategy::Weekday => "weekday",
            Strategy::Heading => "heading",
        }
    }

    /// Split `text` at every boundary this tier recognizes. Text before the
    /// first boundary is discarded, as are spans with a blank body.
    pub fn segment(self, text: &str) -> Vec<Span<'_>> {
        match self {
            Strategy::DayNumber => split_at(&DAY_NUMBER_RE, text, |caps| number_label(&caps[1])),
            Strategy::Weekday => split_at(&WEEKDAY_RE, text, |caps| weekday_label(&caps[1])),
            Strategy::Heading => split_at(&LOOSE_RE, text, |caps| match caps.get(1) {
                Some(n) => format!("Dia {}", n.as_str()),
                None => caps.get(2).map_or_else(String::new, |w| weekday_label(w.as_str())),
            }),
        }
    }
}

/// True when `line` would open a day under the day-number or weekday tier.
pub fn is_boundary_line(line: &str) -> bool {
    DAY_NUMBER_RE.is_match(line) || WEEKDAY_RE.is_match(line)
}

fn split_at<'a, F>(re: &Regex, text: &'a str, label: F) -> Vec<Span<'a>>
where
    F: Fn(&Captures) -> String,
{
    let marks: Vec<(usize, usize, String)> = re
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((whole.start(), whole.end(), label(&caps)))
        })
        .collect();

    let mut spans = Vec::with_capacity(marks.len());
    for (i, (_, end, label)) in marks.iter().enumerate() {
        let stop = marks.get(i + 1).map_or(text.len(), |next| next.0);
        let body = &text[*end..stop];
        if body.trim().is_empty() {
            continue;
        }
        spans.push(Span {
            ordinal: i + 1,
            label: label.clone(),
            body,
        });
    }
    spans
}

fn number_label(digits: &str) -> String {
    match digits.parse::<u64>() {
        Ok(n) => WEEKDAYS[(n % 7) as usize].to_string(),
        Err(_) => format!("Dia {}", digits),
    }
}

fn weekday_label(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let name = match lower.as_str() {
        "segunda" => "Segunda",
        "terça" | "terca" => "Terça",
        "quarta" => "Quarta",
        "quinta" => "Quinta",
        "sexta" => "Sexta",
        "sábado" | "sabado" => "Sábado",
        "domingo" => "Domingo",
        _ => return raw.to_string(),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(strategy: Strategy, text: &str) -> Vec<String> {
        strategy.segment(text).into_iter().map(|s| s.label).collect()
    }

    #[test]
    fn day_number_markers() {
        let text = "Intro\n## Dia 1:\nA\n**Dia 2**\nB\n### DIA 8 - foco em proteína\nC\n📅 Dia 7\nD";
        let spans = Strategy::DayNumber.segment(text);
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].body.trim(), "A");
        assert_eq!(spans[2].body.trim(), "foco em proteína\nC");
        assert_eq!(
            labels(Strategy::DayNumber, text),
            vec!["Segunda", "Terça", "Segunda", "Domingo"]
        );
    }

    #[test]
    fn day_number_needs_line_start() {
        assert!(Strategy::DayNumber.segment("No Dia 1 comer bem\nok").is_empty());
        assert!(Strategy::DayNumber.segment("Diariamente\n1 fruta").is_empty());
    }

    #[test]
    fn huge_day_number_keeps_digits() {
        let text = "Dia 99999999999999999999999\n✓Almoço: arroz";
        assert_eq!(
            labels(Strategy::DayNumber, text),
            vec!["Dia 99999999999999999999999"]
        );
    }

    #[test]
    fn blank_bodies_are_dropped() {
        let text = "## Dia 1\n\n## Dia 2\nconteúdo";
        let spans = Strategy::DayNumber.segment(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].label, "Terça");
        assert_eq!(spans[0].ordinal, 2);
    }

    #[test]
    fn weekday_markers() {
        let text = "**Segunda-feira:**\nA\n## TERCA FEIRA\nB\nSábado\nC\nDomingos livres\nD";
        assert_eq!(
            labels(Strategy::Weekday, text),
            vec!["Segunda", "Terça", "Sábado"]
        );
    }

    #[test]
    fn loose_tokens_anywhere() {
        let text = "Plano: Dia 1 café e pão. Na quinta-feira: peixe assado";
        let spans = Strategy::Heading.segment(text);
        assert_eq!(
            spans.iter().map(|s| s.label.as_str()).collect::<Vec<_>>(),
            vec!["Dia 1", "Quinta"]
        );
        assert_eq!(spans[1].body.trim(), "peixe assado");
    }

    #[test]
    fn boundary_lines() {
        assert!(is_boundary_line("Sábado:"));
        assert!(is_boundary_line("## Dia 12"));
        assert!(!is_boundary_line("arroz, feijão"));
    }
}
