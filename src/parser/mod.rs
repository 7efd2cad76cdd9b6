pub mod days;
pub mod macros;
pub mod meals;
pub mod tips;

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::model::{DayPlan, Document};
use days::{Span, Strategy};

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(?:[-•–]|\*(?:[ \t]|$)|[✓✔☑✅])[ \t]*").unwrap());

/// Knobs of the fallback ladder.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Loose-heading spans with a shorter trimmed body are treated as noise.
    pub min_span_chars: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { min_span_chars: 12 }
    }
}

/// Recover a structured plan from free text. Never fails: unparseable input
/// yields an empty document.
pub fn parse(text: &str) -> Document {
    parse_with(text, &ParseOptions::default())
}

/// Fallback ladder: day numbers → weekday names → loose headings. The first
/// tier producing at least one day with meals wins; tiers are never merged.
pub fn parse_with(text: &str, options: &ParseOptions) -> Document {
    let text = normalize(text);

    for strategy in Strategy::LADDER {
        let spans = strategy.segment(&text);
        let days = assemble(strategy, &spans, options);
        if days.is_empty() {
            debug!(?strategy, spans = spans.len(), "no usable day, falling through");
            continue;
        }
        debug!(?strategy, spans = spans.len(), days = days.len(), "strategy succeeded");
        return Document {
            days,
            strategy: Some(strategy),
        };
    }

    debug!(chars = text.len(), "no strategy recovered a day");
    Document::default()
}

/// Spans without meals are extraction misses and are left out; the days
/// that remain keep their match position as `index`.
fn assemble(strategy: Strategy, spans: &[Span<'_>], options: &ParseOptions) -> Vec<DayPlan> {
    spans
        .iter()
        .filter(|span| {
            strategy != Strategy::Heading
                || span.body.trim().chars().count() >= options.min_span_chars
        })
        .filter_map(|span| {
            let meals = meals::extract(span.body);
            if meals.is_empty() {
                trace!(label = %span.label, "span without meals dropped");
                return None;
            }
            Some((span, meals))
        })
        .map(|(span, meals)| DayPlan {
            index: span.ordinal,
            label: span.label.clone(),
            meals,
            macros: macros::extract(span.body),
            tips: tips::extract(span.body),
        })
        .collect()
}

fn normalize(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Text after a list glyph (`-`, `*`, `•`, checkmarks), or `None` when the
/// line is not a list item.
pub(crate) fn strip_bullet(line: &str) -> Option<&str> {
    BULLET_RE.find(line).map(|m| line[m.end()..].trim())
}

/// True when `s` holds at least one letter or digit.
pub(crate) fn has_text(s: &str) -> bool {
    s.chars().any(char::is_alphanumeric)
}

/// Lines of `text` (without the newline) paired with their byte offset.
pub(crate) fn lines_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut offset = 0;
    text.split('\n')
        .map(|line| {
            let start = offset;
            offset += line.len() + 1;
            (start, line)
        })
        .collect()
}

// ── Tests ──
