use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::{has_text, lines_with_offsets, strip_bullet};

const LABEL: &str = r"dicas?|observa[çc](?:[ãa]o|[õo]es)";

// The caption must open or close the line; "arroz (dica: sem sal)" is not a label.
static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)^\W*(?:{LABEL})\b|\b(?:{LABEL})\W*$")).unwrap());
static INLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)^\W*(?:{LABEL})\b[^:\n]*:(.*)$")).unwrap());

/// A labeled tips section: the label line plus the bullet run after it.
#[derive(Debug, Clone)]
pub struct TipBlock {
    /// Byte range in the day body, from the label line to the last bullet.
    pub range: Range<usize>,
    pub tips: Vec<String>,
}

/// All tips of a day body, in order of appearance. Empty when the body has
/// no tips section.
pub fn extract(body: &str) -> Vec<String> {
    tip_blocks(body).into_iter().flat_map(|b| b.tips).collect()
}

pub fn is_label_line(line: &str) -> bool {
    strip_bullet(line).is_none() && LABEL_RE.is_match(line)
}

/// True when a checkmark label such as `✓ Dica` names a tip rather than a meal.
pub fn is_caption(label: &str) -> bool {
    LABEL_RE.is_match(label.trim())
}

pub fn tip_blocks(body: &str) -> Vec<TipBlock> {
    let lines = lines_with_offsets(body);
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let (start, line) = lines[i];
        if !is_label_line(line) {
            i += 1;
            continue;
        }

        let mut tips = Vec::new();
        if let Some(t) = inline_tip(line) {
            tips.push(t);
        }

        let mut end = start + line.len();
        let mut started = false;
        let mut j = i + 1;
        while j < lines.len() {
            let (offset, l) = lines[j];
            if l.trim().is_empty() {
                // blank lines are tolerated only between the label and the first bullet
                if started {
                    break;
                }
                j += 1;
                continue;
            }
            let Some(text) = strip_bullet(l) else {
                break;
            };
            started = true;
            let text = text.trim_matches(|c: char| c == '*' || c == '_').trim();
            if has_text(text) {
                tips.push(text.to_string());
            }
            end = offset + l.len();
            j += 1;
        }

        blocks.push(TipBlock {
            range: start..end,
            tips,
        });
        i = j;
    }

    blocks
}

/// `Dica: beba água` carries its tip on the label line itself.
fn inline_tip(line: &str) -> Option<String> {
    let caps = INLINE_RE.captures(line)?;
    let rest = caps[1]
        .trim()
        .trim_matches(|c: char| c == '*' || c == '_')
        .trim();
    if !has_text(rest) {
        None
    } else {
        Some(rest.to_string())
    }
}
