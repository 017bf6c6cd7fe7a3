use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{PostError, Result};

const INDENT: &str = "    ";

/// Admonition type to the emoji that stands in for it once it becomes a quote.
const ADMONITION_EMOJIS: [(&str, &str); 12] = [
    ("note", "📝"),
    ("abstract", "📓"),
    ("info", "ℹ️"),
    ("tip", "🔥"),
    ("success", "✅"),
    ("question", "❓"),
    ("warning", "⚠️"),
    ("failure", "❌"),
    ("danger", "☢️"),
    ("bug", "🪳"),
    ("example", "🧪"),
    ("quote", "🗣️"),
];

pub fn admonition_emoji(kind: &str) -> Result<&'static str> {
    ADMONITION_EMOJIS.iter()
        .find(|(name, _)| *name == kind)
        .map(|(_, emoji)| *emoji)
        .ok_or_else(|| PostError::UnknownAdmonitionKind(kind.to_string()))
}

/// Rewrites every admonition block into a quote:
///
/// ```text
/// !!! warning "Careful"
///
///     Do not run this twice.
/// ```
///
/// becomes `> ⚠️ **Careful**`, a blank line and `> Do not run this twice.`.
/// An unknown admonition type fails the whole transformation.
pub fn transform_admonitions(content: &str) -> Result<String> {
    lazy_static! {
        static ref MARKER_REGEX: Regex = Regex::new(
            r#"^[!?]{3}\+? (\w+)(?:[ \t]+"([^"]+)")?[ \t]*$"#
        ).unwrap();
    }

    let lines: Vec<&str> = content.split('\n').collect();
    let mut transformed: Vec<String> = Vec::with_capacity(lines.len());
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        let body_start = idx + 2;

        let caps = match MARKER_REGEX.captures(line) {
            Some(caps) if opens_block(&lines, idx) => caps,
            _ => {
                transformed.push(line.to_string());
                idx += 1;
                continue;
            }
        };

        let kind = &caps[1];
        let emoji = admonition_emoji(kind)?;
        let title = match caps.get(2) {
            Some(title) => title.as_str().to_string(),
            None => capitalize(kind),
        };

        transformed.push(format!("> {} **{}**", emoji, title));
        transformed.push(String::new());

        let body_end = find_body_end(&lines, body_start);
        for body_line in &lines[body_start..body_end] {
            match body_line.strip_prefix(INDENT) {
                Some(text) if !text.trim().is_empty() => transformed.push(format!("> {}", text)),
                _ => transformed.push(">".to_string()),
            }
        }

        idx = body_end;
    }

    Ok(transformed.join("\n"))
}

fn is_indented(line: &str) -> bool {
    line.starts_with(INDENT) && !line.trim().is_empty()
}

// marker, one blank line, then at least one indented line
fn opens_block(lines: &[&str], marker_idx: usize) -> bool {
    let blank_follows = lines.get(marker_idx + 1).is_some_and(|l| l.trim().is_empty());
    let body_follows = lines.get(marker_idx + 2).is_some_and(|l| is_indented(l));
    blank_follows && body_follows
}

/// Blank lines belong to the block only when more indented lines come after them.
fn find_body_end(lines: &[&str], body_start: usize) -> usize {
    let mut end = body_start;
    let mut idx = body_start;

    while idx < lines.len() {
        let line = lines[idx];
        if is_indented(line) {
            end = idx + 1;
        } else if !line.trim().is_empty() {
            break;
        }
        idx += 1;
    }

    end
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}
