use lazy_static::lazy_static;
use regex::Regex;

use crate::content::admonition::transform_admonitions;
use crate::content::emoji::emojize;
use crate::error::Result;

pub const EXCERPT_MARKER: &str = "<!-- more -->";
pub const INCLUDE_MARKER: &str = "--8<--";

/// The rewrites every platform gets, in order: admonitions, headers, excerpt marker,
/// emoji aliases and include directives.
pub fn transform_body(body: &str) -> Result<String> {
    let content = transform_admonitions(body)?;
    let content = shift_headers(&content);
    let content = remove_excerpt_marker(&content);
    let content = emojize(&content);
    Ok(remove_includes(&content))
}

/// Level 2 headers become level 1 and level 3 become level 2.
///
/// Both passes are plain text replacements run one after the other: `###` is already `##`
/// after the first one, and only runs of five or more `#` are touched by the second.
pub fn shift_headers(content: &str) -> String {
    content.replace("##", "#").replace("###", "##")
}

pub fn remove_excerpt_marker(content: &str) -> String {
    let content = content.replace(&format!("{}\n", EXCERPT_MARKER), "");
    match content.strip_suffix(EXCERPT_MARKER) {
        Some(stripped) => stripped.to_string(),
        None => content,
    }
}

/// Snippet includes only make sense for the site generator, the lines are dropped.
pub fn remove_includes(content: &str) -> String {
    content.split('\n')
        .filter(|line| !line.contains(INCLUDE_MARKER))
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Drops the attribute list after an image (`![a](url){ width="300" }`), keeping the image.
pub fn remove_curly_brace_content(content: &str) -> String {
    lazy_static! {
        static ref CURLY_BRACE_REGEX: Regex = Regex::new(
            r"(!\[.*?\]\(https?://[^)]+\))\s*\{.*?\}"
        ).unwrap();
    }
    CURLY_BRACE_REGEX.replace_all(content, "$1").to_string()
}

pub fn collapse_figcaption_whitespace(content: &str) -> String {
    lazy_static! {
        static ref FIGCAPTION_REGEX: Regex = Regex::new(r"\s+<figcaption>").unwrap();
    }
    FIGCAPTION_REGEX.replace_all(content, "\n<figcaption>").to_string()
}
