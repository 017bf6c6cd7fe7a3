pub mod openai;
pub mod prompts;

use std::fmt::{Display, Formatter};

use lazy_static::lazy_static;
use regex::Regex;
use spdlog::{debug, warn};

use crate::error::{PostError, Result};
use crate::suggest::openai::ChatCompletion;
use crate::suggest::prompts::TaskKind;

#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    pub criterion: String,
    pub score: u8,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewReport {
    pub ratings: Vec<Rating>,
}

impl ReviewReport {
    pub fn lowest(&self) -> Option<&Rating> {
        self.ratings.iter().min_by_key(|r| r.score)
    }
}

impl Display for ReviewReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for rating in &self.ratings {
            write!(f, "{}: {}/5", rating.criterion, rating.score)?;
            if let Some(ref comment) = rating.comment {
                write!(f, " - {}", comment)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Produces candidate text for a post: titles, descriptions, excerpts, or a review.
pub trait TextSuggester {
    fn suggest(&self, body: &str, task: TaskKind, model: Option<&str>) -> Result<Vec<String>>;
    fn review(&self, body: &str, model: Option<&str>) -> Result<ReviewReport>;
}

pub struct Suggester<C: ChatCompletion> {
    chat: C,
    default_model: String,
}

impl<C: ChatCompletion> Suggester<C> {
    pub fn new(chat: C, default_model: &str) -> Self {
        Suggester {
            chat,
            default_model: default_model.to_string(),
        }
    }

    fn ask(&self, body: &str, task: TaskKind, model: Option<&str>) -> Result<String> {
        let model = model.unwrap_or(&self.default_model);
        debug!("Requesting {} suggestions from {}", task, model);
        self.chat.complete(model, &task.system_prompt(), &task.user_prompt(body))
    }
}

impl<C: ChatCompletion> TextSuggester for Suggester<C> {
    fn suggest(&self, body: &str, task: TaskKind, model: Option<&str>) -> Result<Vec<String>> {
        if task == TaskKind::Review {
            return Err(PostError::Usage("reviews are requested with review()".to_string()));
        }

        let reply = self.ask(body, task, model)?;
        let candidates = parse_candidates(&reply)?;
        if let Some(range) = task.length_range() {
            for candidate in candidates.iter().filter(|c| !range.contains(&c.chars().count())) {
                warn!("{} candidate has {} characters, expected {} to {}: {}",
                    task, candidate.chars().count(), range.start(), range.end(), candidate);
            }
        }
        Ok(candidates)
    }

    fn review(&self, body: &str, model: Option<&str>) -> Result<ReviewReport> {
        let reply = self.ask(body, TaskKind::Review, model)?;
        parse_review(&reply)
    }
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Reads a JSON array of strings, optionally wrapped in a ```json fence.
pub fn parse_candidates(reply: &str) -> Result<Vec<String>> {
    let candidates: Vec<String> = serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| PostError::SuggestionFormat(format!("expected a JSON array of strings ({})", e)))?;

    let candidates: Vec<String> = candidates.into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if candidates.is_empty() {
        return Err(PostError::SuggestionFormat("no candidates in the reply".to_string()));
    }
    Ok(candidates)
}

/// Reads lines such as `Clarity: 4/5 - comment`. Markdown emphasis and list markers are ignored.
pub fn parse_review(reply: &str) -> Result<ReviewReport> {
    lazy_static! {
        static ref RATING_RE: Regex = Regex::new(
            r"(?m)^[ \t*#\-\d.]*([A-Za-z][A-Za-z ]*?)\**[ \t]*:[ \t]*\**[ \t]*([0-5])[ \t]*/[ \t]*5[ \t]*\**(?:[ \t]*[-:–—]+[ \t]*(.*?))?[ \t]*$"
        ).unwrap();
    }

    let ratings: Vec<Rating> = RATING_RE.captures_iter(reply)
        .filter_map(|caps| {
            let score = caps[2].parse::<u8>().ok()?;
            let comment = caps.get(3)
                .map(|c| c.as_str().trim().to_string())
                .filter(|c| !c.is_empty());
            Some(Rating { criterion: caps[1].trim().to_string(), score, comment })
        })
        .collect();

    if ratings.is_empty() {
        return Err(PostError::SuggestionFormat("no 'criterion: n/5' ratings in the review".to_string()));
    }
    Ok(ReviewReport { ratings })
}
