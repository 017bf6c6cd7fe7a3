use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

const ARTICLE_CONTEXT: &str = "Articles are given inside triple backticks, written in markdown for Material for MkDocs, and may start with front matter you should ignore.";

const TITLE_PROMPT: &str = r#"You are a concise copywriter for technical blog posts and their SEO.
{context}

Write **three distinct one-line titles** that make a reader curious enough to open the article. Use UK spelling and grammar.

Each title MUST be between 30 and 50 characters long.

**Reply ONLY with a JSON array of strings, like:**
["First title", "Second title", "Third title"]
**No commentary or formatting outside the JSON array.**
"#;

const DESCRIPTION_PROMPT: &str = r#"You are a concise summariser for technical blog posts and their SEO.
{context}

Write **three distinct one-line summaries** that make a reader want the full article. Use UK spelling and grammar.

Each summary MUST be between 140 and 156 characters long.

**Reply ONLY with a JSON array of strings, like:**
["First summary", "Second summary", "Third summary"]
**No commentary or formatting outside the JSON array.**
"#;

const EXCERPT_PROMPT: &str = r#"You summarise technical blog posts.
{context}

Write **three distinct one-paragraph excerpts** that introduce the main ideas of the article and make the reader want to continue.
Keep it short and casual, talk to the reader as "you", never mention the article's title, and use UK spelling and grammar.

**Reply ONLY with a JSON array of strings, like:**
["First excerpt", "Second excerpt", "Third excerpt"]
**No commentary or formatting outside the JSON array.**
"#;

const REVIEW_PROMPT: &str = r#"You are a concise proofreader for technical blog posts.
{context}

Rate the article out of 5 on each of these criteria:
1. **Correctness:** spelling and grammar (UK English).
2. **Clarity:** how clearly complex ideas are explained.
3. **Accuracy:** technical facts and code snippets.
4. **Structure:** logical flow, headings and transitions.
5. **Consistency:** tone, terminology and formatting.
6. **Readability:** overly long sentences, places where a list would help.
7. **Story:** whether a setup, conflict, resolution arc would help.

Only comment on a criterion rated below 5/5, and only when the improvement is significant.
Reply one criterion per line, comment after a dash, for example:
Correctness: 5/5
Clarity: 4/5 - The second section jumps into lifetimes without an example.
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Title,
    Description,
    Excerpt,
    Review,
}

impl TaskKind {
    pub fn system_prompt(&self) -> String {
        let template = match self {
            TaskKind::Title => TITLE_PROMPT,
            TaskKind::Description => DESCRIPTION_PROMPT,
            TaskKind::Excerpt => EXCERPT_PROMPT,
            TaskKind::Review => REVIEW_PROMPT,
        };
        template.replace("{context}", ARTICLE_CONTEXT)
    }

    pub fn user_prompt(&self, article: &str) -> String {
        let instruction = match self {
            TaskKind::Title => "Create a title for this article:",
            TaskKind::Description => "Summarise this article:",
            TaskKind::Excerpt => "Introduce this article:",
            TaskKind::Review => "Analyse this article:",
        };
        format!("{} ```{}```", instruction, article)
    }

    /// Expected length in characters of each candidate, when there is one.
    pub fn length_range(&self) -> Option<RangeInclusive<usize>> {
        match self {
            TaskKind::Title => Some(30..=50),
            TaskKind::Description => Some(140..=156),
            TaskKind::Excerpt | TaskKind::Review => None,
        }
    }
}

impl Display for TaskKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TaskKind::Title => "Title",
            TaskKind::Description => "Description",
            TaskKind::Excerpt => "Excerpt",
            TaskKind::Review => "Review",
        };
        write!(f, "{}", name)
    }
}
