use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use spdlog::debug;

use crate::content::FrontMatter;
use crate::error::{PostError, Result};
use crate::text_utils::format_tag;
use crate::util::yaml_date::PublishDate;

const REQUIRED_FIELDS: [&str; 7] = ["draft", "authors", "date", "categories", "tags", "description", "title"];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DateBlock {
    pub created: PublishDate,
}

/// Front matter exactly as authored. `main_image` is not part of it, it comes from the body.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SourceFrontMatter {
    pub draft: bool,
    pub authors: Vec<String>,
    pub date: DateBlock,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub description: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

impl SourceFrontMatter {
    pub fn resolve(self, main_image: String) -> FrontMatter {
        FrontMatter {
            draft: self.draft,
            authors: self.authors,
            date: self.date.created,
            categories: self.categories,
            tags: self.tags.iter().map(|tag| format_tag(tag)).collect(),
            description: self.description,
            title: self.title,
            main_image,
            series: self.series,
        }
    }
}

impl FrontMatter {
    /// Serializes back into the authored schema, with the date nested under `date.created`.
    pub fn to_yaml(&self) -> Result<String> {
        let source = SourceFrontMatter {
            draft: self.draft,
            authors: self.authors.clone(),
            date: DateBlock { created: self.date },
            categories: self.categories.clone(),
            tags: self.tags.clone(),
            description: self.description.clone(),
            title: self.title.clone(),
            series: self.series.clone(),
        };
        serde_yaml::to_string(&source).map_err(|e| PostError::InvalidFrontMatterValue(e.to_string()))
    }
}

/// Splits the raw document into the front matter text and the trimmed body.
pub fn split_front_matter(content: &str, delimiter: &str) -> Result<(String, String)> {
    let mut lines = content.lines();

    match lines.next() {
        Some(line) if line == delimiter => {}
        _ => return Err(PostError::MissingFrontMatter(delimiter.to_string())),
    }

    let mut front_matter = String::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if line == delimiter {
            closed = true;
            break;
        }
        front_matter.push_str(line);
        front_matter.push('\n');
    }

    if !closed {
        return Err(PostError::MalformedFrontMatter(format!("closing '{}' is missing", delimiter)));
    }

    let body = lines.collect::<Vec<&str>>().join("\n");
    Ok((front_matter, body.trim().to_string()))
}

pub fn parse_front_matter(front_matter: &str) -> Result<SourceFrontMatter> {
    let value: Value = serde_yaml::from_str(front_matter)
        .map_err(|e| PostError::MalformedFrontMatter(e.to_string()))?;

    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        // an empty block parses as null
        Value::Null => Mapping::new(),
        _ => return Err(PostError::MalformedFrontMatter("front matter is not a key-value mapping".to_string())),
    };

    let missing = missing_fields(&mapping);
    if !missing.is_empty() {
        return Err(PostError::InvalidFrontMatterSchema { missing });
    }

    let parsed: SourceFrontMatter = serde_yaml::from_value(Value::Mapping(mapping))
        .map_err(|e| PostError::InvalidFrontMatterValue(e.to_string()))?;
    debug!("Parsed front matter for '{}'", parsed.title);

    Ok(parsed)
}

fn missing_fields(mapping: &Mapping) -> Vec<String> {
    let mut missing: Vec<String> = REQUIRED_FIELDS.iter()
        .filter(|field| !mapping.contains_key(**field))
        .map(|field| field.to_string())
        .collect();

    if let Some(date) = mapping.get("date") {
        let has_created = date.as_mapping().is_some_and(|d| d.contains_key("created"));
        if !has_created {
            missing.push("date.created".to_string());
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use crate::content::BlogPost;
    use crate::test_data::POST_DATA;

    use super::*;

    #[test]
    fn test_split_front_matter() {
        let (front_matter, body) = split_front_matter("---\ntitle: x\ndraft: true\n---\n\n  Body here\n\n", "---").unwrap();
        assert_eq!(front_matter, "title: x\ndraft: true\n");
        assert_eq!(body, "Body here");
    }

    #[test]
    fn test_split_front_matter_empty_body() {
        let (front_matter, body) = split_front_matter("---\ntitle: x\n---", "---").unwrap();
        assert_eq!(front_matter, "title: x\n");
        assert_eq!(body, "");
    }

    #[test]
    fn test_missing_front_matter() {
        let err = split_front_matter("title: x\n---\n", "---").unwrap_err();
        assert!(matches!(err, PostError::MissingFrontMatter(_)));

        let err = split_front_matter("", "---").unwrap_err();
        assert!(matches!(err, PostError::MissingFrontMatter(_)));

        // the delimiter must be the whole first line
        let err = split_front_matter("--- \ntitle: x\n---\n", "---").unwrap_err();
        assert!(matches!(err, PostError::MissingFrontMatter(_)));
    }

    #[test]
    fn test_unclosed_front_matter() {
        let err = split_front_matter("---\ntitle: x\nbody", "---").unwrap_err();
        assert!(matches!(err, PostError::MalformedFrontMatter(_)));
    }

    #[test]
    fn test_missing_fields_are_named() {
        let err = parse_front_matter("draft: true\ntitle: x\ndate:\n  updated: 2024-01-01\n").unwrap_err();
        match err {
            PostError::InvalidFrontMatterSchema { missing } => {
                assert_eq!(missing, ["authors", "categories", "tags", "description", "date.created"]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_front_matter() {
        let err = parse_front_matter("").unwrap_err();
        assert!(matches!(err, PostError::InvalidFrontMatterSchema { missing } if missing.len() == REQUIRED_FIELDS.len()));
    }

    #[test]
    fn test_wrong_type() {
        let text = "draft: maybe\nauthors: [a]\ndate:\n  created: 2024-01-01\ncategories: []\ntags: []\ndescription: d\ntitle: t\n";
        let err = parse_front_matter(text).unwrap_err();
        assert!(matches!(err, PostError::InvalidFrontMatterValue(_)));
    }

    #[test]
    fn test_date_is_hoisted() {
        let text = "draft: false\nauthors: [a]\ndate:\n  created: 2022-04-02 12:05:00\ncategories: []\ntags: [one-two]\ndescription: d\ntitle: t\n";
        let parsed = parse_front_matter(text).unwrap();
        let meta = parsed.resolve("https://x.com/a.png".to_string());

        let date = NaiveDate::from_ymd_opt(2022, 04, 02).unwrap();
        let time = NaiveTime::from_hms_opt(12, 05, 00).unwrap();
        assert_eq!(meta.date.0.naive_local(), NaiveDateTime::new(date, time));
        assert_eq!(meta.tags, ["OneTwo"]);
        assert_eq!(meta.series, None);
    }

    #[test]
    fn test_round_trip() {
        let post = BlogPost::parse(POST_DATA).unwrap();
        let yaml = post.meta.to_yaml().unwrap();
        assert!(yaml.contains("created:"));
        assert!(!yaml.contains("main_image"));

        let rebuilt = format!("---\n{}---\n\nmain-image: ![c]({})\n", yaml, post.meta.main_image);
        let reparsed = BlogPost::parse(&rebuilt).unwrap();
        assert_eq!(reparsed.meta, post.meta);
    }
}
