use serde::Serialize;

use crate::error::Result;
use crate::util::yaml_date::PublishDate;

pub mod admonition;
pub mod emoji;
pub mod front_matter;
pub mod main_image;
pub mod rewrite;

pub const DEFAULT_DELIMITER: &str = "---";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontMatter {
    pub draft: bool,
    pub authors: Vec<String>,
    pub date: PublishDate,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub description: String,
    pub title: String,
    pub main_image: String,
    pub series: Option<String>,
}

/// A parsed post: resolved front matter plus the body after the shared rewrites.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub meta: FrontMatter,
    pub content: String,
}

impl BlogPost {
    pub fn parse(raw: &str) -> Result<BlogPost> {
        Self::parse_with_delimiter(raw, DEFAULT_DELIMITER)
    }

    /// Example of post
    /// ---
    /// draft: false
    /// date:
    ///   created: 2024-05-01
    /// title: Something
    /// ...
    /// ---
    ///
    /// main-image: ![cover](https://example.com/cover.png)
    pub fn parse_with_delimiter(raw: &str, delimiter: &str) -> Result<BlogPost> {
        let (front_matter_text, body) = front_matter::split_front_matter(raw, delimiter)?;
        let source = front_matter::parse_front_matter(&front_matter_text)?;

        let content = rewrite::transform_body(&body)?;
        let main_image = main_image::find_main_image(&content)?;

        Ok(BlogPost {
            meta: source.resolve(main_image),
            content: content.trim().to_string(),
        })
    }
}
