use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{PostError, Result};

pub const MAIN_IMAGE_MARKER: &str = "main-image";

/// Finds the post's main image. Some sites take it as metadata instead of in the body.
///
/// The line is left where it is.
pub fn find_main_image(content: &str) -> Result<String> {
    lazy_static! {
        static ref MAIN_IMAGE_REGEX: Regex = Regex::new(
            &format!(r"(?m)^(.*{}.*)$", regex::escape(MAIN_IMAGE_MARKER))
        ).unwrap();
        static ref URL_REGEX: Regex = Regex::new(r"\((https?://[^\s)]+)\)").unwrap();
    }

    let line = MAIN_IMAGE_REGEX.captures(content)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .ok_or(PostError::MainImageNotFound)?;

    URL_REGEX.captures(line)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| PostError::MainImageUrlMissing(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_main_image() {
        let url = find_main_image("intro\nmain-image: ![alt](https://x.com/a.png)\nrest").unwrap();
        assert_eq!(url, "https://x.com/a.png");
    }

    #[test]
    fn test_first_line_wins() {
        let content = "![main-image](https://x.com/first.png){ .main-image }\n\nmain-image: ![b](https://x.com/second.png)";
        assert_eq!(find_main_image(content).unwrap(), "https://x.com/first.png");
    }

    #[test]
    fn test_no_main_image() {
        let err = find_main_image("![alt](https://x.com/a.png)").unwrap_err();
        assert!(matches!(err, PostError::MainImageNotFound));

        // the marker is case sensitive
        let err = find_main_image("Main-Image: ![alt](https://x.com/a.png)").unwrap_err();
        assert!(matches!(err, PostError::MainImageNotFound));
    }

    #[test]
    fn test_main_image_without_url() {
        let err = find_main_image("main-image: ![alt](cover.png)").unwrap_err();
        assert!(matches!(err, PostError::MainImageUrlMissing(line) if line == "main-image: ![alt](cover.png)"));
    }
}
