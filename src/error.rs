use thiserror::Error;

pub type Result<T> = std::result::Result<T, PostError>;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("No front matter detected: the first line must be '{0}'")]
    MissingFrontMatter(String),

    #[error("Malformed front matter: {0}")]
    MalformedFrontMatter(String),

    #[error("Invalid front matter, missing field(s): {}", .missing.join(", "))]
    InvalidFrontMatterSchema { missing: Vec<String> },

    #[error("Invalid front matter value: {0}")]
    InvalidFrontMatterValue(String),

    #[error("Cannot find the main image line")]
    MainImageNotFound,

    #[error("Cannot find the URL inside the main image line: {0}")]
    MainImageUrlMissing(String),

    #[error("Admonition type '{0}' does not have a declared mapping")]
    UnknownAdmonitionKind(String),

    #[error("Error downloading image {url}: {reason}")]
    ImageDownload { url: String, reason: String },

    #[error("Error converting image {name}: {reason}")]
    ImageConversion { name: String, reason: String },

    #[error("Error uploading image {name}: {reason}")]
    ImageUpload { name: String, reason: String },

    #[error("{0} is not found in the environment")]
    MissingCredential(String),

    #[error("Suggestion response is not in the expected format: {0}")]
    SuggestionFormat(String),

    #[error("Error publishing to {platform}: {reason}")]
    Publish { platform: String, reason: String },

    #[error("The URL '{0}' is not valid")]
    InvalidUrl(String),

    #[error("{0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PostError {
    /// Short label used when reporting the error to the user.
    pub fn category(&self) -> &'static str {
        match self {
            PostError::MissingFrontMatter(_)
            | PostError::MalformedFrontMatter(_)
            | PostError::InvalidFrontMatterSchema { .. }
            | PostError::InvalidFrontMatterValue(_) => "front matter",
            PostError::MainImageNotFound | PostError::MainImageUrlMissing(_) => "main image",
            PostError::UnknownAdmonitionKind(_) => "admonition",
            PostError::ImageDownload { .. }
            | PostError::ImageConversion { .. }
            | PostError::ImageUpload { .. } => "image",
            PostError::MissingCredential(_) => "credential",
            PostError::SuggestionFormat(_) => "suggestion",
            PostError::Publish { .. } => "publish",
            PostError::InvalidUrl(_) | PostError::Usage(_) => "usage",
            PostError::Config(_) => "config",
            PostError::Io(_) => "io",
        }
    }

    /// Errors raised while reading the source document. None of them may reach a publish step.
    pub fn is_parse_error(&self) -> bool {
        matches!(self.category(), "front matter" | "main image" | "admonition")
    }
}
