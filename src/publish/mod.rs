use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use crate::config::{DEV_API_KEY, MEDIUM_API_KEY};
use crate::error::{PostError, Result};

pub mod devto;
pub mod dry_run;
pub mod medium;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Medium,
    DevTo,
    /// Copied by hand (LinkedIn). Never published automatically.
    Manual,
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Medium => "Medium",
            Platform::DevTo => "Dev.to",
            Platform::Manual => "LinkedIn",
        }
    }

    /// Drafts always land on the same file, so reruns overwrite instead of piling up.
    pub fn draft_file_name(&self) -> String {
        format!("{}.md", self.name())
    }

    pub fn credential_var(&self) -> Option<&'static str> {
        match self {
            Platform::Medium => Some(MEDIUM_API_KEY),
            Platform::DevTo => Some(DEV_API_KEY),
            Platform::Manual => None,
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Everything a platform needs to create a draft.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub description: String,
    pub main_image: String,
    pub canonical_url: String,
    pub series: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PublishMode {
    Live,
    /// No network; the rendered body is written under the given cache directory.
    DryRun(PathBuf),
}

impl PublishMode {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, PublishMode::DryRun(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Receipt {
    Published { platform: Platform, dashboard: String },
    DryRun { platform: Platform, draft_path: PathBuf },
}

pub trait Publisher {
    fn platform(&self) -> Platform;

    fn publish(&self, submission: &Submission, mode: &PublishMode) -> Result<Receipt>;
}

pub(crate) fn require_token(token: &Option<String>, platform: Platform) -> Result<&str> {
    match token {
        Some(token) => Ok(token.as_str()),
        None => Err(PostError::MissingCredential(platform.credential_var().unwrap_or("API key").to_string())),
    }
}

pub(crate) fn publish_err(platform: Platform, reason: impl Display) -> PostError {
    PostError::Publish { platform: platform.name().to_string(), reason: reason.to_string() }
}
