use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;

use crate::content::DEFAULT_DELIMITER;
use crate::error::{PostError, Result};

pub const MEDIUM_API_KEY: &str = "MEDIUM_API_KEY";
pub const DEV_API_KEY: &str = "DEV_API_KEY";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

#[derive(Deserialize, Default)]
pub struct Paths {
    pub cache_dir: Option<PathBuf>,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Medium {
    pub api_url: String,
}

impl Default for Medium {
    fn default() -> Self {
        Medium { api_url: "https://api.medium.com/v1".to_string() }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Dev {
    pub api_url: String,
}

impl Default for Dev {
    fn default() -> Self {
        Dev { api_url: "https://dev.to/api/articles".to_string() }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct OpenAi {
    pub api_url: String,
    pub default_model: String,
    pub models: Vec<String>,
}

impl Default for OpenAi {
    fn default() -> Self {
        OpenAi {
            api_url: "https://api.openai.com/v1".to_string(),
            default_model: "gpt-4o-mini".to_string(),
            models: ["gpt-4o", "gpt-4o-mini", "o1", "o1-mini"].iter().map(|m| m.to_string()).collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Parser {
    pub delimiter: String,
}

impl Default for Parser {
    fn default() -> Self {
        Parser { delimiter: DEFAULT_DELIMITER.to_string() }
    }
}

#[derive(Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: Paths,
    pub log: Option<Log>,
    #[serde(default)]
    pub medium: Medium,
    #[serde(default)]
    pub dev: Dev,
    #[serde(default)]
    pub openai: OpenAi,
    #[serde(default)]
    pub parser: Parser,
}

impl Config {
    /// Where dry-run drafts and the manual copy are written.
    pub fn cache_dir(&self) -> PathBuf {
        match self.paths.cache_dir {
            Some(ref dir) => dir.clone(),
            None => dirs::cache_dir()
                .unwrap_or_else(env::temp_dir)
                .join("crosspost"),
        }
    }

    pub fn validate_model(&self, model: &str) -> Result<()> {
        if self.openai.models.iter().any(|m| m == model) {
            Ok(())
        } else {
            Err(PostError::Usage(format!("'{}' is not a valid model. Valid models: {}", model, self.openai.models.join(", "))))
        }
    }
}

/// Reads an API key from the environment. Keys never live in the config file.
pub fn credential(var_name: &str) -> Result<String> {
    match env::var(var_name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PostError::MissingCredential(var_name.to_string())),
    }
}

fn parse_path(path: PathBuf) -> PathBuf {
    if !path.starts_with("${exe_dir}") {
        return path;
    }

    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    match (exe_dir, path.to_str()) {
        (Some(exe_dir), Some(str_path)) => {
            PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy()))
        }
        _ => path,
    }
}

pub fn parse_config(cfg_content: &str) -> Result<Config> {
    let mut cfg: Config = toml::from_str::<Config>(cfg_content)
        .map_err(|e| PostError::Config(format!("Error parsing configuration file: {}", e)))?;

    cfg.paths.cache_dir = cfg.paths.cache_dir.map(parse_path);
    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path);
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> Result<Config> {
    let cfg_content = fs::read_to_string(cfg_path)
        .map_err(|e| PostError::Config(format!("Error opening configuration file {}: {}", cfg_path.display(), e)))?;

    parse_config(&cfg_content)
}
