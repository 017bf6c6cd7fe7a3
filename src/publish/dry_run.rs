use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use spdlog::info;

use crate::error::Result;
use crate::publish::Platform;

pub const BODY_PLACEHOLDER: &str = "See cache...";

/// Writes the rendered body to `<cache_dir>/<platform>.md` and logs what would have been sent.
/// `payload` should already have its body swapped for [`BODY_PLACEHOLDER`].
pub fn write_draft(cache_dir: &Path, platform: Platform, body: &str, url: &str, payload: &Value) -> Result<PathBuf> {
    fs::create_dir_all(cache_dir)?;
    let draft_path = cache_dir.join(platform.draft_file_name());
    fs::write(&draft_path, body)?;

    info!("[Dry Run {}] draft written to {}", platform, draft_path.display());
    info!("[Dry Run {}] URL {}", platform, url);
    info!("[Dry Run {}] Payload: {}", platform, payload);

    Ok(draft_path)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_write_draft() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("nested").join("cache");
        let payload = json!({"content": BODY_PLACEHOLDER});

        let path = write_draft(&cache_dir, Platform::DevTo, "# Body", "https://dev.to/api/articles", &payload).unwrap();
        assert_eq!(path, cache_dir.join("Dev.to.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Body");

        // same platform, same file
        let again = write_draft(&cache_dir, Platform::DevTo, "# Other", "u", &payload).unwrap();
        assert_eq!(again, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Other");
    }
}
