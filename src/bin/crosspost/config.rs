use std::env;
use std::path::PathBuf;

use crosspost::config::{read_config, Config};
use crosspost::error::{PostError, Result};

use crate::CFG_FILE_NAME;

fn get_config_path() -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()));
    let cur_dir = env::current_dir().ok();
    let cfg_dir = dirs::config_dir().map(|dir| dir.join("crosspost"));

    [exe_dir, cur_dir, cfg_dir].into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

/// An explicit path must exist. Without one, the first file found is used, else the defaults.
pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config> {
    if let Some(cfg_path) = cfg_path {
        if !cfg_path.exists() {
            return Err(PostError::Usage(format!("Configuration file {} does not exist", cfg_path.display())));
        }
        return read_config(&cfg_path);
    }

    match get_config_path() {
        Some(config_path) => {
            eprintln!("Reading config from {}", config_path.display());
            read_config(&config_path)
        }
        None => Ok(Config::default()),
    }
}
