//! Config file discovery

use std::env;
use std::path::PathBuf;

/// File name searched for in the working directory and the home directory
pub const CONFIG_FILE: &str = ".redux-store.toml";

/// Places the config file is looked up, highest priority first
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(CONFIG_FILE));
    }
    candidates
}

/// Read the first candidate that exists
pub fn read_first<I>(candidates: I) -> Option<(PathBuf, String)>
where
    I: IntoIterator<Item = PathBuf>,
{
    candidates.into_iter().find_map(|path| match std::fs::read_to_string(&path) {
        Ok(content) => {
            log::debug!("Loaded config from {}", path.display());
            Some((path, content))
        }
        Err(_) => None,
    })
}

/// Content of the config file from the working directory or home, if any
pub fn load_config_file() -> Option<String> {
    read_first(config_candidates()).map(|(_, content)| content)
}
