use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::utils::log_msg;

pub const DEFAULT_CONFIG_PATH: &str = "finsage-tour.json";

/// Persisted user preferences. One key today: the display locale.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub locale: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log_msg(
                    "warn",
                    &format!("Failed to parse {}: {e}. Using defaults.", path.display()),
                );
                Config::default()
            }),
            // Missing file is the first-run case.
            Err(_) => Config::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
    }
}
