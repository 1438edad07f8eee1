use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use crate::error::{Result, SubfetchError};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub organize: OrganizeConfig,
    pub encoding: EncodingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Subtitle service endpoint URL
    pub endpoint: String,
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
    /// User agent reported to the service
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeConfig {
    /// How the extension token is matched against filenames
    pub match_mode: MatchMode,
    /// Skip files whose target directory already holds them instead of failing
    #[serde(default = "default_true")]
    pub resume: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Suffix: the token must terminate the filename
    Suffix,
    /// Substring: the token may appear anywhere in the filename
    Substring,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Charset label assumed for downloaded subtitle text (WHATWG label)
    pub default_charset: String,
    /// Per-language charset overrides, keyed by subtitle language tag
    #[serde(default)]
    pub overrides: HashMap<String, String>,
    /// Prepend a UTF-8 byte-order mark to the output
    #[serde(default = "default_true")]
    pub bom: bool,
    /// Keep payloads that already decode as UTF-8 unchanged
    #[serde(default = "default_true")]
    pub utf8_passthrough: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                endpoint: "https://api.opensubtitles.org".to_string(),
                username: String::new(),
                password: String::new(),
                user_agent: "subfetch/0.1.0".to_string(),
            },
            organize: OrganizeConfig {
                match_mode: MatchMode::Suffix,
                resume: true,
            },
            encoding: EncodingConfig {
                default_charset: "ISO-8859-9".to_string(),
                overrides: HashMap::new(),
                bom: true,
                utf8_passthrough: true,
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SubfetchError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SubfetchError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SubfetchError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SubfetchError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Charset label to assume for a subtitle payload in the given language.
    pub fn charset_for_language(&self, language: &str) -> &str {
        self.encoding
            .overrides
            .get(language)
            .map(String::as_str)
            .unwrap_or(&self.encoding.default_charset)
    }
}
