use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::client::types::{DEFAULT_NUM_CTX, DEFAULT_TEMPERATURE};
use crate::client::{GenerationOptions, DEFAULT_BASE_URL};

const CONFIG_FILE: &str = "llm-case-eval.toml";

/// Optional file-based defaults. CLI flags override these, and these
/// override the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub num_ctx: Option<u32>,
    pub temperature: Option<f32>,
}

impl Config {
    /// Read `llm-case-eval.toml` from the working directory when present.
    /// A broken config file degrades to defaults with a warning rather than
    /// refusing to start.
    pub fn load_or_default() -> Self {
        let config_path = Path::new(CONFIG_FILE);

        if config_path.exists() {
            match Self::load(config_path) {
                Ok(config) => return config,
                Err(e) => {
                    eprintln!("Warning: Failed to load config file: {}", e);
                    eprintln!("Using default configuration");
                }
            }
        }

        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))?;

        Ok(config)
    }

    pub fn base_url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Merge CLI flags over config values over built-in defaults, clamping
    /// the result into the supported bounds.
    pub fn generation_options(
        &self,
        num_ctx: Option<u32>,
        temperature: Option<f32>,
    ) -> GenerationOptions {
        GenerationOptions {
            num_ctx: num_ctx.or(self.num_ctx).unwrap_or(DEFAULT_NUM_CTX),
            temperature: temperature
                .or(self.temperature)
                .unwrap_or(DEFAULT_TEMPERATURE),
        }
        .clamped()
    }
}
