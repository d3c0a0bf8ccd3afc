use std::path::Path;

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use super::error::{CatphishError, Result};
use crate::{DEFAULT_GEMINI_MODEL, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatphishConfig {

    pub llm_provider: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub llm_temperature: f64,
    /// Per-request HTTP timeout in seconds.
    pub timeout: u64,


    pub llm_fallback_enabled: bool,
    pub llm_fallback_url: String,
    pub llm_fallback_model: String,

    /// Replaces the built-in daily prompt rotation when set.
    pub prompt_rotation: Option<Vec<String>>,
}

impl Default for CatphishConfig {
    fn default() -> Self {
        Self {
            llm_provider: "gemini".to_string(),
            llm_model: DEFAULT_GEMINI_MODEL.to_string(),
            llm_api_key: None,
            llm_base_url: None,
            llm_temperature: 0.2,
            timeout: 60,

            llm_fallback_enabled: true,
            llm_fallback_url: DEFAULT_OLLAMA_URL.to_string(),
            llm_fallback_model: DEFAULT_OLLAMA_MODEL.to_string(),

            prompt_rotation: None,
        }
    }
}

impl CatphishConfig {
    /// Layers defaults, an optional TOML file, then `CATPHISH_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let mut config: Self = builder
            .add_source(Environment::with_prefix("CATPHISH").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if config.llm_api_key.is_none() {
            config.llm_api_key = std::env::var("GEMINI_API_KEY").ok();
        }

        config.validate()?;
        Ok(config)
    }


    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(CatphishError::Config(format!(
                "llm_temperature must be within 0.0..=2.0, got {}",
                self.llm_temperature
            )));
        }
        if self.timeout == 0 {
            return Err(CatphishError::Config("timeout must be non-zero".to_string()));
        }
        if let Some(base_url) = &self.llm_base_url {
            check_url("llm_base_url", base_url)?;
        }
        if self.llm_fallback_enabled {
            check_url("llm_fallback_url", &self.llm_fallback_url)?;
        }
        if let Some(rotation) = &self.prompt_rotation {
            if rotation.is_empty() || rotation.iter().any(|p| p.trim().is_empty()) {
                return Err(CatphishError::Config(
                    "prompt_rotation must contain non-empty prompts".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn check_url(field: &str, value: &str) -> Result<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| CatphishError::Config(format!("{field} is not a valid URL ({value}): {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = CatphishConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.llm_provider, "gemini");
    }

    #[test]
    fn test_rejects_out_of_range_temperature() {
        let config = CatphishConfig {
            llm_temperature: 3.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CatphishError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let config = CatphishConfig {
            llm_base_url: Some("not a url".to_string()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("llm_base_url"));
    }

    #[test]
    fn test_fallback_url_ignored_when_disabled() {
        let config = CatphishConfig {
            llm_fallback_enabled: false,
            llm_fallback_url: "::".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_rotation() {
        let config = CatphishConfig {
            prompt_rotation: Some(vec![]),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = CatphishConfig {
            timeout: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_layers_defaults_file_and_env() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
llm_provider = "ollama"
llm_model = "from-file"
llm_fallback_model = "file-fallback"
prompt_rotation = ["A", "B"]
"#
        )
        .unwrap();

        // SAFETY: no other test reads or writes CATPHISH_LLM_MODEL.
        unsafe { std::env::set_var("CATPHISH_LLM_MODEL", "from-env") };
        let loaded = CatphishConfig::load(Some(file.path()));
        unsafe { std::env::remove_var("CATPHISH_LLM_MODEL") };

        let config = loaded.unwrap();
        assert_eq!(config.llm_provider, "ollama");
        assert_eq!(config.llm_model, "from-env");
        assert_eq!(config.llm_fallback_model, "file-fallback");
        assert_eq!(config.llm_temperature, 0.2);
        assert_eq!(config.timeout, 60);
        assert_eq!(config.prompt_rotation, Some(vec!["A".to_string(), "B".to_string()]));
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "llm_temperature = 7.5").unwrap();

        let err = CatphishConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("llm_temperature"));
    }
}
