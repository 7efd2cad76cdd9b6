use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::parser::ParseOptions;

/// Runtime settings: built-in defaults, then `dieta.toml` when present, then
/// `DIETA_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub min_span_chars: usize,
    pub log_level: String,
    pub estimate_missing_macros: bool,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_builder(Config::builder().add_source(File::with_name("dieta").required(false)))
    }

    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let defaults = ParseOptions::default();
        let settings = builder
            .set_default("min_span_chars", defaults.min_span_chars as u64)?
            .set_default("log_level", "info")?
            .set_default("estimate_missing_macros", false)?
            .add_source(Environment::with_prefix("DIETA").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            min_span_chars: self.min_span_chars,
        }
    }
}
