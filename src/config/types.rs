use std::num::ParseIntError;

use serde::{Deserialize, Serialize};

use super::{ConfigError, ConfigResult};
use crate::{tokenizer::DEFAULT_MAX_CONCURRENT_DECODES, tool_parser::ParserFormat};

pub const ENV_FORMAT: &str = "TOOL_PARSER_FORMAT";
pub const ENV_SKIP_SPECIAL_TOKENS: &str = "TOOL_PARSER_SKIP_SPECIAL_TOKENS";
pub const ENV_DECODE_WORKERS: &str = "TOOL_PARSER_DECODE_WORKERS";
pub const ENV_TRACE: &str = "TOOL_PARSER_TRACE";

/// Settings for building a tool parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolParserConfig {
    /// Registry key of the tool call format, e.g. "hermes"
    pub format: String,
    /// Drop special tokens while decoding
    pub skip_special_tokens: bool,
    /// Maximum number of decodes running on the blocking pool at once
    pub max_concurrent_decodes: usize,
    /// Wrap the parser in a tracing span
    pub trace: bool,
}

impl Default for ToolParserConfig {
    fn default() -> Self {
        Self {
            format: ParserFormat::Hermes.as_str().to_string(),
            skip_special_tokens: false,
            max_concurrent_decodes: DEFAULT_MAX_CONCURRENT_DECODES,
            trace: false,
        }
    }
}

impl ToolParserConfig {
    /// Read overrides from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a key lookup, falling back to defaults for
    /// missing keys.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(format) = lookup(ENV_FORMAT) {
            config.format = format.trim().to_string();
        }
        if let Some(value) = lookup(ENV_SKIP_SPECIAL_TOKENS) {
            config.skip_special_tokens = parse_bool(ENV_SKIP_SPECIAL_TOKENS, &value)?;
        }
        if let Some(value) = lookup(ENV_DECODE_WORKERS) {
            config.max_concurrent_decodes = parse_workers(&value)?;
        }
        if let Some(value) = lookup(ENV_TRACE) {
            config.trace = parse_bool(ENV_TRACE, &value)?;
        }

        Ok(config)
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_skip_special_tokens(mut self, skip: bool) -> Self {
        self.skip_special_tokens = skip;
        self
    }

    pub fn with_max_concurrent_decodes(mut self, workers: usize) -> Self {
        self.max_concurrent_decodes = workers;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

fn parse_bool(field: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn parse_workers(value: &str) -> ConfigResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|e: ParseIntError| ConfigError::InvalidValue {
            field: ENV_DECODE_WORKERS.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}
