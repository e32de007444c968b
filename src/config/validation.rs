use super::*;
use crate::tool_parser::ParserRegistry;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &ToolParserConfig, registry: &ParserRegistry) -> ConfigResult<()> {
        if config.format.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "format".to_string(),
            });
        }

        if !registry.has_parser(&config.format) {
            return Err(ConfigError::InvalidValue {
                field: "format".to_string(),
                value: config.format.clone(),
                reason: format!(
                    "unknown tool parser, expected one of: {}",
                    registry.list_parsers().join(", ")
                ),
            });
        }

        if config.max_concurrent_decodes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrent_decodes".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
