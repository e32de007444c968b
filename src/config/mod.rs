pub mod types;
pub mod validation;

pub use types::*;
pub use validation::*;

use crate::{
    tokenizer::{DecodePool, Tokenizer},
    tool_parser::{ParserRegistry, ToolParser},
};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error(transparent)]
    Parser(#[from] crate::tool_parser::ParserError),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validate `config` and build the parser it describes.
///
/// The tokenizer handle is re-bound to a decode pool sized from the config and
/// to the configured special-token policy before the parser is created.
pub fn build_parser(
    config: &ToolParserConfig,
    registry: &ParserRegistry,
    tokenizer: Tokenizer,
) -> ConfigResult<Box<dyn ToolParser>> {
    ConfigValidator::validate(config, registry)?;

    let tokenizer = tokenizer
        .with_decode_pool(DecodePool::new(config.max_concurrent_decodes))
        .with_skip_special_tokens(config.skip_special_tokens);

    let parser = if config.trace {
        registry.get_traced_parser(&config.format, tokenizer)?
    } else {
        registry.get_parser(&config.format, tokenizer)?
    };

    Ok(parser)
}
