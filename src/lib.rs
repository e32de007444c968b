pub mod config;
pub mod logging;
pub mod tokenizer;
pub mod tool_parser;

pub use config::{build_parser, ConfigError, ConfigResult, ConfigValidator, ToolParserConfig};
pub use tokenizer::Tokenizer;
pub use tool_parser::{
    FunctionCall, ParserError, ParserFormat, ParserRegistry, ParserResult, ToolParser,
};
