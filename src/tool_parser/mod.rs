/// Tool parser module for handling function/tool calls in model outputs
///
/// This module provides infrastructure for extracting tool calls from the
/// token ids of a finished generation, in the format used by a given model.
// Core modules
pub mod errors;
pub mod registry;
pub mod traced;
pub mod traits;
pub mod types;

// Parser implementations
pub mod parsers;

// Re-export types used outside this module
pub use errors::{ParserError, ParserResult};
pub use parsers::{PassthroughParser, TagJsonParser};
pub use registry::{ParserCreator, ParserFormat, ParserRegistry};
pub use traced::TracedParser;
pub use traits::ToolParser;
pub use types::{Extraction, ExtractionOutput, FunctionCall};
