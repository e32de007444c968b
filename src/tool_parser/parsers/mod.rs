/// Parser implementations for different model formats
///
/// This module contains concrete parser implementations for the tool call
/// conventions used by different model families.
pub mod passthrough;
pub mod tag_json;

pub use passthrough::PassthroughParser;
pub use tag_json::{TagJsonParser, HERMES_END_TAG, HERMES_START_TAG};
