//! Passthrough parser that returns text unchanged
//!
//! Used for deployments whose model has no tool call convention configured.
//! Decoded text is returned as content and no tool calls are ever detected.

use crate::{
    tokenizer::Tokenizer,
    tool_parser::{traits::ToolParser, types::Extraction},
};

/// Passthrough parser that returns text unchanged with no tool calls
pub struct PassthroughParser {
    tokenizer: Tokenizer,
}

impl PassthroughParser {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }
}

impl ToolParser for PassthroughParser {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    fn extract_from_text(&self, text: &str) -> Extraction {
        (text.to_string(), vec![])
    }

    fn has_tool_markers(&self, _text: &str) -> bool {
        false
    }
}
