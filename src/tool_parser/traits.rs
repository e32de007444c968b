use async_trait::async_trait;

use crate::{
    tokenizer::{TokenIdType, Tokenizer},
    tool_parser::{
        errors::{ParserError, ParserResult},
        types::Extraction,
    },
};

/// Core trait for all tool parsers
#[async_trait]
pub trait ToolParser: Send + Sync {
    /// Registry key of this parser's format
    fn name(&self) -> &str;

    /// Tokenizer used to turn token ids into text
    fn tokenizer(&self) -> &Tokenizer;

    /// Split decoded text into (remaining_content, tool_calls).
    ///
    /// Never fails: regions that cannot be parsed are logged and skipped.
    fn extract_from_text(&self, text: &str) -> Extraction;

    /// Check if text contains tool calls in this parser's format
    fn has_tool_markers(&self, text: &str) -> bool;

    /// Decode one complete generation and extract its tool calls.
    ///
    /// Decoding runs on the tokenizer's blocking pool; extraction runs inline
    /// once the text is available. Only decode failures are returned as errors.
    async fn extract_tool_calls(&self, token_ids: &[TokenIdType]) -> ParserResult<Extraction> {
        let text = self
            .tokenizer()
            .decode_async(token_ids)
            .await
            .map_err(|e| ParserError::Decode(format!("{:#}", e)))?;

        Ok(self.extract_from_text(&text))
    }
}
