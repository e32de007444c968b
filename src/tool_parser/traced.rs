use async_trait::async_trait;
use tracing::{debug, info_span, warn, Instrument};

use crate::{
    tokenizer::{TokenIdType, Tokenizer},
    tool_parser::{errors::ParserResult, traits::ToolParser, types::Extraction},
};

/// Wraps a parser with a tracing span around every extraction.
///
/// Observes inputs and outputs only; results pass through untouched.
pub struct TracedParser {
    inner: Box<dyn ToolParser>,
}

impl TracedParser {
    pub fn new(inner: Box<dyn ToolParser>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ToolParser for TracedParser {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn tokenizer(&self) -> &Tokenizer {
        self.inner.tokenizer()
    }

    fn extract_from_text(&self, text: &str) -> Extraction {
        let span = info_span!(
            "extract_from_text",
            parser = self.inner.name(),
            text_len = text.len()
        );
        let _guard = span.entered();
        let (content, calls) = self.inner.extract_from_text(text);
        debug!(
            content_len = content.len(),
            num_calls = calls.len(),
            "Extraction finished"
        );
        (content, calls)
    }

    fn has_tool_markers(&self, text: &str) -> bool {
        self.inner.has_tool_markers(text)
    }

    async fn extract_tool_calls(&self, token_ids: &[TokenIdType]) -> ParserResult<Extraction> {
        let span = info_span!(
            "extract_tool_calls",
            parser = self.inner.name(),
            num_tokens = token_ids.len()
        );

        async {
            let result = self.inner.extract_tool_calls(token_ids).await;
            match &result {
                Ok((content, calls)) => debug!(
                    content_len = content.len(),
                    num_calls = calls.len(),
                    "Extraction finished"
                ),
                Err(e) => warn!("Extraction failed: {}", e),
            }
            result
        }
        .instrument(span)
        .await
    }
}
