use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::{
    tokenizer::Tokenizer,
    tool_parser::{
        errors::{ParserError, ParserResult},
        traits::ToolParser,
        types::{Extraction, FunctionCall},
    },
};

pub const HERMES_START_TAG: &str = "<tool_call>";
pub const HERMES_END_TAG: &str = "</tool_call>";

/// Static regex for extracting Hermes tool call regions
static HERMES_TOOL_CALL_EXTRACTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<tool_call>(.*?)</tool_call>").expect("Valid regex pattern")
});

/// Parser for tool calls wrapped in a literal start/end tag pair
///
/// Handles the Hermes format (also emitted by Qwen 2.5/3):
/// `<tool_call>{"name": "func", "arguments": {...}}</tool_call>`
///
/// Features:
/// - Any number of regions, matched non-greedily left to right
/// - Regions may span lines and carry pretty-printed JSON
/// - A malformed region is logged and skipped without affecting the others
/// - Every matched region is cut from the returned content
pub struct TagJsonParser {
    name: &'static str,
    tokenizer: Tokenizer,
    start_tag: String,
    end_tag: String,
    extractor: Regex,
}

impl TagJsonParser {
    /// Parser for an arbitrary tag pair
    pub fn new(
        name: &'static str,
        start_tag: impl Into<String>,
        end_tag: impl Into<String>,
        tokenizer: Tokenizer,
    ) -> ParserResult<Self> {
        let start_tag = start_tag.into();
        let end_tag = end_tag.into();
        if start_tag.is_empty() || end_tag.is_empty() {
            return Err(ParserError::ParsingFailed(
                "Tool call tags must not be empty".to_string(),
            ));
        }

        let pattern = format!(
            "(?s){}(.*?){}",
            regex::escape(&start_tag),
            regex::escape(&end_tag)
        );
        let extractor = Regex::new(&pattern)?;

        Ok(Self {
            name,
            tokenizer,
            start_tag,
            end_tag,
            extractor,
        })
    }

    /// Hermes format: `<tool_call>` / `</tool_call>`
    pub fn hermes(tokenizer: Tokenizer) -> Self {
        Self {
            name: "hermes",
            tokenizer,
            start_tag: HERMES_START_TAG.to_string(),
            end_tag: HERMES_END_TAG.to_string(),
            extractor: HERMES_TOOL_CALL_EXTRACTOR.clone(),
        }
    }

    /// Parse a single region payload into a FunctionCall
    fn parse_region(payload: &str) -> ParserResult<FunctionCall> {
        let value: Value = serde_json::from_str(payload)?;

        let obj = value.as_object().ok_or_else(|| {
            ParserError::ParsingFailed(format!("Expected a JSON object, got: {}", value))
        })?;

        let name = obj
            .get("name")
            .ok_or(ParserError::MissingField("name"))?
            .as_str()
            .ok_or_else(|| {
                ParserError::ParsingFailed("Function name must be a string".to_string())
            })?;

        let arguments = obj
            .get("arguments")
            .ok_or(ParserError::MissingField("arguments"))?;

        Ok(FunctionCall::from_value(name, arguments))
    }
}

impl ToolParser for TagJsonParser {
    fn name(&self) -> &str {
        self.name
    }

    fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    fn extract_from_text(&self, text: &str) -> Extraction {
        if !self.has_tool_markers(text) {
            return (text.to_string(), vec![]);
        }

        let mut calls = Vec::new();
        let mut content = String::with_capacity(text.len());
        let mut last_end = 0;

        for (index, captures) in self.extractor.captures_iter(text).enumerate() {
            let (Some(span), Some(payload)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            content.push_str(&text[last_end..span.start()]);
            last_end = span.end();

            match Self::parse_region(payload.as_str()) {
                Ok(call) => calls.push(call),
                Err(e) => {
                    tracing::error!(
                        parser = self.name,
                        region = index,
                        "Failed to decode tool call: {}",
                        e
                    );
                }
            }
        }
        content.push_str(&text[last_end..]);

        tracing::debug!(
            parser = self.name,
            num_calls = calls.len(),
            "Extracted tool calls"
        );
        (content, calls)
    }

    fn has_tool_markers(&self, text: &str) -> bool {
        text.contains(&self.start_tag) && text.contains(&self.end_tag)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::tokenizer::MockTokenizer;

    fn parser() -> TagJsonParser {
        TagJsonParser::hermes(Tokenizer::from_arc(Arc::new(MockTokenizer::new())))
    }

    #[test]
    fn test_parse_region_requires_object() {
        let err = TagJsonParser::parse_region(r#"["get_weather"]"#).unwrap_err();
        assert!(matches!(err, ParserError::ParsingFailed(_)));
    }

    #[test]
    fn test_parse_region_missing_fields() {
        let err = TagJsonParser::parse_region(r#"{"arguments": {}}"#).unwrap_err();
        assert!(matches!(err, ParserError::MissingField("name")));

        let err = TagJsonParser::parse_region(r#"{"name": "f"}"#).unwrap_err();
        assert!(matches!(err, ParserError::MissingField("arguments")));
    }

    #[test]
    fn test_parse_region_non_string_name() {
        let err = TagJsonParser::parse_region(r#"{"name": 42, "arguments": {}}"#).unwrap_err();
        assert!(matches!(err, ParserError::ParsingFailed(_)));
    }

    #[test]
    fn test_parse_region_accepts_any_arguments_value() {
        let call = TagJsonParser::parse_region(r#" {"name": "echo", "arguments": "hi"} "#).unwrap();
        assert_eq!(call.arguments(), r#""hi""#);

        let call = TagJsonParser::parse_region(r#"{"name": "sum", "arguments": [1, 2]}"#).unwrap();
        assert_eq!(call.arguments_value().unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_only_start_tag_short_circuits() {
        let text = "<tool_call>{\"name\": \"f\", \"arguments\": {}}";
        let (content, calls) = parser().extract_from_text(text);
        assert_eq!(content, text);
        assert!(calls.is_empty());
    }

    #[test]
    fn test_content_keeps_surrounding_whitespace() {
        let text = "  before\n<tool_call>{\"name\":\"f\",\"arguments\":{}}</tool_call>\n after  ";
        let (content, calls) = parser().extract_from_text(text);
        assert_eq!(content, "  before\n\n after  ");
        assert_eq!(calls.len(), 1);
    }

    #[test]
    fn test_custom_tags_are_escaped() {
        let tokenizer = Tokenizer::from_arc(Arc::new(MockTokenizer::new()));
        let parser = TagJsonParser::new("bracket", "[[call]]", "[[/call]]", tokenizer).unwrap();
        let text = r#"x[[call]]{"name": "f", "arguments": {"k": 1}}[[/call]]y"#;

        let (content, calls) = parser.extract_from_text(text);
        assert_eq!(content, "xy");
        assert_eq!(calls[0].name(), "f");
        assert_eq!(parser.name(), "bracket");
    }

    #[test]
    fn test_empty_tags_rejected() {
        let tokenizer = Tokenizer::from_arc(Arc::new(MockTokenizer::new()));
        assert!(TagJsonParser::new("bad", "", "</x>", tokenizer).is_err());
    }
}
