use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tool_parser::errors::{ParserError, ParserResult};

/// Content and tool calls recovered from one generation
pub type Extraction = (String, Vec<FunctionCall>);

/// A function invocation requested by the model.
///
/// `arguments` always holds valid, compactly serialized JSON. Characters
/// outside ASCII are kept as-is rather than escaped. The name is whatever
/// string the model produced and is not checked against any tool schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFunctionCall")]
pub struct FunctionCall {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct RawFunctionCall {
    name: String,
    arguments: String,
}

impl FunctionCall {
    /// Build from raw JSON argument text, re-serializing it canonically.
    pub fn new(name: impl Into<String>, arguments: impl AsRef<str>) -> ParserResult<Self> {
        let value: Value = serde_json::from_str(arguments.as_ref())
            .map_err(|e| ParserError::InvalidArguments(e.to_string()))?;
        Ok(Self::from_value(name, &value))
    }

    /// Build from an already parsed arguments value
    pub fn from_value(name: impl Into<String>, arguments: &Value) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Parse the arguments back into a JSON value
    pub fn arguments_value(&self) -> ParserResult<Value> {
        Ok(serde_json::from_str(&self.arguments)?)
    }
}

impl TryFrom<RawFunctionCall> for FunctionCall {
    type Error = ParserError;

    fn try_from(raw: RawFunctionCall) -> Result<Self, Self::Error> {
        FunctionCall::new(raw.name, raw.arguments)
    }
}

/// Serializable form of an [`Extraction`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub content: String,
    pub tool_calls: Vec<FunctionCall>,
}

impl From<Extraction> for ExtractionOutput {
    fn from((content, tool_calls): Extraction) -> Self {
        Self {
            content,
            tool_calls,
        }
    }
}
