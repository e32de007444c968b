// Registry of tool call formats and the factory that binds them to a tokenizer.

use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::{
    tokenizer::Tokenizer,
    tool_parser::{
        errors::{ParserError, ParserResult},
        parsers::{PassthroughParser, TagJsonParser},
        traced::TracedParser,
        traits::ToolParser,
    },
};

/// Type alias for parser creator functions.
pub type ParserCreator = Arc<dyn Fn(Tokenizer) -> Box<dyn ToolParser> + Send + Sync>;

/// Built-in tool call formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserFormat {
    /// `<tool_call>{"name": ..., "arguments": ...}</tool_call>`
    Hermes,
    /// No tool call extraction
    Passthrough,
}

impl ParserFormat {
    pub const ALL: [ParserFormat; 2] = [ParserFormat::Hermes, ParserFormat::Passthrough];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParserFormat::Hermes => "hermes",
            ParserFormat::Passthrough => "passthrough",
        }
    }

    /// Construct a parser of this format bound to `tokenizer`
    pub fn create(self, tokenizer: Tokenizer) -> Box<dyn ToolParser> {
        match self {
            ParserFormat::Hermes => Box::new(TagJsonParser::hermes(tokenizer)),
            ParserFormat::Passthrough => Box::new(PassthroughParser::new(tokenizer)),
        }
    }
}

impl FromStr for ParserFormat {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParserFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| ParserError::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for ParserFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static GLOBAL_REGISTRY: Lazy<ParserRegistry> = Lazy::new(ParserRegistry::with_builtin_parsers);

/// Name-keyed table of parser constructors.
///
/// Entries are only ever added. Registering a name twice is an error and
/// leaves the first registration in place.
#[derive(Clone)]
pub struct ParserRegistry {
    creators: HashMap<String, ParserCreator>,
}

impl ParserRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            creators: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in format.
    pub fn with_builtin_parsers() -> Self {
        let mut registry = Self::new();
        for format in ParserFormat::ALL {
            let creator: ParserCreator = Arc::new(move |tokenizer| format.create(tokenizer));
            registry.creators.insert(format.as_str().into(), creator);
        }
        registry
    }

    /// Process-wide registry of the built-in formats
    pub fn global() -> &'static ParserRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register a parser creator under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, creator: F) -> ParserResult<()>
    where
        F: Fn(Tokenizer) -> Box<dyn ToolParser> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.creators.contains_key(&name) {
            return Err(ParserError::DuplicateParser(name));
        }

        debug!("Registering tool parser '{}'", name);
        self.creators.insert(name, Arc::new(creator));
        Ok(())
    }

    /// Create a parser for `name` bound to `tokenizer`.
    pub fn get_parser(
        &self,
        name: &str,
        tokenizer: Tokenizer,
    ) -> ParserResult<Box<dyn ToolParser>> {
        let creator = self
            .creators
            .get(name)
            .ok_or_else(|| ParserError::UnknownFormat(name.to_string()))?;
        Ok(creator(tokenizer))
    }

    /// Same as [`get_parser`](Self::get_parser), wrapped in a [`TracedParser`].
    pub fn get_traced_parser(
        &self,
        name: &str,
        tokenizer: Tokenizer,
    ) -> ParserResult<Box<dyn ToolParser>> {
        let parser = self.get_parser(name, tokenizer)?;
        Ok(Box::new(TracedParser::new(parser)))
    }

    /// Check if a parser with the given name is registered.
    pub fn has_parser(&self, name: &str) -> bool {
        self.creators.contains_key(name)
    }

    /// List all registered parser names, sorted.
    pub fn list_parsers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.creators.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("parsers", &self.list_parsers())
            .finish()
    }
}
