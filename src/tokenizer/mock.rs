//! Mock tokenizer implementation for testing
//!
//! Every token id below `0x110000` is the Unicode scalar value with the same
//! number, so `"hi"` encodes to `[104, 105]`. A handful of chat-format markers
//! are registered as added tokens above that range, the same way real
//! tokenizers keep `<tool_call>` as a single special token.

use std::collections::HashMap;

use anyhow::{anyhow, Result};

use super::traits::{
    Decoder, Encoder, Encoding, SpecialTokens, TokenIdType, Tokenizer as TokenizerTrait,
};

/// First id used for added (non-character) tokens
pub const ADDED_TOKEN_BASE: TokenIdType = 0x110000;

const DEFAULT_ADDED_TOKENS: &[(&str, bool)] = &[
    ("<tool_call>", false),
    ("</tool_call>", false),
    ("<|im_start|>", true),
    ("<|im_end|>", true),
    ("<|endoftext|>", true),
];

struct AddedToken {
    content: String,
    special: bool,
}

/// Mock tokenizer for testing purposes
pub struct MockTokenizer {
    added: Vec<AddedToken>,
    added_ids: HashMap<String, TokenIdType>,
    special_tokens: SpecialTokens,
}

impl Default for MockTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTokenizer {
    pub fn new() -> Self {
        let mut tokenizer = Self {
            added: Vec::new(),
            added_ids: HashMap::new(),
            special_tokens: SpecialTokens {
                eos_token: Some("<|endoftext|>".to_string()),
                pad_token: Some("<|endoftext|>".to_string()),
                ..Default::default()
            },
        };

        for (content, special) in DEFAULT_ADDED_TOKENS {
            tokenizer.add_token(content, *special);
        }

        tokenizer
    }

    /// Register an extra added token and return its id
    pub fn add_token(&mut self, content: &str, special: bool) -> TokenIdType {
        if let Some(&id) = self.added_ids.get(content) {
            return id;
        }

        let id = ADDED_TOKEN_BASE + self.added.len() as TokenIdType;
        self.added.push(AddedToken {
            content: content.to_string(),
            special,
        });
        self.added_ids.insert(content.to_string(), id);
        if special {
            self.special_tokens
                .additional_special_tokens
                .push(content.to_string());
        }
        id
    }

    fn added_token(&self, id: TokenIdType) -> Option<&AddedToken> {
        id.checked_sub(ADDED_TOKEN_BASE)
            .and_then(|idx| self.added.get(idx as usize))
    }

    /// Longest added token that `input` starts with
    fn match_added(&self, input: &str) -> Option<(&str, TokenIdType)> {
        self.added_ids
            .iter()
            .filter(|(content, _)| input.starts_with(content.as_str()))
            .max_by_key(|(content, _)| content.len())
            .map(|(content, &id)| (content.as_str(), id))
    }
}

impl Encoder for MockTokenizer {
    fn encode(&self, input: &str) -> Result<Encoding> {
        let mut ids = Vec::with_capacity(input.len());
        let mut rest = input;

        while let Some(ch) = rest.chars().next() {
            if let Some((content, id)) = self.match_added(rest) {
                ids.push(id);
                rest = &rest[content.len()..];
            } else {
                ids.push(ch as TokenIdType);
                rest = &rest[ch.len_utf8()..];
            }
        }

        Ok(Encoding::Sp(ids))
    }
}

impl Decoder for MockTokenizer {
    fn decode(&self, token_ids: &[TokenIdType], skip_special_tokens: bool) -> Result<String> {
        let mut text = String::with_capacity(token_ids.len());

        for &id in token_ids {
            if let Some(token) = self.added_token(id) {
                if !(skip_special_tokens && token.special) {
                    text.push_str(&token.content);
                }
                continue;
            }

            let ch = char::from_u32(id).ok_or_else(|| anyhow!("Unknown token id: {}", id))?;
            text.push(ch);
        }

        Ok(text)
    }
}

impl TokenizerTrait for MockTokenizer {
    fn vocab_size(&self) -> usize {
        ADDED_TOKEN_BASE as usize + self.added.len()
    }

    fn get_special_tokens(&self) -> &SpecialTokens {
        &self.special_tokens
    }

    fn token_to_id(&self, token: &str) -> Option<TokenIdType> {
        if let Some(&id) = self.added_ids.get(token) {
            return Some(id);
        }

        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch as TokenIdType),
            _ => None,
        }
    }

    fn id_to_token(&self, id: TokenIdType) -> Option<String> {
        match self.added_token(id) {
            Some(token) => Some(token.content.clone()),
            None => char::from_u32(id).map(String::from),
        }
    }
}
