// These helpers are shared by several test binaries
#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{anyhow, Result};
use tool_call_extractor::tokenizer::{
    traits::{Decoder, Encoder, Encoding, SpecialTokens, TokenIdType, Tokenizer as TokenizerTrait},
    MockTokenizer, Tokenizer,
};

/// Tokenizer handle backed by the mock tokenizer
pub fn mock_tokenizer() -> Tokenizer {
    Tokenizer::from_arc(Arc::new(MockTokenizer::new()))
}

/// Encode text with the mock tokenizer
pub fn encode(text: &str) -> Vec<TokenIdType> {
    MockTokenizer::new()
        .encode(text)
        .expect("mock encode never fails")
        .token_ids()
        .to_vec()
}

/// Tokenizer whose decode always fails
#[derive(Default)]
pub struct FailingTokenizer {
    special_tokens: SpecialTokens,
}

impl Encoder for FailingTokenizer {
    fn encode(&self, _input: &str) -> Result<Encoding> {
        Ok(Encoding::Sp(vec![]))
    }
}

impl Decoder for FailingTokenizer {
    fn decode(&self, token_ids: &[TokenIdType], _skip_special_tokens: bool) -> Result<String> {
        let count = token_ids.len();
        Err(anyhow!("vocabulary unavailable for {} ids", count))
    }
}

impl TokenizerTrait for FailingTokenizer {
    fn vocab_size(&self) -> usize {
        0
    }

    fn get_special_tokens(&self) -> &SpecialTokens {
        &self.special_tokens
    }

    fn token_to_id(&self, _token: &str) -> Option<TokenIdType> {
        None
    }

    fn id_to_token(&self, _id: TokenIdType) -> Option<String> {
        None
    }
}

/// Mock tokenizer that sleeps before decoding and counts finished decodes
pub struct SlowTokenizer {
    inner: MockTokenizer,
    delay: Duration,
    pub completed: Arc<AtomicUsize>,
}

impl SlowTokenizer {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockTokenizer::new(),
            delay,
            completed: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Encoder for SlowTokenizer {
    fn encode(&self, input: &str) -> Result<Encoding> {
        self.inner.encode(input)
    }
}

impl Decoder for SlowTokenizer {
    fn decode(&self, token_ids: &[TokenIdType], skip_special_tokens: bool) -> Result<String> {
        std::thread::sleep(self.delay);
        let text = self.inner.decode(token_ids, skip_special_tokens);
        self.completed.fetch_add(1, Ordering::SeqCst);
        text
    }
}

impl TokenizerTrait for SlowTokenizer {
    fn vocab_size(&self) -> usize {
        self.inner.vocab_size()
    }

    fn get_special_tokens(&self) -> &SpecialTokens {
        self.inner.get_special_tokens()
    }

    fn token_to_id(&self, token: &str) -> Option<TokenIdType> {
        self.inner.token_to_id(token)
    }

    fn id_to_token(&self, id: TokenIdType) -> Option<String> {
        self.inner.id_to_token(id)
    }
}
