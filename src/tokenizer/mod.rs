use std::{ops::Deref, sync::Arc};

use anyhow::Result;

pub mod huggingface;
pub mod mock;
pub mod pool;
pub mod traits;

pub use huggingface::HuggingFaceTokenizer;
pub use mock::MockTokenizer;
pub use pool::{DecodePool, DEFAULT_MAX_CONCURRENT_DECODES};
pub use traits::{Decoder, Encoder, Encoding, SpecialTokens, TokenIdType};

/// Shared tokenizer handle handed to tool parsers.
///
/// Wraps any tokenizer implementation together with the pool used to run its
/// decodes off the async runtime. Clones share both.
#[derive(Clone)]
pub struct Tokenizer {
    inner: Arc<dyn traits::Tokenizer>,
    pool: DecodePool,
    skip_special_tokens: bool,
}

impl Tokenizer {
    /// Create a tokenizer from a HuggingFace `tokenizer.json` file
    pub fn from_file(file_path: &str) -> Result<Tokenizer> {
        let tokenizer = HuggingFaceTokenizer::from_file(file_path)?;
        Ok(Tokenizer::from_arc(Arc::new(tokenizer)))
    }

    /// Create a tokenizer from an Arc<dyn Tokenizer>
    pub fn from_arc(tokenizer: Arc<dyn traits::Tokenizer>) -> Self {
        Tokenizer {
            inner: tokenizer,
            pool: DecodePool::default(),
            skip_special_tokens: false,
        }
    }

    /// Use a specific decode pool (e.g. one shared by several tokenizers)
    pub fn with_decode_pool(mut self, pool: DecodePool) -> Self {
        self.pool = pool;
        self
    }

    /// Whether `decode_async` drops special tokens from the decoded text
    pub fn with_skip_special_tokens(mut self, skip: bool) -> Self {
        self.skip_special_tokens = skip;
        self
    }

    pub fn decode_pool(&self) -> &DecodePool {
        &self.pool
    }

    pub fn skip_special_tokens(&self) -> bool {
        self.skip_special_tokens
    }

    /// Direct encode method
    pub fn encode(&self, input: &str) -> Result<Encoding> {
        self.inner.encode(input)
    }

    /// Direct (blocking) decode method
    pub fn decode(&self, token_ids: &[TokenIdType], skip_special_tokens: bool) -> Result<String> {
        self.inner.decode(token_ids, skip_special_tokens)
    }

    /// Decode on the blocking pool and await the result
    pub async fn decode_async(&self, token_ids: &[TokenIdType]) -> Result<String> {
        let tokenizer = Arc::clone(&self.inner);
        let token_ids = token_ids.to_vec();
        let skip_special_tokens = self.skip_special_tokens;

        self.pool
            .run(move || tokenizer.decode(&token_ids, skip_special_tokens))
            .await
    }

    /// Get vocabulary size
    pub fn vocab_size(&self) -> usize {
        self.inner.vocab_size()
    }

    /// Get special tokens
    pub fn get_special_tokens(&self) -> &SpecialTokens {
        self.inner.get_special_tokens()
    }

    /// Convert token string to ID
    pub fn token_to_id(&self, token: &str) -> Option<TokenIdType> {
        self.inner.token_to_id(token)
    }

    /// Convert ID to token string
    pub fn id_to_token(&self, id: TokenIdType) -> Option<String> {
        self.inner.id_to_token(id)
    }
}

impl Deref for Tokenizer {
    type Target = Arc<dyn traits::Tokenizer>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<Arc<dyn traits::Tokenizer>> for Tokenizer {
    fn from(tokenizer: Arc<dyn traits::Tokenizer>) -> Self {
        Tokenizer::from_arc(tokenizer)
    }
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("vocab_size", &self.inner.vocab_size())
            .field("decode_pool", &self.pool)
            .field("skip_special_tokens", &self.skip_special_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock() -> Tokenizer {
        Tokenizer::from_arc(Arc::new(MockTokenizer::new()))
    }

    #[tokio::test]
    async fn test_decode_async_matches_blocking_decode() {
        let tokenizer = mock();
        let ids = tokenizer.encode("Hello <tool_call>").unwrap();
        let blocking = tokenizer.decode(ids.token_ids(), false).unwrap();
        let offloaded = tokenizer.decode_async(ids.token_ids()).await.unwrap();
        assert_eq!(blocking, offloaded);
    }

    #[tokio::test]
    async fn test_decode_async_honors_skip_special_tokens() {
        let tokenizer = mock().with_skip_special_tokens(true);
        let ids = tokenizer.encode("done<|im_end|>").unwrap();
        let text = tokenizer.decode_async(ids.token_ids()).await.unwrap();
        assert_eq!(text, "done");
    }

    #[tokio::test]
    async fn test_decode_async_empty_input() {
        let tokenizer = mock();
        assert_eq!(tokenizer.decode_async(&[]).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_clones_share_decode_pool() {
        let pool = DecodePool::new(3);
        let tokenizer = mock().with_decode_pool(pool.clone());
        let clone = tokenizer.clone();
        assert_eq!(clone.decode_pool().capacity(), 3);
        assert_eq!(pool.available(), 3);
    }
}
