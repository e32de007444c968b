use anyhow::{anyhow, Context, Result};
use tokenizers::tokenizer::Tokenizer as HfTokenizer;
use tracing::debug;

use super::traits::{
    Decoder, Encoder, Encoding, SpecialTokens, TokenIdType, Tokenizer as TokenizerTrait,
};

const BOS_CANDIDATES: &[&str] = &["<s>", "<|startoftext|>", "<BOS>", "[CLS]"];
const EOS_CANDIDATES: &[&str] = &["</s>", "<|endoftext|>", "<|im_end|>", "<EOS>", "[SEP]"];
const UNK_CANDIDATES: &[&str] = &["<unk>", "<UNK>", "[UNK]"];
const PAD_CANDIDATES: &[&str] = &["<pad>", "<PAD>", "[PAD]"];

/// Tokenizer backed by a HuggingFace `tokenizer.json`.
///
/// Token lookups go through the wrapped tokenizer, so added tokens such as
/// `<tool_call>` resolve like any other vocabulary entry.
pub struct HuggingFaceTokenizer {
    inner: HfTokenizer,
    special_tokens: SpecialTokens,
}

impl HuggingFaceTokenizer {
    pub fn from_file(file_path: &str) -> Result<Self> {
        let inner = HfTokenizer::from_file(file_path)
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("Failed to load tokenizer from {}", file_path))?;

        debug!("Loaded tokenizer from {}", file_path);
        Ok(Self::from_tokenizer(inner))
    }

    /// Load from the contents of a `tokenizer.json`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner = HfTokenizer::from_bytes(bytes)
            .map_err(|e| anyhow!("Failed to parse tokenizer: {}", e))?;
        Ok(Self::from_tokenizer(inner))
    }

    pub fn from_tokenizer(inner: HfTokenizer) -> Self {
        let special_tokens = Self::collect_special_tokens(&inner);
        Self {
            inner,
            special_tokens,
        }
    }

    fn collect_special_tokens(tokenizer: &HfTokenizer) -> SpecialTokens {
        let first_known = |candidates: &[&str]| {
            candidates
                .iter()
                .find(|token| tokenizer.token_to_id(token).is_some())
                .map(|token| token.to_string())
        };

        let mut additional_special_tokens: Vec<String> = tokenizer
            .get_added_tokens_decoder()
            .values()
            .filter(|added| added.special)
            .map(|added| added.content.clone())
            .collect();
        additional_special_tokens.sort();

        SpecialTokens {
            bos_token: first_known(BOS_CANDIDATES),
            eos_token: first_known(EOS_CANDIDATES),
            unk_token: first_known(UNK_CANDIDATES),
            pad_token: first_known(PAD_CANDIDATES),
            additional_special_tokens,
        }
    }
}

impl Encoder for HuggingFaceTokenizer {
    fn encode(&self, input: &str) -> Result<Encoding> {
        let encoding = self
            .inner
            .encode(input, false)
            .map_err(|e| anyhow!("Encoding failed: {}", e))?;
        Ok(Encoding::Hf(Box::new(encoding)))
    }
}

impl Decoder for HuggingFaceTokenizer {
    fn decode(&self, token_ids: &[TokenIdType], skip_special_tokens: bool) -> Result<String> {
        self.inner
            .decode(token_ids, skip_special_tokens)
            .map_err(|e| anyhow!("Decoding {} tokens failed: {}", token_ids.len(), e))
    }
}

impl TokenizerTrait for HuggingFaceTokenizer {
    fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(false)
    }

    fn get_special_tokens(&self) -> &SpecialTokens {
        &self.special_tokens
    }

    fn token_to_id(&self, token: &str) -> Option<TokenIdType> {
        self.inner.token_to_id(token)
    }

    fn id_to_token(&self, id: TokenIdType) -> Option<String> {
        self.inner.id_to_token(id)
    }
}
