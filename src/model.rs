//! The tokenizer façade tying segmentation, vocabulary, training and persistence together.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::{IngestConfig, TrainerConfig};
use crate::error::Result;
use crate::metrics::TrainingMetrics;
use crate::pretokenizer::{pre_tokenize, TokenSpan};
use crate::serialization::{load_record, save_record, TokenizerRecord};
use crate::special_tokens::UNK_ID;
use crate::trainer::{Trainer, TrainerArtifacts};
use crate::vocab::{VocabStats, Vocabulary};

/// Token identifier used throughout the crate.
pub type TokenId = u32;

/// Result of tokenizing one string.
///
/// `tokens`, `ids` and `spans` are index-aligned and always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encoding {
    /// Token texts in source order.
    pub tokens: Vec<String>,
    /// Vocabulary ids; out-of-vocabulary tokens map to the unknown id.
    pub ids: Vec<TokenId>,
    /// Source spans of each token.
    pub spans: Vec<TokenSpan>,
}

impl Encoding {
    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no token was recognised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Removes all tokens, ids and spans.
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.ids.clear();
        self.spans.clear();
    }

    fn push(&mut self, span: TokenSpan, id: TokenId) {
        self.tokens.push(span.token.clone());
        self.ids.push(id);
        self.spans.push(span);
    }
}

/// Frequency-trained tokenizer for SLICES strings.
///
/// A fresh tokenizer knows only the six special tokens, so every element, number and bond
/// descriptor encodes to the unknown id until [`SlicesTokenizer::train`] or
/// [`SlicesTokenizer::load`] populates the vocabulary. The tokenizer is not internally
/// synchronised; training takes `&mut self`.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicesTokenizer {
    vocab: Vocabulary,
    config: TrainerConfig,
}

impl SlicesTokenizer {
    /// Creates an untrained tokenizer with [`TrainerConfig::default`].
    pub fn new() -> Self {
        Self {
            vocab: Vocabulary::new(),
            config: TrainerConfig::default(),
        }
    }

    /// Creates an untrained tokenizer with a validated configuration.
    pub fn with_config(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            vocab: Vocabulary::new(),
            config,
        })
    }

    /// Builds a tokenizer around an already trained vocabulary.
    pub fn from_artifacts(artifacts: TrainerArtifacts, config: TrainerConfig) -> Self {
        Self {
            vocab: artifacts.vocab,
            config,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Splits `text` into token spans; see [`crate::pretokenizer`].
    #[must_use]
    pub fn pre_tokenize(&self, text: &str) -> Vec<TokenSpan> {
        pre_tokenize(text)
    }

    /// Retrains from `corpus` with the given capacity, replacing the vocabulary.
    ///
    /// The vocabulary is only replaced when training succeeds.
    pub fn train<I, S>(&mut self, corpus: I, vocab_size: usize) -> Result<TrainingMetrics>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let config = TrainerConfig {
            vocab_size,
            ..self.config.clone()
        };
        let artifacts = Trainer::new(config.clone()).train(corpus)?;
        self.vocab = artifacts.vocab;
        self.config = config;
        Ok(artifacts.metrics)
    }

    /// Retrains from newline-delimited text files.
    pub fn train_from_paths<P: AsRef<Path>>(
        &mut self,
        inputs: &[P],
        ingest: &IngestConfig,
        vocab_size: usize,
    ) -> Result<TrainingMetrics> {
        let config = TrainerConfig {
            vocab_size,
            ..self.config.clone()
        };
        let artifacts = Trainer::new(config.clone()).train_from_paths(inputs, ingest)?;
        self.vocab = artifacts.vocab;
        self.config = config;
        Ok(artifacts.metrics)
    }

    /// Tokenizes `text`. Never fails: unknown tokens receive the unknown id.
    pub fn encode(&self, text: &str) -> Encoding {
        let spans = pre_tokenize(text);
        let mut encoding = Encoding {
            tokens: Vec::with_capacity(spans.len()),
            ids: Vec::with_capacity(spans.len()),
            spans: Vec::with_capacity(spans.len()),
        };
        for span in spans {
            let id = self.token_to_id(&span.token);
            encoding.push(span, id);
        }
        encoding
    }

    /// Joins the tokens for `ids` with single spaces; unknown ids decode to the placeholder.
    #[must_use]
    pub fn decode(&self, ids: &[TokenId]) -> String {
        ids.iter()
            .map(|&id| self.id_to_token(id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns the id of `token`, or the unknown id when it is not in the vocabulary.
    #[must_use]
    pub fn token_to_id(&self, token: &str) -> TokenId {
        self.vocab.token_to_id(token).unwrap_or(UNK_ID)
    }

    /// Returns the token for `id`, or the unknown placeholder when `id` is not assigned.
    #[must_use]
    pub fn id_to_token(&self, id: TokenId) -> &str {
        self.vocab
            .id_to_token(id)
            .unwrap_or(self.config.unk_token.as_str())
    }

    /// Number of tokens in the vocabulary, special tokens included.
    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Read-only view of the vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Per-class vocabulary statistics.
    #[must_use]
    pub fn stats(&self) -> VocabStats {
        self.vocab.stats()
    }

    /// Captures the tokenizer as a persistable record.
    #[must_use]
    pub fn to_record(&self) -> TokenizerRecord {
        TokenizerRecord::from_parts(&self.vocab, &self.config)
    }

    /// Serialises the tokenizer to a JSON string.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        self.to_record().to_json(pretty)
    }

    /// Reconstructs a tokenizer from a JSON record.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_record(TokenizerRecord::from_json(json)?)
    }

    /// Reconstructs a tokenizer from an already parsed record.
    pub fn from_record(record: TokenizerRecord) -> Result<Self> {
        let mut tokenizer = Self::new();
        tokenizer.apply_record(record)?;
        Ok(tokenizer)
    }

    /// Writes the tokenizer to `path` as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_record(&self.to_record(), path.as_ref())?;
        info!("tokenizer saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Replaces the vocabulary and configuration with the record stored at `path`.
    ///
    /// On any error the tokenizer is left untouched.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let record = load_record(path.as_ref())?;
        self.apply_record(record)?;
        info!(
            "tokenizer loaded from {} ({} tokens)",
            path.as_ref().display(),
            self.vocab.len()
        );
        Ok(())
    }

    /// Loads a tokenizer from `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut tokenizer = Self::new();
        tokenizer.load(path)?;
        Ok(tokenizer)
    }

    fn apply_record(&mut self, record: TokenizerRecord) -> Result<()> {
        let (vocab, persisted) = record.into_parts()?;
        self.vocab = vocab;
        self.config = TrainerConfig {
            vocab_size: persisted.vocab_size,
            unk_token: persisted.unk_token,
            ..self.config.clone()
        };
        Ok(())
    }
}

impl Default for SlicesTokenizer {
    fn default() -> Self {
        Self::new()
    }
}
