//! Configuration builders controlling training and corpus ingestion.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlicesError};
use crate::special_tokens::{SPECIAL_TOKEN_COUNT, UNK_TOKEN};

/// Configuration for vocabulary training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainerConfig {
    /// Maximum vocabulary size, including the six reserved special tokens.
    pub vocab_size: usize,
    /// Placeholder emitted when decoding an id that is not in the vocabulary.
    pub unk_token: String,
    /// Enables progress and summary logging through the `log` facade.
    pub show_progress: bool,
    /// Number of most frequent tokens reported in the training summary.
    pub report_top_tokens: usize,
}

impl TrainerConfig {
    /// Returns a builder initialised with [`TrainerConfig::default`].
    #[must_use]
    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::default()
    }

    /// Validates the invariants required for training.
    pub fn validate(&self) -> Result<()> {
        if self.vocab_size < SPECIAL_TOKEN_COUNT {
            return Err(SlicesError::InvalidConfig(format!(
                "vocab_size ({}) must be at least the {SPECIAL_TOKEN_COUNT} reserved special tokens",
                self.vocab_size
            )));
        }
        if self.vocab_size > u32::MAX as usize {
            return Err(SlicesError::InvalidConfig(format!(
                "vocab_size ({}) exceeds the maximum representable TokenId",
                self.vocab_size
            )));
        }
        if self.unk_token.is_empty() {
            return Err(SlicesError::InvalidConfig(
                "unk_token must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            vocab_size: 1000,
            unk_token: UNK_TOKEN.to_string(),
            show_progress: true,
            report_top_tokens: 10,
        }
    }
}

/// Builder for [`TrainerConfig`].
#[derive(Debug, Default, Clone)]
pub struct TrainerBuilder {
    cfg: TrainerConfig,
}

impl TrainerBuilder {
    /// Sets the vocabulary capacity (including special tokens).
    #[must_use]
    pub fn vocab_size(mut self, value: usize) -> Self {
        self.cfg.vocab_size = value;
        self
    }

    /// Overrides the unknown-token placeholder.
    #[must_use]
    pub fn unk_token<S: Into<String>>(mut self, value: S) -> Self {
        self.cfg.unk_token = value.into();
        self
    }

    /// Enables or disables progress logging.
    #[must_use]
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.cfg.show_progress = enabled;
        self
    }

    /// Sets how many of the most frequent tokens are reported after training.
    #[must_use]
    pub fn report_top_tokens(mut self, count: usize) -> Self {
        self.cfg.report_top_tokens = count;
        self
    }

    /// Finalises the builder, returning a validated [`TrainerConfig`].
    pub fn build(self) -> Result<TrainerConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

/// Configuration controlling how text corpora are discovered on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestConfig {
    /// Enables recursive directory traversal.
    pub recursive: bool,
    /// Follows symlinks encountered during traversal.
    pub follow_symlinks: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_symlinks: false,
        }
    }
}

impl IngestConfig {
    /// Returns a builder initialised with [`IngestConfig::default`].
    #[must_use]
    pub fn builder() -> IngestBuilder {
        IngestBuilder::default()
    }
}

/// Builder for [`IngestConfig`].
#[derive(Debug, Default, Clone)]
pub struct IngestBuilder {
    cfg: IngestConfig,
}

impl IngestBuilder {
    /// Enables or disables recursive directory traversal.
    #[must_use]
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.cfg.recursive = enabled;
        self
    }

    /// Enables or disables following of symlinks when traversing directories.
    #[must_use]
    pub fn follow_symlinks(mut self, enabled: bool) -> Self {
        self.cfg.follow_symlinks = enabled;
        self
    }

    /// Finalises the builder, returning the [`IngestConfig`].
    pub fn build(self) -> IngestConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let cfg = TrainerConfig::builder()
            .vocab_size(64)
            .unk_token("<unk>")
            .show_progress(false)
            .report_top_tokens(3)
            .build()
            .expect("config should be valid");
        assert_eq!(cfg.vocab_size, 64);
        assert_eq!(cfg.unk_token, "<unk>");
        assert!(!cfg.show_progress);
        assert_eq!(cfg.report_top_tokens, 3);
    }

    #[test]
    fn validate_rejects_capacity_below_special_tokens() {
        let err = TrainerConfig::builder()
            .vocab_size(5)
            .build()
            .expect_err("validation should fail");
        assert!(matches!(
            err,
            SlicesError::InvalidConfig(message) if message.contains("reserved special tokens")
        ));
    }

    #[test]
    fn validate_accepts_specials_only_capacity() {
        let cfg = TrainerConfig {
            vocab_size: SPECIAL_TOKEN_COUNT,
            ..TrainerConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_unk_token() {
        let cfg = TrainerConfig {
            unk_token: String::new(),
            ..TrainerConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SlicesError::InvalidConfig(_))
        ));
    }

    #[test]
    fn ingest_builder_overrides_defaults() {
        let cfg = IngestConfig::builder()
            .recursive(false)
            .follow_symlinks(true)
            .build();
        assert!(!cfg.recursive);
        assert!(cfg.follow_symlinks);
    }
}
