//! The persisted tokenizer record.
//!
//! A record is a single JSON object:
//!
//! ```json
//! {
//!   "model_type": "SLICESTokenizer",
//!   "vocab_size": 1000,
//!   "unk_token": "[UNK]",
//!   "special_tokens": { "unk_token": "[UNK]", "pad_token": "[PAD]", ... },
//!   "vocab": { "--o": 6, "[CLS]": 2, ... },
//!   "pattern": "[A-Z][a-z]?|\\d+|[+\\-o]{3}"
//! }
//! ```
//!
//! `vocab_size`, `unk_token` and `vocab` are required. `pattern` is descriptive metadata only:
//! the segmentation rules are fixed, so a differing stored pattern is reported and ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::TrainerConfig;
use crate::error::{Result, SlicesError};
use crate::model::TokenId;
use crate::pretokenizer::PATTERN;
use crate::special_tokens::SpecialTokens;
use crate::vocab::Vocabulary;

/// Model tag written into every record.
pub const MODEL_TYPE: &str = "SLICESTokenizer";

fn default_model_type() -> String {
    MODEL_TYPE.to_string()
}

fn default_pattern() -> String {
    PATTERN.to_string()
}

/// Serialised form of a vocabulary and its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerRecord {
    /// Constant model tag.
    #[serde(default = "default_model_type")]
    pub model_type: String,
    /// Vocabulary capacity used for training.
    pub vocab_size: usize,
    /// Unknown-token placeholder.
    pub unk_token: String,
    /// Special token texts by role.
    #[serde(default)]
    pub special_tokens: SpecialTokens,
    /// Full token-to-id mapping, special tokens included, sorted by token text.
    pub vocab: BTreeMap<String, TokenId>,
    /// Description of the segmentation rules.
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl TokenizerRecord {
    /// Captures a vocabulary and its configuration.
    #[must_use]
    pub fn from_parts(vocab: &Vocabulary, cfg: &TrainerConfig) -> Self {
        Self {
            model_type: MODEL_TYPE.to_string(),
            vocab_size: cfg.vocab_size,
            unk_token: cfg.unk_token.clone(),
            special_tokens: SpecialTokens::with_unk(&cfg.unk_token),
            vocab: vocab.to_map(),
            pattern: PATTERN.to_string(),
        }
    }

    /// Describes every optional field that disagrees with the built-in model.
    ///
    /// Such differences never prevent loading: the model tag, the special token texts and the
    /// segmentation rules are fixed, so the stored values are reported and ignored.
    #[must_use]
    pub fn advisories(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.model_type != MODEL_TYPE {
            notes.push(format!(
                "record model_type {:?} differs from {MODEL_TYPE:?}; loading anyway",
                self.model_type
            ));
        }
        if self.special_tokens != SpecialTokens::with_unk(&self.unk_token) {
            notes.push(format!(
                "record special_tokens {:?} differ from the fixed special tokens; \
                 the stored texts are ignored",
                self.special_tokens
            ));
        }
        if self.pattern != PATTERN {
            notes.push(format!(
                "record pattern {:?} differs from the built-in rules {PATTERN:?}; \
                 the stored pattern is ignored",
                self.pattern
            ));
        }
        notes
    }

    /// Validates the record and rebuilds the vocabulary and configuration it describes.
    ///
    /// Only `vocab_size` and `unk_token` are persisted; the remaining configuration fields
    /// take their defaults.
    pub fn into_parts(self) -> Result<(Vocabulary, TrainerConfig)> {
        for note in self.advisories() {
            warn!("{note}");
        }

        let cfg = TrainerConfig {
            vocab_size: self.vocab_size,
            unk_token: self.unk_token,
            ..TrainerConfig::default()
        };
        cfg.validate()
            .map_err(|err| SlicesError::InvalidRecord(err.to_string()))?;

        if self.vocab.len() > cfg.vocab_size {
            return Err(SlicesError::InvalidRecord(format!(
                "vocab holds {} entries but vocab_size is {}",
                self.vocab.len(),
                cfg.vocab_size
            )));
        }
        let vocab = Vocabulary::from_entries(self.vocab)?;
        Ok((vocab, cfg))
    }

    /// Renders the record as JSON; `pretty` uses two-space indentation.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Parses a record, reporting any structural problem as [`SlicesError::InvalidRecord`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| SlicesError::record(&err))
    }
}

/// Writes `record` to `path` as pretty-printed JSON.
///
/// The whole document is rendered before the file is opened.
pub fn save_record<P: AsRef<Path>>(record: &TokenizerRecord, path: P) -> Result<()> {
    let json = record.to_json(true)?;
    fs::write(path.as_ref(), json)
        .map_err(|err| SlicesError::io(err, Some(path.as_ref().to_path_buf())))
}

/// Reads and parses a record from `path`.
pub fn load_record<P: AsRef<Path>>(path: P) -> Result<TokenizerRecord> {
    let json = fs::read_to_string(path.as_ref())
        .map_err(|err| SlicesError::io(err, Some(path.as_ref().to_path_buf())))?;
    TokenizerRecord::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::tempdir;

    fn sample_record() -> TokenizerRecord {
        let mut vocab = Vocabulary::new();
        vocab.insert("Ga");
        vocab.insert("--o");
        TokenizerRecord::from_parts(&vocab, &TrainerConfig::default())
    }

    fn sample_value() -> Value {
        serde_json::from_str(&sample_record().to_json(false).unwrap()).unwrap()
    }

    #[test]
    fn record_has_expected_fields() {
        let value = sample_value();
        assert_eq!(value["model_type"], "SLICESTokenizer");
        assert_eq!(value["vocab_size"], 1000);
        assert_eq!(value["unk_token"], "[UNK]");
        assert_eq!(value["special_tokens"]["mask_token"], "[MASK]");
        assert_eq!(value["vocab"]["--o"], 7);
        assert_eq!(value["vocab"]["[EOS]"], 5);
        assert_eq!(value["pattern"], PATTERN);
    }

    #[test]
    fn pretty_output_is_indented_and_stable() {
        let record = sample_record();
        let first = record.to_json(true).unwrap();
        assert!(first.contains("\n  \"vocab_size\": 1000"));
        assert_eq!(first, record.clone().to_json(true).unwrap());
    }

    #[test]
    fn into_parts_restores_vocabulary() {
        let record = sample_record();
        let (vocab, cfg) = record.into_parts().unwrap();
        assert_eq!(vocab.token_to_id("Ga"), Some(6));
        assert_eq!(vocab.id_to_token(7), Some("--o"));
        assert_eq!(cfg.vocab_size, 1000);
        assert_eq!(cfg.unk_token, "[UNK]");
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        for field in ["vocab_size", "unk_token", "vocab"] {
            let mut value = sample_value();
            value.as_object_mut().unwrap().remove(field);
            let err = TokenizerRecord::from_json(&value.to_string()).expect_err(field);
            assert!(
                matches!(&err, SlicesError::InvalidRecord(msg) if msg.contains(field)),
                "unexpected error for {field}: {err}"
            );
        }
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let mut value = sample_value();
        let obj = value.as_object_mut().unwrap();
        obj.remove("model_type");
        obj.remove("special_tokens");
        obj.remove("pattern");
        let record = TokenizerRecord::from_json(&value.to_string()).unwrap();
        assert_eq!(record.model_type, MODEL_TYPE);
        assert_eq!(record.pattern, PATTERN);
        assert!(record.into_parts().is_ok());
    }

    #[test]
    fn wrong_shapes_are_rejected() {
        let mut value = sample_value();
        value["vocab_size"] = json!("1000");
        assert!(matches!(
            TokenizerRecord::from_json(&value.to_string()),
            Err(SlicesError::InvalidRecord(_))
        ));

        let mut value = sample_value();
        value["unk_token"] = json!(7);
        assert!(matches!(
            TokenizerRecord::from_json(&value.to_string()),
            Err(SlicesError::InvalidRecord(_))
        ));

        let mut value = sample_value();
        value["vocab"] = json!(["Ga", "Bi"]);
        assert!(matches!(
            TokenizerRecord::from_json(&value.to_string()),
            Err(SlicesError::InvalidRecord(_))
        ));

        assert!(matches!(
            TokenizerRecord::from_json("{ not json"),
            Err(SlicesError::InvalidRecord(_))
        ));
    }

    #[test]
    fn oversized_vocab_is_rejected() {
        let mut record = sample_record();
        record.vocab_size = 7;
        let err = record.into_parts().expect_err("8 entries exceed capacity 7");
        assert!(matches!(err, SlicesError::InvalidRecord(msg) if msg.contains("vocab_size")));
    }

    #[test]
    fn foreign_pattern_is_accepted() {
        let mut record = sample_record();
        record.pattern = r"\w+".into();
        assert!(record.advisories()[0].contains("pattern"));
        let (vocab, _) = record.into_parts().unwrap();
        assert_eq!(vocab.len(), 8);
    }

    #[test]
    fn foreign_special_tokens_are_reported_and_ignored() {
        let mut record = sample_record();
        assert!(record.advisories().is_empty());

        record.special_tokens.pad_token = "<pad>".into();
        let notes = record.advisories();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("special_tokens"));

        let (vocab, _) = record.into_parts().unwrap();
        assert_eq!(vocab.token_to_id("[PAD]"), Some(1));
        assert_eq!(vocab.token_to_id("<pad>"), None);
    }

    #[test]
    fn custom_unk_token_is_not_an_advisory() {
        let cfg = TrainerConfig::builder().unk_token("<unk>").build().unwrap();
        let record = TokenizerRecord::from_parts(&Vocabulary::new(), &cfg);
        assert!(record.advisories().is_empty());
    }

    #[test]
    fn save_and_load_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slices_tokenizer.json");
        let record = sample_record();
        save_record(&record, &path).unwrap();
        assert_eq!(load_record(&path).unwrap(), record);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_record(dir.path().join("absent.json")).expect_err("missing file");
        assert!(matches!(err, SlicesError::Io { path: Some(_), .. }));
    }
}
