//! Frequency-ranked vocabulary training.
//!
//! Training segments every corpus string, counts token occurrences, ranks the distinct tokens
//! by descending frequency and assigns ids after the special tokens until the configured
//! capacity is reached. Ties keep first-encounter order, so identical corpora always produce
//! identical vocabularies.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use log::info;
use rustc_hash::FxHashMap;

use crate::config::{IngestConfig, TrainerConfig};
use crate::corpus::load_text_corpus;
use crate::error::Result;
use crate::metrics::{StopReason, TokenFrequency, TrainingMetrics};
use crate::pretokenizer::pre_tokenize;
use crate::special_tokens::SPECIAL_TOKEN_COUNT;
use crate::vocab::Vocabulary;

/// High-level façade configuring and executing training runs.
#[derive(Debug, Clone)]
pub struct Trainer {
    cfg: TrainerConfig,
}

/// Artifacts returned after a training session completes.
#[must_use]
#[derive(Debug, Clone)]
pub struct TrainerArtifacts {
    /// Trained vocabulary.
    pub vocab: Vocabulary,
    /// Metrics captured during training.
    pub metrics: TrainingMetrics,
}

/// Occurrence counts in first-encounter order.
#[derive(Debug, Default)]
struct TokenCounts {
    index: FxHashMap<String, usize>,
    entries: Vec<(String, usize)>,
    total: usize,
}

impl TokenCounts {
    fn observe(&mut self, token: &str) {
        self.total += 1;
        match self.index.get(token) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(token.to_string(), self.entries.len());
                self.entries.push((token.to_string(), 1));
            }
        }
    }

    /// Sorts by descending count. `sort_by` is stable, which preserves encounter order
    /// among equal counts.
    fn into_ranked(self) -> Vec<(String, usize)> {
        let mut ranked = self.entries;
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl Trainer {
    /// Creates a new trainer for the supplied configuration.
    #[must_use]
    pub fn new(cfg: TrainerConfig) -> Self {
        Self { cfg }
    }

    /// Trains a vocabulary from newline-delimited text files discovered per [`IngestConfig`].
    pub fn train_from_paths<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        ingest: &IngestConfig,
    ) -> Result<TrainerArtifacts> {
        let lines = load_text_corpus(inputs, ingest)?;
        self.train(&lines)
    }

    /// Trains a vocabulary from in-memory strings.
    ///
    /// An empty corpus is not an error; the result then holds only the special tokens.
    pub fn train<I, S>(&self, corpus: I) -> Result<TrainerArtifacts>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cfg.validate()?;
        let start = Instant::now();
        let capacity = self.cfg.vocab_size;

        let mut counts = TokenCounts::default();
        let mut sequences = 0usize;
        for text in corpus {
            sequences += 1;
            for span in pre_tokenize(text.as_ref()) {
                counts.observe(&span.token);
            }
        }
        let total_tokens = counts.total;
        let ranked = counts.into_ranked();

        let mut vocab =
            Vocabulary::with_capacity(capacity.min(ranked.len() + SPECIAL_TOKEN_COUNT));
        for (token, _) in &ranked {
            if vocab.len() >= capacity {
                break;
            }
            vocab.insert(token.as_str());
        }

        let learned_tokens = vocab.learned().count();
        let dropped_tokens = ranked
            .iter()
            .filter(|(token, _)| !vocab.contains(token))
            .count();
        let stop_reason = if dropped_tokens > 0 {
            StopReason::CapacityReached
        } else {
            StopReason::CorpusExhausted
        };
        let top_tokens = ranked
            .iter()
            .take(self.cfg.report_top_tokens)
            .map(|(token, count)| TokenFrequency {
                token: token.clone(),
                count: *count,
            })
            .collect::<Vec<_>>();

        let metrics = TrainingMetrics {
            sequences,
            total_tokens,
            distinct_tokens: ranked.len(),
            learned_tokens,
            dropped_tokens,
            top_tokens,
            total_duration: start.elapsed(),
            stop_reason,
        };

        if self.cfg.show_progress {
            info!(
                "collected {} tokens ({} distinct) from {} sequences",
                metrics.total_tokens, metrics.distinct_tokens, metrics.sequences
            );
            info!(
                "vocabulary built with {} tokens ({} learned, {} dropped) in {:.2?}",
                vocab.len(),
                metrics.learned_tokens,
                metrics.dropped_tokens,
                metrics.total_duration
            );
            for entry in &metrics.top_tokens {
                info!("  {:?}: {}", entry.token, entry.count);
            }
        }

        Ok(TrainerArtifacts { vocab, metrics })
    }
}

impl fmt::Display for TrainerArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SLICES vocabulary with {} tokens", self.vocab.len())?;
        writeln!(
            f,
            "Learned: {} / dropped: {}",
            self.metrics.learned_tokens, self.metrics.dropped_tokens
        )?;
        writeln!(f, "Stop reason: {:?}", self.metrics.stop_reason)?;
        writeln!(f, "Total duration: {:.2?}", self.metrics.total_duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SlicesError;
    use crate::special_tokens::SPECIAL_TOKENS;
    use std::fs;
    use tempfile::tempdir;

    fn trainer(vocab_size: usize) -> Trainer {
        let cfg = TrainerConfig::builder()
            .vocab_size(vocab_size)
            .show_progress(false)
            .build()
            .unwrap();
        Trainer::new(cfg)
    }

    #[test]
    fn ranks_by_descending_frequency() {
        let corpus = ["ooo --o --o", "--o --o --o"];
        let artefacts = trainer(1000).train(corpus).unwrap();
        let vocab = &artefacts.vocab;
        assert_eq!(vocab.token_to_id("--o"), Some(6));
        assert_eq!(vocab.token_to_id("ooo"), Some(7));
        assert_eq!(artefacts.metrics.total_tokens, 6);
        assert_eq!(artefacts.metrics.top_tokens[0].count, 5);
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let corpus = ["Zn Fe Ca", "Ca Fe Zn"];
        let vocab = trainer(1000).train(corpus).unwrap().vocab;
        let learned: Vec<&str> = vocab.learned().map(|(token, _)| token).collect();
        assert_eq!(learned, vec!["Zn", "Fe", "Ca"]);
    }

    #[test]
    fn training_is_deterministic() {
        let corpus = [
            "Ga Bi Bi S S S S Cl 0 3 --o 0 5 oo- 0 6 o--",
            "Li Na K 1 2 +++ 1 3 --- 2 4 ooo",
            "Fe O O O 0 1 o-o 0 2 -o- 0 3 --o",
        ];
        let first = trainer(20).train(corpus).unwrap().vocab;
        let second = trainer(20).train(corpus).unwrap().vocab;
        assert_eq!(first.to_map(), second.to_map());
    }

    #[test]
    fn capacity_bounds_vocabulary() {
        let corpus = ["H He Li Be B C N O F Ne 0 1 2 3"];
        let artefacts = trainer(10).train(corpus).unwrap();
        assert_eq!(artefacts.vocab.len(), 10);
        assert_eq!(artefacts.metrics.learned_tokens, 4);
        assert_eq!(artefacts.metrics.dropped_tokens, 10);
        assert_eq!(artefacts.metrics.stop_reason, StopReason::CapacityReached);
        assert_eq!(artefacts.vocab.token_to_id("F"), None);
    }

    #[test]
    fn artifacts_summary_reports_counts() {
        let artefacts = trainer(10).train(["H He Li Be B C N O F Ne 0 1 2 3"]).unwrap();
        let summary = artefacts.to_string();
        assert!(summary.starts_with("SLICES vocabulary with 10 tokens\n"));
        assert!(summary.contains("Learned: 4 / dropped: 10"));
        assert!(summary.contains("Stop reason: CapacityReached"));
    }

    #[test]
    fn capacity_above_distinct_tokens_keeps_everything() {
        let artefacts = trainer(100).train(["C C 0 1 ooo"]).unwrap();
        assert_eq!(artefacts.vocab.len(), 10);
        assert_eq!(artefacts.metrics.stop_reason, StopReason::CorpusExhausted);
    }

    #[test]
    fn empty_corpus_yields_special_tokens() {
        let artefacts = trainer(50).train(Vec::<String>::new()).unwrap();
        assert_eq!(artefacts.vocab.len(), SPECIAL_TOKENS.len());
        for special in &SPECIAL_TOKENS {
            assert_eq!(artefacts.vocab.id_to_token(special.id), Some(special.content));
        }
        assert_eq!(artefacts.metrics.sequences, 0);
    }

    #[test]
    fn specials_only_capacity_learns_nothing() {
        let artefacts = trainer(6).train(["Ga Bi"]).unwrap();
        assert_eq!(artefacts.vocab.len(), 6);
        assert_eq!(artefacts.metrics.dropped_tokens, 2);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let trainer = Trainer::new(TrainerConfig {
            vocab_size: 3,
            ..TrainerConfig::default()
        });
        assert!(matches!(
            trainer.train(["Ga"]),
            Err(SlicesError::InvalidConfig(_))
        ));
    }

    #[test]
    fn trains_from_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.txt");
        fs::write(&path, "Ga Ga 0 1 --o\n\nGa S 1 2 ooo\n").unwrap();
        let artefacts = trainer(1000)
            .train_from_paths(&[path], &IngestConfig::default())
            .unwrap();
        assert_eq!(artefacts.metrics.sequences, 2);
        assert_eq!(artefacts.vocab.token_to_id("Ga"), Some(6));
    }
}
