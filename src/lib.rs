//! Tokenizer, vocabulary trainer and CLI for SLICES crystal-structure strings.
//!
//! SLICES strings are sequences of element symbols, integer site indices and
//! three-character bond descriptors (`Ga Bi 0 3 --o ...`).  The crate segments such strings
//! with a fixed rule set, learns a bounded vocabulary from a corpus by token frequency,
//! encodes and decodes reversibly against it, and persists the vocabulary as a JSON record.
//!
//! ```no_run
//! use slices_tokenizer::{SlicesTokenizer, TrainerConfig};
//!
//! # fn main() -> slices_tokenizer::Result<()> {
//! let config = TrainerConfig::builder().show_progress(false).build()?;
//! let mut tokenizer = SlicesTokenizer::with_config(config)?;
//! tokenizer.train(["Ga Bi Bi S 0 3 --o", "Li Na 1 2 +++"], 1000)?;
//!
//! let encoding = tokenizer.encode("Ga S 0 3 --o");
//! assert_eq!(tokenizer.decode(&encoding.ids), "Ga S 0 3 --o");
//! tokenizer.save("slices_tokenizer.json")?;
//! # Ok(())
//! # }
//! ```
//!
//! The CLI is enabled by default through the `cli` feature.  Users targeting the
//! library portion only can disable default features to avoid the CLI
//! dependencies: `slices-tokenizer = { version = "...", default-features = false }`.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    clippy::all,
    rust_2018_idioms,
    future_incompatible,
    unused_lifetimes,
    unreachable_pub
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::doc_markdown
)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod metrics;
pub mod model;
pub mod pretokenizer;
pub mod serialization;
pub mod special_tokens;
pub mod trainer;
pub mod vocab;

pub use config::{IngestConfig, TrainerBuilder, TrainerConfig};
pub use error::{Result, SlicesError};
pub use metrics::{StopReason, TrainingMetrics};
pub use model::{Encoding, SlicesTokenizer, TokenId};
pub use pretokenizer::{pre_tokenize, TokenKind, TokenSpan};
pub use serialization::TokenizerRecord;
pub use trainer::{Trainer, TrainerArtifacts};
pub use vocab::{VocabStats, Vocabulary};
