//! Helpers for (de)serialising tokenizers as JSON records.

pub mod record;

pub use record::{load_record, save_record, TokenizerRecord, MODEL_TYPE};
