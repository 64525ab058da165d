//! The fixed inventory of reserved special tokens.
//!
//! Every vocabulary starts with the same six tokens at ids `0..6`, in the order listed in
//! [`SPECIAL_TOKENS`]. The table is a compile-time constant so a fresh vocabulary, a trained
//! vocabulary and a reloaded vocabulary all agree on their identity.

use serde::{Deserialize, Serialize};

use crate::model::TokenId;

/// A reserved token with its persisted field name and fixed id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialToken {
    /// Field name used inside the persisted `special_tokens` object.
    pub name: &'static str,
    /// Token text.
    pub content: &'static str,
    /// Reserved identifier.
    pub id: TokenId,
}

/// Placeholder emitted for unknown tokens and ids unless configured otherwise.
pub const UNK_TOKEN: &str = "[UNK]";
/// Padding token text.
pub const PAD_TOKEN: &str = "[PAD]";
/// Sequence classification token text.
pub const CLS_TOKEN: &str = "[CLS]";
/// Separator token text.
pub const SEP_TOKEN: &str = "[SEP]";
/// Mask token text.
pub const MASK_TOKEN: &str = "[MASK]";
/// End-of-sequence token text.
pub const EOS_TOKEN: &str = "[EOS]";

/// Id of the unknown token, the fallback for every lookup miss.
pub const UNK_ID: TokenId = 0;

/// Canonical special tokens in id order.
pub const SPECIAL_TOKENS: [SpecialToken; 6] = [
    SpecialToken {
        name: "unk_token",
        content: UNK_TOKEN,
        id: 0,
    },
    SpecialToken {
        name: "pad_token",
        content: PAD_TOKEN,
        id: 1,
    },
    SpecialToken {
        name: "cls_token",
        content: CLS_TOKEN,
        id: 2,
    },
    SpecialToken {
        name: "sep_token",
        content: SEP_TOKEN,
        id: 3,
    },
    SpecialToken {
        name: "mask_token",
        content: MASK_TOKEN,
        id: 4,
    },
    SpecialToken {
        name: "eos_token",
        content: EOS_TOKEN,
        id: 5,
    },
];

/// Number of reserved ids at the start of every vocabulary.
pub const SPECIAL_TOKEN_COUNT: usize = SPECIAL_TOKENS.len();

/// Returns `true` when `token` is one of the reserved special tokens.
#[must_use]
pub fn is_special(token: &str) -> bool {
    SPECIAL_TOKENS.iter().any(|special| special.content == token)
}

/// The `special_tokens` object stored in a persisted tokenizer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTokens {
    /// Unknown-token placeholder (mirrors the configured `unk_token`).
    pub unk_token: String,
    /// Padding token.
    pub pad_token: String,
    /// Classification token.
    pub cls_token: String,
    /// Separator token.
    pub sep_token: String,
    /// Mask token.
    pub mask_token: String,
    /// End-of-sequence token.
    pub eos_token: String,
}

impl SpecialTokens {
    /// Builds the persisted object, substituting the configured unknown placeholder.
    #[must_use]
    pub fn with_unk(unk_token: &str) -> Self {
        Self {
            unk_token: unk_token.to_string(),
            pad_token: PAD_TOKEN.to_string(),
            cls_token: CLS_TOKEN.to_string(),
            sep_token: SEP_TOKEN.to_string(),
            mask_token: MASK_TOKEN.to_string(),
            eos_token: EOS_TOKEN.to_string(),
        }
    }
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self::with_unk(UNK_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_ordered() {
        for (idx, special) in SPECIAL_TOKENS.iter().enumerate() {
            assert_eq!(special.id as usize, idx);
        }
        assert_eq!(SPECIAL_TOKENS[UNK_ID as usize].content, UNK_TOKEN);
    }

    #[test]
    fn persisted_object_uses_configured_unk() {
        let tokens = SpecialTokens::with_unk("<unk>");
        assert_eq!(tokens.unk_token, "<unk>");
        assert_eq!(tokens.eos_token, EOS_TOKEN);
        assert!(is_special("[MASK]"));
        assert!(!is_special("<unk>"));
    }
}
