//! Bidirectional token/id table with reserved special tokens.
//!
//! A [`Vocabulary`] is a bijection between token strings and the dense id range `[0, N)`.
//! Ids `0..6` always hold the tokens from [`SPECIAL_TOKENS`]; learned tokens follow. Both
//! directions are kept in one structure and only mutated through [`Vocabulary::insert`], so
//! the forward and reverse maps cannot drift apart.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::{Result, SlicesError};
use crate::model::TokenId;
use crate::pretokenizer::TokenKind;
use crate::special_tokens::{self, SPECIAL_TOKENS, SPECIAL_TOKEN_COUNT};

/// Maximum number of bond descriptors listed in [`VocabStats`].
const BOND_SAMPLE_LIMIT: usize = 10;

/// Token/id bijection over a dense id space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: Vec<String>,
    ids: FxHashMap<String, TokenId>,
}

impl Vocabulary {
    /// Creates a vocabulary holding only the six special tokens.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(SPECIAL_TOKEN_COUNT)
    }

    /// Creates a special-tokens-only vocabulary with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(SPECIAL_TOKEN_COUNT);
        let mut vocab = Self {
            tokens: Vec::with_capacity(capacity),
            ids: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        };
        for special in &SPECIAL_TOKENS {
            vocab.insert(special.content);
        }
        vocab
    }

    /// Rebuilds a vocabulary from `(token, id)` pairs, enforcing every invariant.
    ///
    /// The ids must be unique and cover `[0, N)` exactly, and ids `0..6` must hold the
    /// canonical special tokens.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, TokenId)>,
        S: Into<String>,
    {
        let entries: Vec<(String, TokenId)> = entries
            .into_iter()
            .map(|(token, id)| (token.into(), id))
            .collect();
        let total = entries.len();
        let mut slots: Vec<Option<String>> = vec![None; total];
        let mut ids = FxHashMap::with_capacity_and_hasher(total, Default::default());
        for (token, id) in entries {
            let idx = id as usize;
            if idx >= total {
                return Err(SlicesError::InvalidRecord(format!(
                    "id {id} for {token:?} is outside the dense range [0, {total})"
                )));
            }
            if let Some(existing) = &slots[idx] {
                return Err(SlicesError::InvalidRecord(format!(
                    "id {id} is assigned to both {existing:?} and {token:?}"
                )));
            }
            if ids.insert(token.clone(), id).is_some() {
                return Err(SlicesError::InvalidRecord(format!(
                    "token {token:?} appears more than once"
                )));
            }
            slots[idx] = Some(token);
        }

        let tokens = slots
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.ok_or_else(|| SlicesError::Internal(format!("id {idx} left unassigned")))
            })
            .collect::<Result<Vec<_>>>()?;

        for special in &SPECIAL_TOKENS {
            let found = tokens.get(special.id as usize).map(String::as_str);
            if found != Some(special.content) {
                return Err(SlicesError::InvalidRecord(format!(
                    "special token {} must occupy id {}, found {found:?}",
                    special.content, special.id
                )));
            }
        }

        Ok(Self { tokens, ids })
    }

    /// Appends `token` at the next free id.
    ///
    /// Returns the new id, or `None` when the token is already present (its id is unchanged).
    pub fn insert<S: Into<String>>(&mut self, token: S) -> Option<TokenId> {
        let token = token.into();
        if self.ids.contains_key(&token) {
            return None;
        }
        let id = TokenId::try_from(self.tokens.len()).ok()?;
        self.ids.insert(token.clone(), id);
        self.tokens.push(token);
        Some(id)
    }

    /// Number of tokens, special tokens included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the vocabulary is empty (never true for a constructed vocabulary).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Looks up the id of `token`.
    #[must_use]
    pub fn token_to_id(&self, token: &str) -> Option<TokenId> {
        self.ids.get(token).copied()
    }

    /// Looks up the token stored at `id`.
    #[must_use]
    pub fn id_to_token(&self, id: TokenId) -> Option<&str> {
        self.tokens.get(id as usize).map(String::as_str)
    }

    /// Whether `token` is part of the vocabulary.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.ids.contains_key(token)
    }

    /// Iterates over `(token, id)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TokenId)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .map(|(idx, token)| (token.as_str(), idx as TokenId))
    }

    /// Iterates over learned (non-special) tokens in id order.
    pub fn learned(&self) -> impl Iterator<Item = (&str, TokenId)> + '_ {
        self.iter().skip(SPECIAL_TOKEN_COUNT)
    }

    /// Copies the token-to-id mapping into a map sorted by token text.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, TokenId> {
        self.iter()
            .map(|(token, id)| (token.to_string(), id))
            .collect()
    }

    /// Counts tokens by class.
    #[must_use]
    pub fn stats(&self) -> VocabStats {
        let mut stats = VocabStats {
            total: self.len(),
            ..VocabStats::default()
        };
        for (token, id) in self.iter() {
            if special_tokens::is_special(token) {
                stats.special += 1;
                continue;
            }
            match TokenKind::classify(token) {
                Some(TokenKind::Element) => stats.elements += 1,
                Some(TokenKind::Number) => stats.numbers += 1,
                Some(TokenKind::BondDescriptor) => {
                    stats.bond_descriptors += 1;
                    if stats.bond_samples.len() < BOND_SAMPLE_LIMIT {
                        stats.bond_samples.push((token.to_string(), id));
                    }
                }
                None => stats.other += 1,
            }
        }
        stats
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-class token counts of a [`Vocabulary`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabStats {
    /// Total number of tokens.
    pub total: usize,
    /// Reserved special tokens.
    pub special: usize,
    /// Element symbols.
    pub elements: usize,
    /// Site indices.
    pub numbers: usize,
    /// Bond descriptors.
    pub bond_descriptors: usize,
    /// Tokens matching none of the rule classes (only possible in foreign records).
    pub other: usize,
    /// First bond descriptors in id order.
    pub bond_samples: Vec<(String, TokenId)>,
}

impl fmt::Display for VocabStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total vocabulary size: {}", self.total)?;
        writeln!(f, "  Special tokens: {}", self.special)?;
        writeln!(f, "  Element symbols: {}", self.elements)?;
        writeln!(f, "  Numbers: {}", self.numbers)?;
        writeln!(f, "  Bond descriptors: {}", self.bond_descriptors)?;
        if self.other > 0 {
            writeln!(f, "  Other: {}", self.other)?;
        }
        if !self.bond_samples.is_empty() {
            writeln!(f, "Sample bond descriptors:")?;
            for (token, id) in &self.bond_samples {
                writeln!(f, "  '{token}' (ID: {id})")?;
            }
        }
        Ok(())
    }
}
