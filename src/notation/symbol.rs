//! Index symbols and their dense integer ids.

use hashbrown::HashMap;

use crate::error::{EinsumError, EinsumResult};

/// Dense identifier of one logical axis within one expression.
pub type IndexId = usize;

/// Symbols available in subscript strings, in id order for canonical rendering.
pub const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Maximum number of distinct indices an expression can name.
pub const MAX_INDICES: usize = ALPHABET.len();

/// Returns the canonical symbol of an index id, if it fits the alphabet.
#[inline]
pub fn symbol_of(id: IndexId) -> Option<char> {
    ALPHABET.get(id).map(|&b| b as char)
}

/// Returns true if `c` can name an index.
#[inline]
pub fn is_symbol(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Maps symbols to ids in first-seen order.
///
/// One table is shared by all terms of an expression while it is parsed and
/// dropped afterwards.
#[derive(Debug, Default)]
pub struct SymbolTable {
    ids: HashMap<char, IndexId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `symbol`, assigning the next free id on first sight.
    pub fn intern(&mut self, symbol: char) -> EinsumResult<IndexId> {
        let next = self.ids.len();
        let id = *self.ids.entry(symbol).or_insert(next);
        if self.ids.len() > MAX_INDICES {
            return Err(EinsumError::TooManyIndices {
                count: self.ids.len(),
                limit: MAX_INDICES,
            });
        }
        Ok(id)
    }

    /// Number of distinct symbols seen so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
