use std::fmt;

use crate::{math::OrderedSet, Show};

/// A symbol of an alphabet, which is also the type of the letters in a word. Symbols are
/// single characters, multi-character tokens are not supported.
pub type Symbol = char;

/// Symbols that are used to denote the empty word and may therefore never be part of an alphabet.
pub const RESERVED_SYMBOLS: [Symbol; 2] = ['ε', 'λ'];

/// Returns true if `symbol` is one of the [`RESERVED_SYMBOLS`].
pub fn is_reserved(symbol: Symbol) -> bool {
    RESERVED_SYMBOLS.contains(&symbol)
}

/// Characters that delimit values in the persisted text format, see [`crate::codec`]. They can
/// neither be symbols nor occur in state names.
pub const DELIMITERS: [char; 4] = [',', '"', '[', ']'];

/// Returns true if `symbol` may be added to an alphabet. Reserved symbols, [`DELIMITERS`] and
/// whitespace are not admissible.
pub fn is_admissible(symbol: Symbol) -> bool {
    !is_reserved(symbol) && !DELIMITERS.contains(&symbol) && !symbol.is_whitespace()
}

/// A finite set of [`Symbol`]s. Membership is what matters, but iteration always happens in
/// ascending order so that displaying and persisting an alphabet is deterministic.
///
/// # Example
/// ```
/// use dfa_builder::prelude::*;
/// let mut sigma = alphabet!('b', 'a');
/// assert_eq!(sigma.symbols().collect::<Vec<_>>(), vec!['a', 'b']);
/// assert!(!sigma.add('a'));
/// assert!(!sigma.add('ε'));
/// assert!(sigma.is_valid_word("abba"));
/// assert!(!sigma.is_valid_word("abc"));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Alphabet(OrderedSet<Symbol>);

/// Helper macro for creating an [`Alphabet`]. Is called simply with a list of symbols
/// that are separated by commata.
#[macro_export]
macro_rules! alphabet {
    ($($c:literal),* $(,)?) => {
        $crate::alphabet::Alphabet::from_iter([$($c),*])
    };
}

impl Alphabet {
    /// Creates an empty alphabet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `symbol`, returns true if it was not present before. Symbols that are not
    /// [admissible](is_admissible) are never added, for those the method returns false.
    pub fn add(&mut self, symbol: Symbol) -> bool {
        if !is_admissible(symbol) {
            return false;
        }
        self.0.insert(symbol)
    }

    /// Removes `symbol`, returns true if it was present.
    pub fn remove(&mut self, symbol: Symbol) -> bool {
        self.0.remove(&symbol)
    }

    /// Returns true if the given symbol is present in the alphabet.
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.0.contains(&symbol)
    }

    /// Returns true if every character of `word` belongs to the alphabet. The empty word is
    /// valid over every alphabet.
    pub fn is_valid_word(&self, word: &str) -> bool {
        self.first_invalid(word).is_none()
    }

    /// Finds the first character of `word` that is not a member, together with its position
    /// (counted in characters).
    pub fn first_invalid(&self, word: &str) -> Option<(usize, Symbol)> {
        word.chars()
            .enumerate()
            .find(|(_, symbol)| !self.contains(*symbol))
    }

    /// Returns an iterator over the symbols in ascending order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.0.iter().copied()
    }

    /// Removes all symbols.
    pub fn clear(&mut self) {
        self.0.clear()
    }

    /// Returns the number of symbols in the alphabet.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Symbol> for Alphabet {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        let mut alphabet = Self::new();
        alphabet.extend(iter);
        alphabet
    }
}

impl Extend<Symbol> for Alphabet {
    fn extend<T: IntoIterator<Item = Symbol>>(&mut self, iter: T) {
        for symbol in iter {
            self.add(symbol);
        }
    }
}

impl Show for Alphabet {
    fn show(&self) -> String {
        char::show_collection(self.0.iter())
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.show())
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alphabet{}", self.show())
    }
}
