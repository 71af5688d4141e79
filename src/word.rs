use std::{cmp::Ordering, fmt};

use crate::{alphabet::Symbol, Show};

/// A finite word, i.e. a (possibly empty) sequence of [`Symbol`]s.
///
/// Words are ordered length-lexicographically: shorter words come first and words of equal
/// length are compared symbol by symbol. This is the order in which
/// [`crate::Automaton::shortest_accepted_words`] reports its results.
///
/// ```
/// use dfa_builder::prelude::*;
/// let mut words = vec![Word::from("ba"), Word::from("b"), Word::from("ab"), Word::empty()];
/// words.sort();
/// assert_eq!(words.iter().map(Word::to_string).collect::<Vec<_>>(), vec!["ε", "b", "ab", "ba"]);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Word {
    symbols: String,
    len: usize,
}

impl Word {
    /// The empty word ε.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a new word which is `self` followed by `symbol`.
    pub fn extended(&self, symbol: Symbol) -> Self {
        let mut symbols = String::with_capacity(self.symbols.len() + symbol.len_utf8());
        symbols.push_str(&self.symbols);
        symbols.push(symbol);
        Self {
            symbols,
            len: self.len + 1,
        }
    }

    /// Number of symbols in the word.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true for the empty word.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over the symbols of the word.
    pub fn symbols(&self) -> std::str::Chars<'_> {
        self.symbols.chars()
    }

    /// The word as a plain string, the empty word is the empty string.
    pub fn as_str(&self) -> &str {
        &self.symbols
    }
}

impl From<&str> for Word {
    fn from(value: &str) -> Self {
        Self {
            symbols: value.to_string(),
            len: value.chars().count(),
        }
    }
}

impl From<String> for Word {
    fn from(value: String) -> Self {
        let len = value.chars().count();
        Self {
            symbols: value,
            len,
        }
    }
}

impl From<Word> for String {
    fn from(value: Word) -> Self {
        value.symbols
    }
}

impl FromIterator<Symbol> for Word {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<String>())
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.symbols
    }
}

impl Ord for Word {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len
            .cmp(&other.len)
            .then_with(|| self.symbols.cmp(&other.symbols))
    }
}

impl PartialOrd for Word {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Show for Word {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("ε")
        } else {
            f.write_str(&self.symbols)
        }
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_symbols() {
        assert_eq!(Word::from("").len(), 0);
        assert_eq!(Word::from("abc").len(), 3);
        assert_eq!(Word::from("äö").len(), 2);
        assert_eq!(Word::empty().extended('a').extended('ß').len(), 2);
        assert_eq!(Word::empty().extended('a').extended('b').as_str(), "ab");
    }

    #[test]
    fn shortlex_order() {
        assert!(Word::from("b") < Word::from("aa"));
        assert!(Word::from("aa") < Word::from("ab"));
        assert!(Word::empty() < Word::from("a"));
        assert_eq!(Word::from("ab").cmp(&Word::from("ab")), Ordering::Equal);
    }

    #[test]
    fn display_uses_epsilon_for_empty_word() {
        assert_eq!(Word::empty().to_string(), "ε");
        assert_eq!(Word::from("ab").to_string(), "ab");
        assert_eq!(format!("{:?}", Word::empty()), "\"\"");
        assert_eq!(String::from(Word::from("ab")), "ab");
    }
}
