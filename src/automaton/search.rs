use itertools::Itertools;
use tracing::debug;

use crate::{math::Set, state::StateId, word::Word};

use super::Automaton;

/// Words longer than this are never explored by [`ShortestAcceptedWords`] unless a different
/// bound is set with [`ShortestAcceptedWords::with_max_depth`].
pub const MAX_SEARCH_DEPTH: usize = 15;

/// Iterator over the words accepted by an [`Automaton`] in length-lexicographic order, i.e. shorter
/// words come first and words of equal length are ordered lexicographically.
///
/// The search proceeds level by level, one word length at a time, starting with the empty word in
/// the initial state. Within a level the words are walked depth first with symbols in ascending
/// order, and a prefix is only extended into a state from which a final state can be reached with
/// exactly the number of symbols that are still missing. Hence every explored prefix leads to an
/// accepted word and only a single path per level is kept in memory. Words longer than the maximal
/// depth are not explored, so the iterator always terminates, even if the accepted language is
/// infinite. For an automaton that is not [valid](Automaton::is_valid), the iterator is empty.
#[derive(Debug, Clone)]
pub struct ShortestAcceptedWords<'a> {
    automaton: &'a Automaton,
    max_depth: usize,
    /// Entry `r` holds the states from which a final state is reached with exactly `r` symbols.
    completable: Vec<Set<&'a StateId>>,
    length: usize,
    stack: Vec<(Word, &'a StateId)>,
    explored: usize,
}

impl<'a> ShortestAcceptedWords<'a> {
    /// Starts the search in the initial state of `automaton`.
    pub fn new(automaton: &'a Automaton) -> Self {
        let completable = if automaton.is_valid() {
            vec![automaton.finals().collect()]
        } else {
            vec![]
        };
        let mut search = Self {
            automaton,
            max_depth: MAX_SEARCH_DEPTH,
            completable,
            length: 0,
            stack: vec![],
            explored: 0,
        };
        search.start_level();
        search
    }

    /// Sets the length up to which words are explored.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        if self.length > max_depth {
            self.stack.clear();
        }
        self
    }

    /// The number of prefixes that have been explored so far.
    pub fn explored(&self) -> usize {
        self.explored
    }

    /// Makes sure that `self.completable[steps]` exists, returns false if the automaton is not
    /// valid and nothing can be completed at all.
    fn ensure_completable(&mut self, steps: usize) -> bool {
        if self.completable.is_empty() {
            return false;
        }
        while self.completable.len() <= steps {
            let Some(last) = self.completable.last() else {
                return false;
            };
            let next: Set<&'a StateId> = self
                .automaton
                .transitions()
                .iter()
                .filter(|(_, _, to)| last.contains(to))
                .map(|(from, _, _)| from)
                .collect();
            self.completable.push(next);
        }
        true
    }

    /// Seeds the stack for words of length `self.length`.
    fn start_level(&mut self) {
        if self.length > self.max_depth || !self.ensure_completable(self.length) {
            return;
        }
        if let Some(initial) = self.automaton.initial() {
            if self.completable[self.length].contains(initial) {
                self.stack.push((Word::empty(), initial));
            }
        }
    }
}

impl<'a> Iterator for ShortestAcceptedWords<'a> {
    type Item = Word;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some((word, state)) = self.stack.pop() else {
                if self.length >= self.max_depth || self.completable.is_empty() {
                    return None;
                }
                self.length += 1;
                self.start_level();
                continue;
            };
            self.explored += 1;

            let remaining = self.length - word.len();
            if remaining == 0 {
                return Some(word);
            }
            let successors = self
                .automaton
                .transitions()
                .successors(state.name())
                .filter(|(_, target)| self.completable[remaining - 1].contains(target))
                .collect_vec();
            for (symbol, target) in successors.into_iter().rev() {
                self.stack.push((word.extended(symbol), target));
            }
        }
    }
}

impl Automaton {
    /// Returns an iterator over the accepted words, shortest first. See
    /// [`ShortestAcceptedWords`] for details.
    pub fn accepted_words(&self) -> ShortestAcceptedWords<'_> {
        ShortestAcceptedWords::new(self)
    }

    /// Returns at most `limit` of the shortest accepted words, ordered by length and then
    /// lexicographically. Only words of length at most [`MAX_SEARCH_DEPTH`] are considered, so
    /// fewer than `limit` words may be returned even if the accepted language is infinite. An
    /// automaton that is not [valid](Automaton::is_valid) yields no words.
    ///
    /// ```
    /// use dfa_builder::prelude::*;
    /// let dfa = Automaton::builder()
    ///     .with_edges([("q0", 'a', "q1"), ("q1", 'a', "q0"), ("q0", 'b', "q0"), ("q1", 'b', "q1")])
    ///     .with_initial("q0")
    ///     .with_finals(["q0"])
    ///     .into_automaton();
    /// assert_eq!(dfa.shortest_accepted_words(4), vec!["", "b", "aa", "bb"]);
    /// ```
    pub fn shortest_accepted_words(&self, limit: usize) -> Vec<String> {
        if limit == 0 || !self.is_valid() {
            return vec![];
        }
        let mut search = self.accepted_words();
        let words = search
            .by_ref()
            .take(limit)
            .sorted()
            .map(String::from)
            .collect_vec();
        debug!(
            "found {} of at most {limit} accepted words after exploring {} prefixes",
            words.len(),
            search.explored()
        );
        words
    }
}
