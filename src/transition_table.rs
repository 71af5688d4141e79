use std::collections::BTreeMap;

use itertools::Itertools;

use crate::{alphabet::Symbol, math::Map, state::StateId};

/// The transition function δ of a deterministic automaton, a partial mapping from
/// (state, symbol) to a target state.
///
/// Determinism holds by construction: a pair (state, symbol) is a key and can only ever be
/// associated with one target. Setting an existing key again replaces the previous target, which
/// is what a user re-editing a cell of the table expects.
///
/// ```
/// use dfa_builder::prelude::*;
/// let mut delta = TransitionTable::default();
/// delta.set("q0".into(), 'a', "q1".into());
/// delta.set("q0".into(), 'a', "q2".into());
/// assert_eq!(delta.get("q0", 'a'), Some(&StateId::new("q2")));
/// assert_eq!(delta.size(), 1);
/// assert!(!delta.has("q0", 'b'));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct TransitionTable {
    rows: Map<StateId, BTreeMap<Symbol, StateId>>,
}

impl TransitionTable {
    /// Creates an empty transition table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target of `(from, symbol)` to `to`. If a target was present before, it is
    /// replaced and returned.
    pub fn set(&mut self, from: StateId, symbol: Symbol, to: StateId) -> Option<StateId> {
        self.rows.entry(from).or_default().insert(symbol, to)
    }

    /// Returns the target of the transition from `from` on `symbol`, if one is defined.
    pub fn get(&self, from: &str, symbol: Symbol) -> Option<&StateId> {
        self.rows.get(from)?.get(&symbol)
    }

    /// Returns true if a transition from `from` on `symbol` is defined.
    pub fn has(&self, from: &str, symbol: Symbol) -> bool {
        self.get(from, symbol).is_some()
    }

    /// Removes the transition from `from` on `symbol`, returns true if it existed.
    pub fn remove(&mut self, from: &str, symbol: Symbol) -> bool {
        let Some(row) = self.rows.get_mut(from) else {
            return false;
        };
        let removed = row.remove(&symbol).is_some();
        if row.is_empty() {
            self.rows.remove(from);
        }
        removed
    }

    /// Keeps only the transitions for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&StateId, Symbol, &StateId) -> bool,
    {
        self.rows.retain(|from, row| {
            row.retain(|symbol, to| keep(from, *symbol, &*to));
            !row.is_empty()
        });
    }

    /// Returns the outgoing transitions of `from` as pairs of symbol and target, ordered by
    /// symbol.
    pub fn successors<'a>(&'a self, from: &str) -> impl Iterator<Item = (Symbol, &'a StateId)> {
        self.rows
            .get(from)
            .into_iter()
            .flat_map(|row| row.iter().map(|(symbol, to)| (*symbol, to)))
    }

    /// Iterates over all transitions, ordered by source state and then by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (&StateId, Symbol, &StateId)> {
        self.rows
            .iter()
            .sorted_by(|(left, _), (right, _)| left.cmp(right))
            .flat_map(|(from, row)| row.iter().map(move |(symbol, to)| (from, *symbol, to)))
    }

    /// Removes all transitions.
    pub fn clear(&mut self) {
        self.rows.clear()
    }

    /// Number of defined transitions.
    pub fn size(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Returns true if no transition is defined.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<F, T> FromIterator<(F, Symbol, T)> for TransitionTable
where
    F: Into<StateId>,
    T: Into<StateId>,
{
    fn from_iter<I: IntoIterator<Item = (F, Symbol, T)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (from, symbol, to) in iter {
            table.set(from.into(), symbol, to.into());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TransitionTable {
        [
            ("q1", 'b', "q2"),
            ("q0", 'b', "q0"),
            ("q0", 'a', "q1"),
            ("q1", 'a', "q1"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn overwrite_keeps_last_target() {
        let mut delta = table();
        assert_eq!(
            delta.set("q0".into(), 'a', "q2".into()),
            Some(StateId::new("q1"))
        );
        assert_eq!(delta.get("q0", 'a'), Some(&StateId::new("q2")));
        assert_eq!(delta.size(), 4);
        assert_eq!(delta.set("q2".into(), 'a', "q0".into()), None);
        assert_eq!(delta.size(), 5);
    }

    #[test]
    fn lookup_and_removal() {
        let mut delta = table();
        assert!(delta.has("q1", 'b'));
        assert!(!delta.has("q2", 'a'));
        assert_eq!(delta.get("q3", 'a'), None);

        assert!(delta.remove("q1", 'b'));
        assert!(!delta.remove("q1", 'b'));
        assert!(!delta.remove("q9", 'a'));
        assert_eq!(delta.size(), 3);

        assert!(delta.remove("q1", 'a'));
        assert_eq!(delta.successors("q1").count(), 0);

        delta.clear();
        assert!(delta.is_empty());
        assert_eq!(delta, TransitionTable::new());
    }

    #[test]
    fn iteration_order() {
        let delta = table();
        let listed = delta
            .iter()
            .map(|(from, symbol, to)| format!("{from}-{symbol}->{to}"))
            .collect_vec();
        assert_eq!(listed, vec!["q0-a->q1", "q0-b->q0", "q1-a->q1", "q1-b->q2"]);

        let successors = delta.successors("q0").collect_vec();
        assert_eq!(
            successors,
            vec![('a', &StateId::new("q1")), ('b', &StateId::new("q0"))]
        );
    }

    #[test]
    fn retain_drops_empty_rows() {
        let mut delta = table();
        delta.retain(|_, _, to| to != "q1");
        assert_eq!(delta.size(), 2);
        delta.retain(|from, _, _| from != "q0");
        assert_eq!(delta.size(), 1);
        assert_eq!(delta.get("q1", 'b'), Some(&StateId::new("q2")));

        let mut expected = TransitionTable::new();
        expected.set("q1".into(), 'b', "q2".into());
        assert_eq!(delta, expected);
    }
}
