use crate::{alphabet::Symbol, state::StateId};

use super::Automaton;

/// Helper struct for the construction of automata in code. It collects states, symbols, edges,
/// the initial and the final states and assembles them into an [`Automaton`].
///
/// The alphabet of the built automaton consists of all symbols that appear on an edge plus the
/// ones given through [`AutomatonBuilder::with_symbols`]. Likewise, every endpoint of an edge
/// becomes a state, additional (e.g. isolated) states can be given with
/// [`AutomatonBuilder::with_states`].
///
/// # Example
///
/// We want to create a DFA with two states `q0` and `q1` over the alphabet `['a', 'b']` which
/// accepts all words with an odd number of `b`s.
/// ```
/// use dfa_builder::prelude::*;
///
/// let dfa = Automaton::builder()
///     .with_edges([("q0", 'a', "q0"), ("q0", 'b', "q1"), ("q1", 'a', "q1"), ("q1", 'b', "q0")])
///     .with_initial("q0")
///     .with_finals(["q1"])
///     .into_automaton();
/// assert!(dfa.accepts("aab"));
/// assert!(!dfa.accepts("bb"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct AutomatonBuilder {
    symbols: Vec<Symbol>,
    states: Vec<StateId>,
    edges: Vec<(StateId, Symbol, StateId)>,
    initial: Option<StateId>,
    finals: Vec<StateId>,
}

impl AutomatonBuilder {
    /// Forces additional symbols into the alphabet.
    pub fn with_symbols<I>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        self.symbols.extend(symbols);
        self
    }

    /// Forces additional states into the automaton.
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StateId>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Adds the given edges, which are triples of source, symbol and target.
    pub fn with_edges<I, S, T>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (S, Symbol, T)>,
        S: Into<StateId>,
        T: Into<StateId>,
    {
        self.edges.extend(
            edges
                .into_iter()
                .map(|(from, symbol, to)| (from.into(), symbol, to.into())),
        );
        self
    }

    /// Sets the initial state, which also becomes a state of the automaton.
    pub fn with_initial(mut self, initial: impl Into<StateId>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    /// Marks the given states as final, they also become states of the automaton.
    pub fn with_finals<I, S>(mut self, finals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StateId>,
    {
        self.finals.extend(finals.into_iter().map(Into::into));
        self
    }

    /// Assembles the automaton. Reserved symbols are silently left out of the alphabet, and so
    /// are the edges labeled with them.
    pub fn into_automaton(self) -> Automaton {
        let mut automaton = Automaton::new();
        for symbol in self
            .symbols
            .into_iter()
            .chain(self.edges.iter().map(|(_, symbol, _)| *symbol))
        {
            automaton.add_symbol(symbol);
        }

        let mentioned = self
            .edges
            .iter()
            .flat_map(|(from, _, to)| [from, to])
            .chain(self.initial.iter())
            .chain(self.finals.iter())
            .cloned();
        for state in self.states.into_iter().chain(mentioned) {
            automaton.add_state(state);
        }

        if let Some(initial) = &self.initial {
            automaton.set_initial(initial.name());
        }
        for q in &self.finals {
            automaton.add_final(q.name());
        }
        for (from, symbol, to) in &self.edges {
            automaton.add_transition(from.name(), *symbol, to.name());
        }
        automaton
    }
}
