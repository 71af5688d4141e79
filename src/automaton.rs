use std::fmt;

use tracing::trace;

use crate::{
    alphabet::{Alphabet, Symbol},
    math::OrderedSet,
    state::{is_admissible_name, State, StateId},
    transition_table::TransitionTable,
    Show,
};

mod builder;
pub use builder::AutomatonBuilder;

mod run;
pub use run::{Evaluation, RunFailure, Step, Trace};

mod search;
pub use search::{ShortestAcceptedWords, MAX_SEARCH_DEPTH};

mod dot;
mod table;

/// A deterministic finite automaton, the 5-tuple (Q, Σ, δ, q0, F).
///
/// The automaton owns its states, its [`Alphabet`], its [`TransitionTable`], the (optional) initial
/// state and the set of final states. All mutating methods keep the following invariants:
/// - the initial state and all final states are states of the automaton,
/// - every transition connects two states of the automaton and is labeled with a symbol of the
///   alphabet.
///
/// Requests that would break one of them are ignored and reported by returning `false`.
///
/// Note that the transition function may be partial, an automaton in which some cells of the
/// transition table are missing is still [valid](Automaton::is_valid). Running into a missing
/// transition is reported by [`Automaton::evaluate`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Automaton {
    states: OrderedSet<StateId>,
    alphabet: Alphabet,
    transitions: TransitionTable,
    initial: Option<StateId>,
    finals: OrderedSet<StateId>,
}

impl Automaton {
    /// Creates an empty automaton without states and with an empty alphabet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an automaton over the given alphabet which has no states yet.
    pub fn with_alphabet(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            ..Default::default()
        }
    }

    /// Returns an [`AutomatonBuilder`], which is the most convenient way of writing down an
    /// automaton in code.
    pub fn builder() -> AutomatonBuilder {
        AutomatonBuilder::default()
    }

    /// The alphabet of the automaton.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Adds `symbol` to the alphabet, see [`Alphabet::add`].
    pub fn add_symbol(&mut self, symbol: Symbol) -> bool {
        self.alphabet.add(symbol)
    }

    /// Removes `symbol` from the alphabet together with all transitions labeled by it.
    pub fn remove_symbol(&mut self, symbol: Symbol) -> bool {
        if !self.alphabet.remove(symbol) {
            return false;
        }
        self.transitions.retain(|_, label, _| label != symbol);
        true
    }

    /// Replaces the alphabet. Transitions on symbols which are not part of the new alphabet are
    /// dropped.
    pub fn set_alphabet(&mut self, alphabet: Alphabet) {
        self.transitions.retain(|_, symbol, _| alphabet.contains(symbol));
        self.alphabet = alphabet;
    }

    /// Iterates over the states in ascending order of their names.
    pub fn states(&self) -> impl Iterator<Item = &StateId> {
        self.states.iter()
    }

    /// Iterates over views of all states, which include whether a state is initial and/or final.
    pub fn states_with_roles(&self) -> impl Iterator<Item = State<'_>> {
        self.states
            .iter()
            .map(|id| State::new(id, self.is_initial(id.name()), self.is_final(id.name())))
    }

    /// Returns a view of the state with the given name, if it exists.
    pub fn state(&self, name: &str) -> Option<State<'_>> {
        let id = self.states.get(name)?;
        Some(State::new(id, self.is_initial(name), self.is_final(name)))
    }

    /// The number of states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Returns true if a state with the given name exists.
    pub fn contains_state(&self, name: &str) -> bool {
        self.states.contains(name)
    }

    /// Adds a state, returns true if it did not exist before. Names that are not
    /// [admissible](is_admissible_name) are refused and false is returned.
    pub fn add_state(&mut self, state: impl Into<StateId>) -> bool {
        let state = state.into();
        if !is_admissible_name(state.name()) {
            trace!("refusing state with inadmissible name {:?}", state.name());
            return false;
        }
        self.states.insert(state)
    }

    /// Removes a state. If it was the initial state, the automaton no longer has one, if it was
    /// final it is no longer part of the final states, and all transitions from or to the state are
    /// removed. Returns true if the state existed.
    pub fn remove_state(&mut self, name: &str) -> bool {
        if !self.states.remove(name) {
            return false;
        }
        if self.is_initial(name) {
            self.initial = None;
        }
        self.finals.remove(name);
        self.transitions
            .retain(|from, _, to| from.name() != name && to.name() != name);
        trace!("removed state {name} and all transitions touching it");
        true
    }

    /// Removes all states, which also clears the initial state, the final states and the
    /// transitions. The alphabet is kept.
    pub fn clear_states(&mut self) {
        self.states.clear();
        self.initial = None;
        self.finals.clear();
        self.transitions.clear();
    }

    /// The initial state, if one is set.
    pub fn initial(&self) -> Option<&StateId> {
        self.initial.as_ref()
    }

    /// Returns true if the state with the given name is the initial state.
    pub fn is_initial(&self, name: &str) -> bool {
        self.initial.as_ref().is_some_and(|q| q.name() == name)
    }

    /// Makes the state with the given name the initial one, replacing the previous initial state.
    /// Does nothing and returns false if no such state exists.
    pub fn set_initial(&mut self, name: &str) -> bool {
        match self.states.get(name) {
            Some(id) => {
                self.initial = Some(id.clone());
                true
            }
            None => false,
        }
    }

    /// Unsets the initial state.
    pub fn clear_initial(&mut self) {
        self.initial = None;
    }

    /// Iterates over the final states in ascending order.
    pub fn finals(&self) -> impl Iterator<Item = &StateId> {
        self.finals.iter()
    }

    /// Returns true if the state with the given name is final.
    pub fn is_final(&self, name: &str) -> bool {
        self.finals.contains(name)
    }

    /// Marks the state with the given name as final. Returns false if no such state exists.
    pub fn add_final(&mut self, name: &str) -> bool {
        match self.states.get(name) {
            Some(id) => {
                self.finals.insert(id.clone());
                true
            }
            None => false,
        }
    }

    /// Removes the state with the given name from the final states, returns true if it was final.
    pub fn remove_final(&mut self, name: &str) -> bool {
        self.finals.remove(name)
    }

    /// Makes no state final.
    pub fn clear_finals(&mut self) {
        self.finals.clear();
    }

    /// The transition function.
    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    /// Adds the transition `from --symbol--> to`, replacing an existing transition from `from`
    /// on `symbol`. The transition is only added if both states exist and `symbol` is in the
    /// alphabet, otherwise nothing happens and false is returned.
    pub fn add_transition(&mut self, from: &str, symbol: Symbol, to: &str) -> bool {
        let (Some(source), Some(target)) = (self.states.get(from), self.states.get(to)) else {
            return false;
        };
        if !self.alphabet.contains(symbol) {
            return false;
        }
        if let Some(previous) = self
            .transitions
            .set(source.clone(), symbol, target.clone())
        {
            trace!("transition {from} --{symbol}--> {previous} replaced by target {to}");
        }
        true
    }

    /// Removes the transition from `from` on `symbol`, returns true if it existed.
    pub fn remove_transition(&mut self, from: &str, symbol: Symbol) -> bool {
        self.transitions.remove(from, symbol)
    }

    /// Removes all transitions.
    pub fn clear_transitions(&mut self) {
        self.transitions.clear();
    }

    /// Returns the state reached from `from` on `symbol`, if that transition is defined.
    pub fn successor(&self, from: &str, symbol: Symbol) -> Option<&StateId> {
        self.transitions.get(from, symbol)
    }

    /// An automaton is valid if it has an initial state, at least one state, a non-empty alphabet
    /// and at least one final state. Whether every cell of the transition table is filled is
    /// irrelevant here, see [`Automaton::is_total`] for that.
    pub fn is_valid(&self) -> bool {
        self.initial.is_some()
            && !self.states.is_empty()
            && !self.alphabet.is_empty()
            && !self.finals.is_empty()
    }

    /// Lists the pairs of state and symbol for which no transition is defined, ordered by state
    /// and then by symbol.
    pub fn missing_transitions(&self) -> Vec<(&StateId, Symbol)> {
        self.states
            .iter()
            .flat_map(|q| {
                self.alphabet
                    .symbols()
                    .filter(move |a| !self.transitions.has(q.name(), *a))
                    .map(move |a| (q, a))
            })
            .collect()
    }

    /// Returns true if a transition is defined for every state and every symbol.
    pub fn is_total(&self) -> bool {
        self.states.iter().all(|q| {
            self.alphabet
                .symbols()
                .all(|a| self.transitions.has(q.name(), a))
        })
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "alphabet: {}", self.alphabet.show())?;
        writeln!(f, "states: {}", StateId::show_collection(self.states.iter()))?;
        writeln!(f, "initial: {}", self.initial.show())?;
        writeln!(f, "final: {}", StateId::show_collection(self.finals.iter()))?;
        write!(f, "{}", self.transition_table())
    }
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automaton")
            .field("alphabet", &self.alphabet)
            .field("states", &self.states)
            .field("initial", &self.initial)
            .field("finals", &self.finals)
            .field(
                "transitions",
                &self
                    .transitions
                    .iter()
                    .map(|(from, symbol, to)| format!("{from} -{symbol}-> {to}"))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
