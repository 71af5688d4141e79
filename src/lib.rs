//! Library for incrementally building and running deterministic finite automata (DFA).
//!
//! A DFA is the 5-tuple $(Q, \Sigma, \delta, q_0, F)$: a finite set of named states $Q$, an
//! [`Alphabet`] $\Sigma$ of single-character symbols, a partial transition function
//! $\delta : Q \times \Sigma \to Q$ (see [`TransitionTable`]), an initial state $q_0$ and a set
//! of accepting states $F$. All of this is bundled in the [`Automaton`] aggregate, which knows
//! how to
//! - evaluate a word and report the trace of visited states ([`Automaton::evaluate`]),
//! - decide whether it is complete enough to be used ([`Automaton::is_valid`]),
//! - enumerate its shortest accepted words ([`Automaton::shortest_accepted_words`]),
//! - render itself as a transition table or in graphviz DOT.
//!
//! Automata are persisted in a small line-oriented, JSON-like text format, see [`codec`].
//!
//! The [`session::BuilderSession`] is a façade for front ends which construct an automaton step by
//! step (alphabet, states, initial state, final states, transitions). It validates the user input
//! and guards the order in which these steps happen.
//!
//! ```
//! use dfa_builder::prelude::*;
//!
//! let dfa = Automaton::builder()
//!     .with_edges([("q0", 'a', "q1"), ("q0", 'b', "q0"), ("q1", 'a', "q1"), ("q1", 'b', "q0")])
//!     .with_initial("q0")
//!     .with_finals(["q1"])
//!     .into_automaton();
//! assert!(dfa.accepts("ba"));
//! assert!(!dfa.accepts("ab"));
//! assert_eq!(dfa.shortest_accepted_words(3), vec!["a", "aa", "ba"]);
//! ```
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use dfa_builder::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet,
        alphabet::{Alphabet, Symbol},
        automaton::{
            Automaton, AutomatonBuilder, Evaluation, RunFailure, ShortestAcceptedWords, Step,
            Trace,
        },
        codec::{ParseError, ParseMode, PersistError},
        session::{BuilderError, BuilderLimits, BuilderSession, Stage},
        state::{State, StateId},
        transition_table::TransitionTable,
        word::Word,
        Show,
    };
}

/// Aliases for the collections used throughout the crate.
pub mod math;

/// Module that contains definitions for dealing with alphabets.
#[macro_use]
pub mod alphabet;
pub use alphabet::Alphabet;

/// Names of states and the derived view on their roles.
pub mod state;

/// Finite input words.
pub mod word;

/// The deterministic, partial transition function.
pub mod transition_table;
pub use transition_table::TransitionTable;

/// Defines the [`Automaton`] aggregate together with evaluation, search and rendering.
pub mod automaton;
pub use automaton::Automaton;

/// Reading and writing automata in the persisted text format.
pub mod codec;

/// Step by step construction of an automaton with validated input.
pub mod session;

/// Helper trait which can be used to display states, symbols and collections of those.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state that should be
    /// its name (e.g. `q0`) and for a symbol just the symbol itself.
    fn show(&self) -> String;

    /// Show a collection of the thing, for a collection of states this should be `{q0, q1, q2}`.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!(
            "{{{}}}",
            itertools::Itertools::join(&mut iter.into_iter().map(|x| x.show()), ", ")
        )
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl<S: Show> Show for Option<S> {
    fn show(&self) -> String {
        match self {
            None => "-".to_string(),
            Some(x) => x.show(),
        }
    }
}

impl<S: Show> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}
