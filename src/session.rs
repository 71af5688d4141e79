use std::{fmt, path::Path};

use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    alphabet::{is_reserved, Alphabet, Symbol},
    automaton::{Automaton, Evaluation},
    codec::{self, ParseMode, PersistError},
    math::OrderedSet,
    state::StateId,
};

/// How far the construction of the automaton in a [`BuilderSession`] has progressed.
///
/// The stages are ordered, each command of the session requires that a certain stage has been
/// reached. The stage is never stored, it is derived from the automaton, so that loading a file
/// puts the session into whatever stage the loaded automaton is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Nothing has been defined yet.
    Empty,
    /// The alphabet is known, but there are no states.
    AlphabetDefined,
    /// States exist, but none of them is initial.
    StatesDefined,
    /// The initial state is set, but there are no final states.
    InitialSet,
    /// The automaton is valid, but some transitions are still missing.
    FinalsSet,
    /// Every state has a transition on every symbol.
    TransitionsComplete,
}

impl Stage {
    /// Determines the stage of `automaton`.
    pub fn of(automaton: &Automaton) -> Self {
        if automaton.alphabet().is_empty() {
            Stage::Empty
        } else if automaton.state_count() == 0 {
            Stage::AlphabetDefined
        } else if automaton.initial().is_none() {
            Stage::StatesDefined
        } else if automaton.finals().next().is_none() {
            Stage::InitialSet
        } else if !automaton.is_total() {
            Stage::FinalsSet
        } else {
            Stage::TransitionsComplete
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Empty => "empty",
            Stage::AlphabetDefined => "alphabet defined",
            Stage::StatesDefined => "states defined",
            Stage::InitialSet => "initial state set",
            Stage::FinalsSet => "final states set",
            Stage::TransitionsComplete => "transitions complete",
        };
        write!(f, "{name}")
    }
}

/// Bounds on the size of the automata a [`BuilderSession`] lets users define.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuilderLimits {
    /// Maximal number of symbols in the alphabet.
    pub max_symbols: usize,
    /// Minimal number of states.
    pub min_states: usize,
    /// Maximal number of states.
    pub max_states: usize,
    /// Maximal size of the transition table, i.e. number of states times number of symbols.
    pub max_complexity: usize,
    /// Maximal length of a word that may be evaluated.
    pub max_word_length: usize,
}

impl Default for BuilderLimits {
    fn default() -> Self {
        Self {
            max_symbols: 10,
            min_states: 2,
            max_states: 15,
            max_complexity: 150,
            max_word_length: 50,
        }
    }
}

/// Errors reported by the commands of a [`BuilderSession`]. A command that fails leaves the
/// session unchanged.
#[derive(Error, Debug)]
pub enum BuilderError {
    /// No symbols were given.
    #[error("the alphabet must contain at least one symbol")]
    EmptyAlphabet,
    /// More symbols than allowed by [`BuilderLimits::max_symbols`].
    #[error("the alphabet may contain at most {max} symbols, got {count}")]
    TooManySymbols {
        /// Number of given symbols.
        count: usize,
        /// The limit.
        max: usize,
    },
    /// The list of symbols contains an empty element.
    #[error("the alphabet contains an empty symbol")]
    EmptySymbol,
    /// A symbol consists of more than one character.
    #[error("symbol {0:?} must be a single character")]
    MultiCharSymbol(String),
    /// A symbol that is neither a letter nor a digit.
    #[error("symbol '{0}' is neither a letter nor a digit")]
    NonAlphanumericSymbol(Symbol),
    /// One of the symbols reserved for the empty word.
    #[error("symbol '{0}' is reserved for the empty word")]
    ReservedSymbol(Symbol),
    /// A symbol was given twice.
    #[error("symbol '{0}' is listed more than once")]
    DuplicateSymbol(Symbol),
    /// The requested number of states is outside of the allowed range.
    #[error("the number of states must be between {min} and {max}, got {count}")]
    StateCountOutOfRange {
        /// Requested number of states.
        count: usize,
        /// Smallest allowed number.
        min: usize,
        /// Largest allowed number.
        max: usize,
    },
    /// The transition table would have too many cells.
    #[error("{states} states with {symbols} symbols exceed the maximum of {max} transitions")]
    TooComplex {
        /// Requested number of states.
        states: usize,
        /// Size of the alphabet.
        symbols: usize,
        /// Allowed number of cells.
        max: usize,
    },
    /// There is no state with the given name.
    #[error("state {0} does not exist")]
    UnknownState(String),
    /// The symbol is not part of the alphabet.
    #[error("symbol '{0}' is not part of the alphabet")]
    UnknownSymbol(Symbol),
    /// An empty set of final states was given.
    #[error("at least one final state is required")]
    NoFinalStates,
    /// The word exceeds [`BuilderLimits::max_word_length`].
    #[error("the word has {length} symbols, at most {max} are allowed")]
    WordTooLong {
        /// Length of the word.
        length: usize,
        /// The limit.
        max: usize,
    },
    /// The command needs a later stage than the session is in.
    #[error("cannot {command} before the stage '{required}' is reached, the session is at '{stage}'")]
    OutOfOrder {
        /// What was attempted.
        command: &'static str,
        /// The stage the command needs.
        required: Stage,
        /// The current stage.
        stage: Stage,
    },
    /// The automaton is not valid, see [`Automaton::is_valid`].
    #[error("the automaton needs an alphabet, states, an initial state and final states")]
    Incomplete,
    /// Saving or loading failed.
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Drives the construction of an [`Automaton`] step by step, the way an interactive front end
/// does: first the alphabet, then the states, the initial state, the final states and finally
/// the transitions.
///
/// All input is validated before the automaton is touched, so a failing command has no effect.
/// Defining the alphabet or the states starts over with everything that depends on them.
///
/// ```
/// use dfa_builder::prelude::*;
/// let mut session = BuilderSession::new();
/// session.define_alphabet("a, b").unwrap();
/// session.define_states(2).unwrap();
/// session.set_initial_state("q0").unwrap();
/// session.set_final_states(["q1"]).unwrap();
/// assert_eq!(session.stage(), Stage::FinalsSet);
///
/// session.add_transition("q0", 'a', "q1").unwrap();
/// assert!(session.evaluate("a").unwrap().is_accepted());
/// assert_eq!(session.remaining_transitions().len(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BuilderSession {
    automaton: Automaton,
    limits: BuilderLimits,
    parse_mode: ParseMode,
}

impl BuilderSession {
    /// Starts a session with the default [`BuilderLimits`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session with custom limits.
    pub fn with_limits(limits: BuilderLimits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    /// Sets the [`ParseMode`] used by [`BuilderSession::load`].
    pub fn with_parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = parse_mode;
        self
    }

    /// The limits of this session.
    pub fn limits(&self) -> &BuilderLimits {
        &self.limits
    }

    /// The current stage, derived from the automaton.
    pub fn stage(&self) -> Stage {
        Stage::of(&self.automaton)
    }

    /// The automaton under construction.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Ends the session and hands out the automaton.
    pub fn into_automaton(self) -> Automaton {
        self.automaton
    }

    fn require(&self, command: &'static str, required: Stage) -> Result<(), BuilderError> {
        let stage = self.stage();
        if stage < required {
            return Err(BuilderError::OutOfOrder {
                command,
                required,
                stage,
            });
        }
        Ok(())
    }

    fn log_stage_change(&self, before: Stage) {
        let after = self.stage();
        if before != after {
            debug!("session moved from stage '{before}' to '{after}'");
        }
    }

    /// Parses a comma separated list of symbols. Each symbol is a single letter or digit, the
    /// reserved symbols and duplicates are not allowed.
    fn parse_alphabet(&self, input: &str) -> Result<Alphabet, BuilderError> {
        if input.trim().is_empty() {
            return Err(BuilderError::EmptyAlphabet);
        }
        let elements: Vec<&str> = input.split(',').map(str::trim).collect();
        if elements.len() > self.limits.max_symbols {
            return Err(BuilderError::TooManySymbols {
                count: elements.len(),
                max: self.limits.max_symbols,
            });
        }

        let mut alphabet = Alphabet::new();
        for element in elements {
            let mut chars = element.chars();
            let symbol = match (chars.next(), chars.next()) {
                (None, _) => return Err(BuilderError::EmptySymbol),
                (Some(symbol), None) => symbol,
                (Some(_), Some(_)) => {
                    return Err(BuilderError::MultiCharSymbol(element.to_string()))
                }
            };
            if is_reserved(symbol) {
                return Err(BuilderError::ReservedSymbol(symbol));
            }
            if !symbol.is_alphanumeric() {
                return Err(BuilderError::NonAlphanumericSymbol(symbol));
            }
            if !alphabet.add(symbol) {
                return Err(BuilderError::DuplicateSymbol(symbol));
            }
        }
        Ok(alphabet)
    }

    /// Defines the alphabet from a comma separated list like `"a, b, c"`. On success the session
    /// starts over with an automaton that consists of the alphabet only.
    pub fn define_alphabet(&mut self, input: &str) -> Result<(), BuilderError> {
        let alphabet = self.parse_alphabet(input)?;
        let before = self.stage();
        debug!("defining alphabet {alphabet}");
        self.automaton = Automaton::with_alphabet(alphabet);
        self.log_stage_change(before);
        Ok(())
    }

    /// Creates the states `q0` up to `q{count - 1}`, replacing all states that existed before
    /// together with the initial state, the final states and all transitions.
    pub fn define_states(&mut self, count: usize) -> Result<(), BuilderError> {
        self.require("define states", Stage::AlphabetDefined)?;
        let BuilderLimits {
            min_states,
            max_states,
            max_complexity,
            ..
        } = self.limits;
        if !(min_states..=max_states).contains(&count) {
            return Err(BuilderError::StateCountOutOfRange {
                count,
                min: min_states,
                max: max_states,
            });
        }
        let symbols = self.automaton.alphabet().size();
        if count * symbols > max_complexity {
            return Err(BuilderError::TooComplex {
                states: count,
                symbols,
                max: max_complexity,
            });
        }

        let before = self.stage();
        self.automaton.clear_states();
        for index in 0..count {
            self.automaton.add_state(StateId::numbered(index));
        }
        self.log_stage_change(before);
        Ok(())
    }

    /// Makes the state with the given name initial, replacing the previous initial state.
    pub fn set_initial_state(&mut self, name: &str) -> Result<(), BuilderError> {
        self.require("set the initial state", Stage::StatesDefined)?;
        let before = self.stage();
        if !self.automaton.set_initial(name) {
            return Err(BuilderError::UnknownState(name.to_string()));
        }
        self.log_stage_change(before);
        Ok(())
    }

    /// Replaces the final states. At least one name must be given and all of them must name
    /// existing states.
    pub fn set_final_states<I, S>(&mut self, names: I) -> Result<(), BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.require("set the final states", Stage::InitialSet)?;
        let mut finals = OrderedSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if !self.automaton.contains_state(name) {
                return Err(BuilderError::UnknownState(name.to_string()));
            }
            finals.insert(name.to_string());
        }
        if finals.is_empty() {
            return Err(BuilderError::NoFinalStates);
        }

        let before = self.stage();
        self.automaton.clear_finals();
        for name in &finals {
            self.automaton.add_final(name);
        }
        self.log_stage_change(before);
        Ok(())
    }

    /// Sets the transition from `from` on `symbol`, replacing a previous target.
    pub fn add_transition(
        &mut self,
        from: &str,
        symbol: Symbol,
        to: &str,
    ) -> Result<(), BuilderError> {
        self.require("add transitions", Stage::FinalsSet)?;
        for name in [from, to] {
            if !self.automaton.contains_state(name) {
                return Err(BuilderError::UnknownState(name.to_string()));
            }
        }
        if !self.automaton.alphabet().contains(symbol) {
            return Err(BuilderError::UnknownSymbol(symbol));
        }

        let before = self.stage();
        self.automaton.add_transition(from, symbol, to);
        self.log_stage_change(before);
        Ok(())
    }

    /// Evaluates `word` on the automaton, see [`Automaton::evaluate`].
    pub fn evaluate(&self, word: &str) -> Result<Evaluation, BuilderError> {
        let length = word.chars().count();
        if length > self.limits.max_word_length {
            return Err(BuilderError::WordTooLong {
                length,
                max: self.limits.max_word_length,
            });
        }
        if !self.is_complete() {
            return Err(BuilderError::Incomplete);
        }
        let evaluation = self.automaton.evaluate(word);
        trace!("evaluated {word:?}: {}", evaluation.message());
        Ok(evaluation)
    }

    /// Whether the automaton is [valid](Automaton::is_valid).
    pub fn is_complete(&self) -> bool {
        self.automaton.is_valid()
    }

    /// See [`Automaton::shortest_accepted_words`].
    pub fn generate_shortest_words(&self, limit: usize) -> Vec<String> {
        self.automaton.shortest_accepted_words(limit)
    }

    /// The cells of the transition table which are still empty.
    pub fn remaining_transitions(&self) -> Vec<(&StateId, Symbol)> {
        self.automaton.missing_transitions()
    }

    /// The transition table rendered for display, see [`Automaton::transition_table`].
    pub fn transition_table(&self) -> String {
        self.automaton.transition_table()
    }

    /// Saves the automaton to `path`. Only a [complete](BuilderSession::is_complete) automaton can
    /// be saved.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BuilderError> {
        if !self.is_complete() {
            return Err(BuilderError::Incomplete);
        }
        Ok(codec::save(&self.automaton, path)?)
    }

    /// Replaces the automaton with the one stored at `path`. If loading fails, the session is left
    /// as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), BuilderError> {
        let automaton = codec::load(path, self.parse_mode)?;
        let before = self.stage();
        self.automaton = automaton;
        self.log_stage_change(before);
        Ok(())
    }

    /// Starts over with an empty automaton.
    pub fn reset(&mut self) {
        let before = self.stage();
        self.automaton = Automaton::new();
        self.log_stage_change(before);
    }
}
