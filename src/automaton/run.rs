use std::fmt;

use thiserror::Error;
use tracing::trace;

use crate::{alphabet::Symbol, state::StateId};

use super::Automaton;

/// A single step of a run: the symbol that was consumed and the state that was reached by it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// The consumed symbol.
    pub symbol: Symbol,
    /// The state reached by consuming `symbol`.
    pub state: StateId,
}

/// The sequence of states visited while consuming a word, starting at the state the run began in.
///
/// The length of a trace is the number of symbols that were consumed successfully, so the trace
/// of the empty word consists of the origin only and has length zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace {
    origin: StateId,
    steps: Vec<Step>,
}

impl Trace {
    /// Starts a trace in `origin`, reserving space for `capacity` steps.
    pub fn with_capacity(origin: StateId, capacity: usize) -> Self {
        Self {
            origin,
            steps: Vec::with_capacity(capacity),
        }
    }

    /// Appends a step.
    pub fn push(&mut self, symbol: Symbol, state: StateId) {
        self.steps.push(Step { symbol, state })
    }

    /// The state in which the run started.
    pub fn origin(&self) -> &StateId {
        &self.origin
    }

    /// The steps taken after the origin.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The number of consumed symbols.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if no symbol was consumed.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The last state of the trace.
    pub fn reached(&self) -> &StateId {
        self.steps
            .last()
            .map(|step| &step.state)
            .unwrap_or(&self.origin)
    }

    /// All visited states in order, including the origin.
    pub fn states(&self) -> impl Iterator<Item = &StateId> {
        std::iter::once(&self.origin).chain(self.steps.iter().map(|step| &step.state))
    }

    /// The consumed prefix of the input.
    pub fn consumed(&self) -> String {
        self.steps.iter().map(|step| step.symbol).collect()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.origin)?;
        for Step { symbol, state } in &self.steps {
            write!(f, " -{symbol}-> {state}")?;
        }
        Ok(())
    }
}

/// The reasons for which a word can not be evaluated to the end.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum RunFailure {
    /// The automaton has no initial state to start from.
    #[error("no initial state is defined")]
    NoInitialState,
    /// The word contains a symbol which is not part of the alphabet.
    #[error("symbol '{symbol}' at position {position} is not part of the alphabet")]
    InvalidSymbol {
        /// The offending symbol.
        symbol: Symbol,
        /// Its position in the word, counted in symbols starting from zero.
        position: usize,
    },
    /// The run got stuck because no transition is defined.
    #[error("no transition from state {state} on symbol '{symbol}' at position {position}")]
    MissingTransition {
        /// The state in which the run got stuck.
        state: StateId,
        /// The symbol for which no transition exists.
        symbol: Symbol,
        /// Position of `symbol` in the word.
        position: usize,
    },
}

/// The outcome of [`Automaton::evaluate`].
///
/// A word is either consumed completely, in which case it is accepted iff the reached state is
/// final, or the evaluation fails with a [`RunFailure`]. A run that gets stuck on a missing
/// transition still carries the trace up to that point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    accepted: bool,
    trace: Option<Trace>,
    failure: Option<RunFailure>,
}

impl Evaluation {
    fn completed(trace: Trace, accepted: bool) -> Self {
        Self {
            accepted,
            trace: Some(trace),
            failure: None,
        }
    }

    fn failed(failure: RunFailure, trace: Option<Trace>) -> Self {
        Self {
            accepted: false,
            trace,
            failure: Some(failure),
        }
    }

    /// Whether the word was accepted.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// The trace of the run. There is none if the run could not even start, i.e. if the
    /// automaton has no initial state or the word contains invalid symbols.
    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Why the evaluation failed, `None` if the word was consumed completely.
    pub fn failure(&self) -> Option<&RunFailure> {
        self.failure.as_ref()
    }

    /// The state in which the run ended, either after consuming the whole word or where it got
    /// stuck.
    pub fn reached(&self) -> Option<&StateId> {
        self.trace.as_ref().map(Trace::reached)
    }

    /// A human readable explanation of the outcome.
    pub fn message(&self) -> String {
        match (&self.failure, self.reached()) {
            (Some(failure), _) => failure.to_string(),
            (None, Some(q)) if self.accepted => format!("word accepted, final state {q}"),
            (None, Some(q)) => format!("word rejected, final state {q} is not accepting"),
            (None, None) => "word rejected".to_string(),
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.accepted { "ACCEPTED" } else { "REJECTED" };
        write!(f, "{verdict}: {}", self.message())?;
        if let Some(trace) = &self.trace {
            write!(f, "\npath: {trace}")?;
        }
        Ok(())
    }
}

impl Automaton {
    /// Runs `word` from the initial state.
    ///
    /// Evaluation fails right away if there is no initial state or if some symbol of `word` is not
    /// in the alphabet, no matter where it occurs. Otherwise the word is consumed from left to right
    /// until it ends or a transition is missing. The empty word is accepted iff the initial state
    /// is final.
    ///
    /// ```
    /// use dfa_builder::prelude::*;
    /// let dfa = Automaton::builder()
    ///     .with_edges([("q0", 'a', "q1"), ("q1", 'b', "q0")])
    ///     .with_initial("q0")
    ///     .with_finals(["q1"])
    ///     .into_automaton();
    /// let result = dfa.evaluate("aba");
    /// assert!(result.is_accepted());
    /// assert_eq!(result.trace().unwrap().to_string(), "q0 -a-> q1 -b-> q0 -a-> q1");
    ///
    /// let stuck = dfa.evaluate("abb");
    /// assert!(!stuck.is_accepted());
    /// assert_eq!(stuck.reached(), Some(&StateId::new("q0")));
    /// assert_eq!(stuck.trace().unwrap().len(), 2);
    /// ```
    pub fn evaluate(&self, word: impl AsRef<str>) -> Evaluation {
        let word = word.as_ref();
        let Some(initial) = &self.initial else {
            return Evaluation::failed(RunFailure::NoInitialState, None);
        };
        if let Some((position, symbol)) = self.alphabet.first_invalid(word) {
            return Evaluation::failed(RunFailure::InvalidSymbol { symbol, position }, None);
        }

        let mut trace = Trace::with_capacity(initial.clone(), word.len());
        for (position, symbol) in word.chars().enumerate() {
            match self.transitions.get(trace.reached().name(), symbol) {
                Some(next) => trace.push(symbol, next.clone()),
                None => {
                    let state = trace.reached().clone();
                    trace!("run of {word:?} stuck in {state} on {symbol} at position {position}");
                    return Evaluation::failed(
                        RunFailure::MissingTransition {
                            state,
                            symbol,
                            position,
                        },
                        Some(trace),
                    );
                }
            }
        }

        let accepted = self.finals.contains(trace.reached());
        trace!("run of {word:?} ended in {}, accepted: {accepted}", trace.reached());
        Evaluation::completed(trace, accepted)
    }

    /// Returns true if `word` is accepted.
    pub fn accepts(&self, word: impl AsRef<str>) -> bool {
        self.evaluate(word).is_accepted()
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, tests::ends_with_ab};

    #[test]
    fn accepting_and_rejecting_runs() {
        let dfa = ends_with_ab();

        let ab = dfa.evaluate("ab");
        assert!(ab.is_accepted());
        assert_eq!(ab.reached(), Some(&StateId::new("q2")));
        assert_eq!(ab.failure(), None);

        let b = dfa.evaluate("b");
        assert!(!b.is_accepted());
        assert_eq!(b.reached(), Some(&StateId::new("q0")));
        assert_eq!(b.failure(), None);

        for (word, accepted) in [("aab", true), ("abb", false), ("abab", true)] {
            assert_eq!(dfa.accepts(word), accepted, "{word}");
        }
    }

    #[test]
    fn empty_word() {
        let mut dfa = ends_with_ab();
        let empty = dfa.evaluate("");
        assert!(!empty.is_accepted());
        assert!(empty.trace().unwrap().is_empty());
        assert_eq!(empty.reached(), Some(&StateId::new("q0")));

        dfa.add_final("q0");
        assert!(dfa.accepts(""));
    }

    #[test]
    fn trace_has_one_step_per_consumed_symbol() {
        let dfa = ends_with_ab();
        let result = dfa.evaluate("babab");
        let trace = result.trace().unwrap();
        assert_eq!(trace.len(), 5);
        assert_eq!(trace.consumed(), "babab");
        assert_eq!(
            trace.states().map(StateId::name).collect::<Vec<_>>(),
            vec!["q0", "q0", "q1", "q2", "q1", "q2"]
        );
        assert_eq!(
            trace.to_string(),
            "q0 -b-> q0 -a-> q1 -b-> q2 -a-> q1 -b-> q2"
        );
    }

    #[test_log::test]
    fn missing_transition_keeps_partial_trace() {
        let mut dfa = ends_with_ab();
        dfa.remove_transition("q1", 'b');

        let result = dfa.evaluate("aaba");
        assert!(!result.is_accepted());
        assert_eq!(
            result.failure(),
            Some(&RunFailure::MissingTransition {
                state: StateId::new("q1"),
                symbol: 'b',
                position: 2,
            })
        );
        assert_eq!(result.trace().unwrap().len(), 2);
        assert_eq!(result.trace().unwrap().consumed(), "aa");
        assert_eq!(
            result.message(),
            "no transition from state q1 on symbol 'b' at position 2"
        );
    }

    #[test]
    fn invalid_symbol_is_reported_before_walking() {
        let mut dfa = ends_with_ab();
        dfa.remove_transition("q0", 'a');

        let result = dfa.evaluate("ac");
        assert_eq!(
            result.failure(),
            Some(&RunFailure::InvalidSymbol {
                symbol: 'c',
                position: 1
            })
        );
        assert!(result.trace().is_none());
        assert_eq!(result.reached(), None);
    }

    #[test]
    fn no_initial_state() {
        let mut dfa = ends_with_ab();
        dfa.clear_initial();
        let result = dfa.evaluate("ab");
        assert_eq!(result.failure(), Some(&RunFailure::NoInitialState));
        assert!(!result.is_accepted());
        assert!(result.trace().is_none());
    }

    #[test]
    fn display() {
        let dfa = ends_with_ab();
        assert_eq!(
            dfa.evaluate("ab").to_string(),
            "ACCEPTED: word accepted, final state q2\npath: q0 -a-> q1 -b-> q2"
        );
        assert_eq!(
            dfa.evaluate("ba").to_string(),
            "REJECTED: word rejected, final state q1 is not accepting\npath: q0 -b-> q0 -a-> q1"
        );
    }
}
