use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    alphabet::{is_admissible, Symbol},
    automaton::Automaton,
    state::is_admissible_name,
};

/// Determines how [`from_text`] deals with content it can not make sense of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParseMode {
    /// Malformed or inconsistent records are skipped with a warning, the rest of the document is
    /// still loaded.
    #[default]
    Lenient,
    /// The first malformed or inconsistent record aborts parsing with a [`ParseError`].
    Strict,
}

/// Error returned by [`from_text`] in [`ParseMode::Strict`].
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// Line of the offending record, starting at 1.
    pub line: usize,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

/// The different problems a persisted automaton can have.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The line is not part of the format.
    #[error("unrecognized content {0:?}")]
    UnrecognizedLine(String),
    /// A list is not enclosed in brackets.
    #[error("expected a list enclosed in brackets")]
    MalformedList,
    /// A value is not enclosed in double quotes.
    #[error("expected a value enclosed in double quotes")]
    MalformedValue,
    /// A symbol consists of more than one character.
    #[error("symbol {0:?} must be a single character")]
    NotASymbol(String),
    /// A symbol for the empty word, a delimiter of the format or whitespace.
    #[error("symbol '{0}' is reserved")]
    ReservedSymbol(Symbol),
    /// A state name that is empty or contains a delimiter of the format.
    #[error("{0:?} is not a valid state name")]
    InvalidStateName(String),
    /// A symbol or state is listed twice.
    #[error("{0} is listed more than once")]
    Duplicate(String),
    /// A state is referenced but was never declared.
    #[error("state {0} is not declared")]
    UnknownState(String),
    /// A transition is labeled with a symbol that is not part of the alphabet.
    #[error("symbol '{0}' is not part of the alphabet")]
    UnknownSymbol(Symbol),
    /// A transition record lacks one of its fields.
    #[error("transition record has no value for {0:?}")]
    MissingField(&'static str),
}

#[derive(Debug, Default)]
struct RawTransition {
    line: usize,
    from: Option<String>,
    symbol: Option<String>,
    to: Option<String>,
}

/// The sections of a document before they are checked against each other.
#[derive(Debug, Default)]
struct Sections {
    alphabet: Vec<(usize, String)>,
    states: Vec<(usize, String)>,
    initial: Option<(usize, String)>,
    finals: Vec<(usize, String)>,
    transitions: Vec<RawTransition>,
}

struct Parser {
    mode: ParseMode,
}

impl Parser {
    /// In strict mode this turns the problem into an error, otherwise it is logged and parsing
    /// continues.
    fn reject(&self, line: usize, kind: ParseErrorKind) -> Result<(), ParseError> {
        match self.mode {
            ParseMode::Strict => Err(ParseError { line, kind }),
            ParseMode::Lenient => {
                warn!("skipping invalid content in line {line}: {kind}");
                Ok(())
            }
        }
    }

    fn list(&self, line: usize, content: &str) -> Result<Vec<(usize, String)>, ParseError> {
        let (Some(start), Some(end)) = (content.find('['), content.rfind(']')) else {
            self.reject(line, ParseErrorKind::MalformedList)?;
            return Ok(vec![]);
        };
        if end < start {
            self.reject(line, ParseErrorKind::MalformedList)?;
            return Ok(vec![]);
        }
        Ok(content[start + 1..end]
            .split(',')
            .map(|element| element.trim().replace('"', ""))
            .filter(|element| !element.is_empty())
            .map(|element| (line, element))
            .collect())
    }

    fn value(&self, line: usize, content: &str) -> Result<Option<(usize, String)>, ParseError> {
        let after_key = content.find(':').map_or(0, |colon| colon + 1);
        let start = content[after_key..].find('"').map(|i| after_key + i);
        match (start, content.rfind('"')) {
            (Some(start), Some(end)) if start < end => {
                let value = &content[start + 1..end];
                Ok((!value.is_empty()).then(|| (line, value.to_string())))
            }
            _ => {
                self.reject(line, ParseErrorKind::MalformedValue)?;
                Ok(None)
            }
        }
    }

    fn sections(&self, text: &str) -> Result<Sections, ParseError> {
        let mut sections = Sections::default();
        let mut in_transitions = false;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.trim();

            if content.starts_with("\"alphabet\":") {
                sections.alphabet = self.list(line, content)?;
            } else if content.starts_with("\"states\":") {
                sections.states = self.list(line, content)?;
            } else if content.starts_with("\"initialState\":") {
                sections.initial = self.value(line, content)?;
            } else if content.starts_with("\"finalStates\":") {
                sections.finals = self.list(line, content)?;
            } else if content.starts_with("\"transitions\":") {
                in_transitions = true;
            } else if in_transitions && content.contains("\"from\":") {
                sections.transitions.push(RawTransition {
                    line,
                    from: field(content, "from"),
                    symbol: field(content, "symbol"),
                    to: field(content, "to"),
                });
            } else if matches!(content, "" | "{" | "}" | "]" | "]," | "}," | "[") {
                trace!("ignoring structural line {line}");
            } else {
                self.reject(line, ParseErrorKind::UnrecognizedLine(content.to_string()))?;
            }
        }
        Ok(sections)
    }

    /// Reads a symbol from a list element or record field. Longer values are cut down to their
    /// first character in lenient mode.
    fn symbol(&self, line: usize, value: &str) -> Result<Option<Symbol>, ParseError> {
        let mut chars = value.chars();
        let Some(symbol) = chars.next() else {
            return Ok(None);
        };
        if chars.next().is_some() {
            self.reject(line, ParseErrorKind::NotASymbol(value.to_string()))?;
        }
        Ok(Some(symbol))
    }

    fn assemble(&self, sections: Sections) -> Result<Automaton, ParseError> {
        let mut automaton = Automaton::new();

        for (line, element) in sections.alphabet {
            let Some(symbol) = self.symbol(line, &element)? else {
                continue;
            };
            if !is_admissible(symbol) {
                self.reject(line, ParseErrorKind::ReservedSymbol(symbol))?;
            } else if !automaton.add_symbol(symbol) {
                self.reject(line, ParseErrorKind::Duplicate(format!("symbol '{symbol}'")))?;
            }
        }

        for (line, name) in sections.states {
            if !is_admissible_name(&name) {
                self.reject(line, ParseErrorKind::InvalidStateName(name))?;
            } else if !automaton.add_state(name.as_str()) {
                self.reject(line, ParseErrorKind::Duplicate(format!("state {name}")))?;
            }
        }

        if let Some((line, name)) = sections.initial {
            if !automaton.set_initial(&name) {
                self.reject(line, ParseErrorKind::UnknownState(name))?;
            }
        }

        for (line, name) in sections.finals {
            if !automaton.add_final(&name) {
                self.reject(line, ParseErrorKind::UnknownState(name))?;
            }
        }

        for raw in sections.transitions {
            let line = raw.line;
            let missing = [("from", &raw.from), ("symbol", &raw.symbol), ("to", &raw.to)]
                .into_iter()
                .find_map(|(name, value)| value.is_none().then_some(name));
            if let Some(name) = missing {
                self.reject(line, ParseErrorKind::MissingField(name))?;
                continue;
            }
            let (Some(from), Some(label), Some(to)) = (raw.from, raw.symbol, raw.to) else {
                continue;
            };
            let Some(symbol) = self.symbol(line, &label)? else {
                continue;
            };

            if !automaton.contains_state(&from) {
                self.reject(line, ParseErrorKind::UnknownState(from))?;
            } else if !automaton.contains_state(&to) {
                self.reject(line, ParseErrorKind::UnknownState(to))?;
            } else if !automaton.alphabet().contains(symbol) {
                self.reject(line, ParseErrorKind::UnknownSymbol(symbol))?;
            } else {
                automaton.add_transition(&from, symbol, &to);
            }
        }

        Ok(automaton)
    }
}

/// Extracts the quoted value following `"key":` in a transition record. Empty values count as
/// missing.
fn field(content: &str, key: &str) -> Option<String> {
    let pattern = format!("\"{key}\":");
    let after_key = content.find(&pattern)? + pattern.len();
    let start = after_key + content[after_key..].find('"')? + 1;
    let end = start + content[start..].find('"')?;
    let value = &content[start..end];
    (!value.is_empty()).then(|| value.to_string())
}

/// Reads an automaton from its persisted text representation.
///
/// The document is processed line by line and every section is recognized by its key, so the
/// surrounding braces and the indentation do not matter. Sections may appear in any order, they
/// are only checked against each other once the whole document has been read: transitions need
/// their states and their symbol to be declared, the initial and final states must be declared
/// states.
///
/// What happens with content that violates these rules depends on `mode`, see [`ParseMode`].
/// Either way the returned automaton is built from scratch and satisfies all invariants of
/// [`Automaton`].
///
/// ```
/// use dfa_builder::{codec::from_text, prelude::*};
/// let text = r#"{
///   "alphabet": ["0", "1"],
///   "states": ["even", "odd"],
///   "initialState": "even",
///   "finalStates": ["odd"],
///   "transitions": [
///     {"from": "even", "symbol": "1", "to": "odd"},
///     {"from": "odd", "symbol": "1", "to": "even"}
///   ]
/// }"#;
/// let dfa = from_text(text, ParseMode::Strict).unwrap();
/// assert!(dfa.accepts("111"));
/// assert!(!dfa.is_total());
/// ```
pub fn from_text(text: &str, mode: ParseMode) -> Result<Automaton, ParseError> {
    let parser = Parser { mode };
    let sections = parser.sections(text)?;
    let automaton = parser.assemble(sections)?;
    debug!(
        "parsed automaton with {} symbols, {} states and {} transitions",
        automaton.alphabet().size(),
        automaton.state_count(),
        automaton.transitions().size()
    );
    Ok(automaton)
}

#[cfg(test)]
mod tests {
    use super::{from_text, ParseErrorKind};
    use crate::{codec::to_text, prelude::*, tests::ends_with_ab};

    const EXAMPLE: &str = r#"{
  "alphabet": ["a", "b"],
  "states": ["q0", "q1", "q2"],
  "initialState": "q0",
  "finalStates": ["q2"],
  "transitions": [
    {"from": "q0", "symbol": "a", "to": "q1"},
    {"from": "q0", "symbol": "b", "to": "q0"},
    {"from": "q1", "symbol": "a", "to": "q1"},
    {"from": "q1", "symbol": "b", "to": "q2"},
    {"from": "q2", "symbol": "a", "to": "q1"},
    {"from": "q2", "symbol": "b", "to": "q0"}
  ]
}
"#;

    #[test]
    fn parses_the_example() {
        for mode in [ParseMode::Lenient, ParseMode::Strict] {
            let dfa = from_text(EXAMPLE, mode).unwrap();
            assert_eq!(dfa, ends_with_ab());
        }
    }

    #[test]
    fn written_text_is_read_back() {
        let mut dfa = ends_with_ab();
        dfa.remove_transition("q2", 'a');
        dfa.add_final("q0");
        let text = to_text(&dfa);
        assert_eq!(from_text(&text, ParseMode::Strict).unwrap(), dfa);

        let empty = Automaton::new();
        assert_eq!(
            from_text(&to_text(&empty), ParseMode::Strict).unwrap(),
            empty
        );
    }

    #[test]
    fn sections_are_order_independent() {
        let text = r#"{
"transitions": [
{"from": "s", "symbol": "x", "to": "t"}
],
"finalStates": ["t"],
"initialState": "s",
"states": ["s", "t"],
"alphabet": ["x"]
}"#;
        let dfa = from_text(text, ParseMode::Strict).unwrap();
        assert!(dfa.accepts("x"));
        assert_eq!(dfa.initial(), Some(&StateId::new("s")));
    }

    #[test]
    fn missing_initial_state_is_allowed() {
        let text = "\"alphabet\": [\"a\"]\n\"states\": [\"q0\"]\n\"initialState\": \"\",";
        let dfa = from_text(text, ParseMode::Strict).unwrap();
        assert_eq!(dfa.initial(), None);
        assert_eq!(dfa.state_count(), 1);
    }

    #[test_log::test]
    fn lenient_mode_skips_bad_records() {
        let text = r#"{
  "alphabet": ["a", "bc", "ε"],
  "states": ["q0", "q1"],
  "initialState": "q0",
  "finalStates": ["q1", "q7"],
  "comment": "hello",
  "transitions": [
    {"from": "q0", "symbol": "a", "to": "q1"},
    {"from": "q0", "symbol": "z", "to": "q1"},
    {"from": "q1", "symbol": "a", "to": "q9"},
    {"from": "q1", "symbol": "b"}
  ]
}"#;
        let dfa = from_text(text, ParseMode::Lenient).unwrap();
        assert_eq!(dfa.alphabet(), &alphabet!('a', 'b'));
        assert_eq!(dfa.finals().collect::<Vec<_>>(), vec!["q1"]);
        assert_eq!(dfa.transitions().size(), 1);
        assert_eq!(dfa.successor("q0", 'a'), Some(&StateId::new("q1")));
    }

    #[test]
    fn strict_mode_reports_lines() {
        let cases = [
            (
                "\"alphabet\": [\"a\", \"bc\"]",
                1,
                ParseErrorKind::NotASymbol("bc".into()),
            ),
            (
                "\"alphabet\": [\"a\"]\n\"states\": [\"q0\"]\n\"finalStates\": [\"q1\"]",
                3,
                ParseErrorKind::UnknownState("q1".into()),
            ),
            (
                "\"alphabet\": [\"a\"]\n\"states\": [\"q0\"]\n\"transitions\": [\n{\"from\": \"q0\", \"symbol\": \"b\", \"to\": \"q0\"}",
                4,
                ParseErrorKind::UnknownSymbol('b'),
            ),
            (
                "\"transitions\": [\n{\"from\": \"q0\", \"to\": \"q0\"}",
                2,
                ParseErrorKind::MissingField("symbol"),
            ),
            ("{\n  nonsense\n}", 2, ParseErrorKind::UnrecognizedLine("nonsense".into())),
            ("\"alphabet\": \"a\"", 1, ParseErrorKind::MalformedList),
            ("\"initialState\": q0", 1, ParseErrorKind::MalformedValue),
            (
                "\"alphabet\": [\"λ\"]",
                1,
                ParseErrorKind::ReservedSymbol('λ'),
            ),
            (
                "\"states\": [\"q0\", \"a]b\"]",
                1,
                ParseErrorKind::InvalidStateName("a]b".into()),
            ),
        ];
        for (text, line, kind) in cases {
            let error = from_text(text, ParseMode::Strict).unwrap_err();
            assert_eq!(error.line, line, "{text}");
            assert_eq!(error.kind, kind, "{text}");
        }
    }

    #[test]
    fn error_display_mentions_line() {
        let error = from_text("\"states\": [\"q0\", \"q0\"]", ParseMode::Strict).unwrap_err();
        assert_eq!(error.to_string(), "line 1: state q0 is listed more than once");
    }
}
