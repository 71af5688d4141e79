use std::fmt::{self, Display, Write};

use itertools::Itertools;

use crate::{automaton::Automaton, state::StateId};

fn quoted<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    items.into_iter().map(|item| format!("\"{item}\"")).join(", ")
}

/// Writes `automaton` in the persisted text format to `w`.
///
/// Symbols, states and final states are listed in ascending order, transitions are ordered by
/// their source state and then by their symbol. Only transitions that are actually defined are
/// written, there are no placeholders for missing cells.
pub fn write_automaton<W: Write>(automaton: &Automaton, w: &mut W) -> fmt::Result {
    w.write_str("{\n")?;
    writeln!(
        w,
        "  \"alphabet\": [{}],",
        quoted(automaton.alphabet().symbols())
    )?;
    writeln!(w, "  \"states\": [{}],", quoted(automaton.states()))?;
    writeln!(
        w,
        "  \"initialState\": \"{}\",",
        automaton.initial().map_or("", StateId::name)
    )?;
    writeln!(w, "  \"finalStates\": [{}],", quoted(automaton.finals()))?;

    w.write_str("  \"transitions\": [\n")?;
    let mut records = automaton.transitions().iter().peekable();
    while let Some((from, symbol, to)) = records.next() {
        write!(
            w,
            "    {{\"from\": \"{from}\", \"symbol\": \"{symbol}\", \"to\": \"{to}\"}}"
        )?;
        if records.peek().is_some() {
            w.write_char(',')?;
        }
        w.write_char('\n')?;
    }
    w.write_str("  ]\n}\n")
}

/// Displays an automaton in the persisted text format.
#[derive(Clone, Copy, Debug)]
pub struct TextFormat<'a>(pub &'a Automaton);

impl Display for TextFormat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_automaton(self.0, f)
    }
}

/// Returns the persisted text representation of `automaton`.
pub fn to_text(automaton: &Automaton) -> String {
    TextFormat(automaton).to_string()
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, tests::ends_with_ab};

    use super::to_text;
    use crate::codec::from_text;

    #[test]
    fn writes_the_example() {
        let expected = r#"{
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
        assert_eq!(to_text(&ends_with_ab()), expected);
    }

    #[test]
    fn writes_partial_automata() {
        let mut dfa = Automaton::with_alphabet(alphabet!('1', '0'));
        dfa.add_state("q1");
        dfa.add_state("q10");
        dfa.add_state("q2");
        let expected = r#"{
  "alphabet": ["0", "1"],
  "states": ["q1", "q10", "q2"],
  "initialState": "",
  "finalStates": [],
  "transitions": [
  ]
}
"#;
        assert_eq!(to_text(&dfa), expected);
    }

    #[test]
    fn missing_cells_are_not_written() {
        let mut dfa = ends_with_ab();
        dfa.remove_transition("q2", 'a');
        dfa.remove_transition("q2", 'b');
        let text = to_text(&dfa);
        assert!(!text.contains("\"from\": \"q2\""));
        assert!(text.contains("{\"from\": \"q1\", \"symbol\": \"b\", \"to\": \"q2\"}\n  ]"));
    }

    #[test]
    fn every_written_automaton_is_read_back() {
        let dfa = Automaton::builder()
            .with_edges([
                ("q0", 'a', "q1"),
                ("q0", ',', "q1"),
                ("left,right", 'a', "q0"),
                ("q1", 'a', "left right"),
            ])
            .with_initial("q0")
            .with_finals(["q1"])
            .into_automaton();
        assert_eq!(dfa.alphabet(), &alphabet!('a'));
        assert!(!dfa.contains_state("left,right"));
        assert!(dfa.contains_state("left right"));

        let text = to_text(&dfa);
        assert!(text.contains("\"states\": [\"left right\", \"q0\", \"q1\"],"));
        for mode in [ParseMode::Lenient, ParseMode::Strict] {
            assert_eq!(from_text(&text, mode).unwrap(), dfa);
        }
    }
}
