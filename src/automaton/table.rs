use owo_colors::OwoColorize;

use crate::state::State;

use super::Automaton;

impl Automaton {
    /// Returns a string representation of the transition table. There is one row per state and
    /// one column per symbol; missing transitions show up as `-`. The initial state is prefixed
    /// with `→` and final states with `*`.
    pub fn transition_table(&self) -> String {
        self.build_transition_table(|state| state.decorated())
    }

    /// Like [`Automaton::transition_table`], but additionally highlights the initial and the
    /// final states with ANSI colors, meant for terminal output.
    pub fn colored_transition_table(&self) -> String {
        self.build_transition_table(|state| {
            let label = state.decorated();
            match (state.is_initial(), state.is_final()) {
                (_, true) => label.green().bold().to_string(),
                (true, false) => label.cyan().bold().to_string(),
                (false, false) => label,
            }
        })
    }

    fn build_transition_table<SD>(&self, state_decorator: SD) -> String
    where
        SD: Fn(State<'_>) -> String,
    {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(self.alphabet.symbols().map(String::from)),
        );
        for state in self.states_with_roles() {
            let mut row = vec![state_decorator(state)];
            for symbol in self.alphabet.symbols() {
                match self.successor(state.id().name(), symbol) {
                    Some(target) => row.push(target.to_string()),
                    None => row.push("-".to_string()),
                }
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::ends_with_ab;

    #[test]
    fn table_lists_every_cell() {
        let mut dfa = ends_with_ab();
        dfa.remove_transition("q2", 'b');
        let table = dfa.transition_table();
        let rows: Vec<_> = table.lines().collect();

        assert!(rows.iter().any(|row| row.contains("State") && row.contains('a')));
        assert!(rows
            .iter()
            .any(|row| row.contains("→q0") && row.contains("q1") && row.contains("q0")));
        assert!(rows.iter().any(|row| row.contains("*q2") && row.contains('-')));
        assert!(!table.contains("→*"));
    }

    #[test]
    fn colored_table_keeps_content() {
        let dfa = ends_with_ab();
        let colored = dfa.colored_transition_table();
        assert!(colored.contains("*q2"));
        assert!(colored.contains("→q0"));
        assert!(colored.contains('\u{1b}'));
    }
}
