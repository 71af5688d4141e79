use itertools::Itertools;

use crate::state::StateId;

use super::Automaton;

fn dot_ident(state: &StateId) -> String {
    format!("\"{}\"", state.name().replace('\\', "\\\\").replace('"', "\\\""))
}

impl Automaton {
    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    ///
    /// Final states are drawn as double circles and the initial state is marked by an arrow from
    /// an invisible node. Parallel transitions are merged into one edge whose label lists all
    /// symbols.
    pub fn dot_representation(&self) -> String {
        let header = ["digraph A {".to_string(), "rankdir=LR;".to_string()];

        let start = self.initial().into_iter().flat_map(|q| {
            [
                "__start [label=\"\", shape=none, width=0, height=0];".to_string(),
                format!("__start -> {};", dot_ident(q)),
            ]
        });

        let states = self.states_with_roles().map(|state| {
            let shape = if state.is_final() {
                "doublecircle"
            } else {
                "circle"
            };
            format!("{} [shape={shape}];", dot_ident(state.id()))
        });

        let transitions = self
            .transitions()
            .iter()
            .into_group_map_by(|(from, _, to)| (*from, *to))
            .into_iter()
            .sorted()
            .map(|((from, to), edges)| {
                let label = edges.iter().map(|(_, symbol, _)| symbol).join(", ");
                format!("{} -> {} [label=\"{label}\"];", dot_ident(from), dot_ident(to))
            });

        header
            .into_iter()
            .chain(states)
            .chain(start)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::ends_with_ab;

    #[test]
    fn dot_lists_states_and_edges() {
        let dot = ends_with_ab().dot_representation();
        assert!(dot.starts_with("digraph A {"));
        assert!(dot.ends_with('}'));
        assert!(dot.contains("\"q2\" [shape=doublecircle];"));
        assert!(dot.contains("\"q0\" [shape=circle];"));
        assert!(dot.contains("__start -> \"q0\";"));
        assert!(dot.contains("\"q0\" -> \"q1\" [label=\"a\"];"));
        assert!(dot.contains("\"q2\" -> \"q0\" [label=\"b\"];"));
    }

    #[test]
    fn parallel_edges_are_merged() {
        let dfa = crate::Automaton::builder()
            .with_edges([("q0", 'b', "q1"), ("q0", 'a', "q1")])
            .into_automaton();
        let dot = dfa.dot_representation();
        assert!(dot.contains("\"q0\" -> \"q1\" [label=\"a, b\"];"));
        assert!(!dot.contains("__start"));
    }
}
