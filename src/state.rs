use std::{borrow::Borrow, fmt};

use crate::{alphabet::DELIMITERS, Show};

/// Returns true if `name` can be used as the name of a state: it is not empty, has no leading or
/// trailing whitespace and contains none of the [`DELIMITERS`].
pub fn is_admissible_name(name: &str) -> bool {
    !name.is_empty() && name.trim() == name && !name.contains(&DELIMITERS[..])
}

/// The name of a state. Two states are the same iff their names are equal, so the name is all
/// there is to a state. Whether a state is initial or accepting is decided by the
/// [`crate::Automaton`] it belongs to, see [`State`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(String);

impl StateId {
    /// Creates a state with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates the `index`-th state of the default naming scheme `q0, q1, q2, ...`.
    pub fn numbered(index: usize) -> Self {
        Self(format!("q{index}"))
    }

    /// Returns the name of the state.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StateId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StateId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&StateId> for StateId {
    fn from(value: &StateId) -> Self {
        value.clone()
    }
}

impl Borrow<str> for StateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StateId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StateId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Show for StateId {
    fn show(&self) -> String {
        self.0.clone()
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A read-only view on a state of an automaton, combining its name with the roles it currently
/// plays. The roles are looked up in the automaton when the view is created and are not stored
/// anywhere else.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct State<'a> {
    id: &'a StateId,
    initial: bool,
    accepting: bool,
}

impl<'a> State<'a> {
    pub(crate) fn new(id: &'a StateId, initial: bool, accepting: bool) -> Self {
        Self {
            id,
            initial,
            accepting,
        }
    }

    /// The name of the state.
    pub fn id(&self) -> &'a StateId {
        self.id
    }

    /// Whether this is the initial state of its automaton.
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Whether this state is accepting.
    pub fn is_final(&self) -> bool {
        self.accepting
    }

    /// The name decorated with `→` for the initial and `*` for accepting states, as used in
    /// transition tables.
    pub fn decorated(&self) -> String {
        let mut out = String::new();
        if self.initial {
            out.push('→');
        }
        if self.accepting {
            out.push('*');
        }
        out.push_str(self.id.name());
        out
    }
}

impl fmt::Display for State<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if self.initial {
            write!(f, " [initial]")?;
        }
        if self.accepting {
            write!(f, " [final]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_the_name() {
        assert_eq!(StateId::new("q0"), StateId::from("q0"));
        assert_eq!(StateId::numbered(3), "q3");
        assert_ne!(StateId::new("q0"), StateId::new("q00"));
        assert!(StateId::new("q1") < StateId::new("q2"));
        assert!(StateId::new("q10") < StateId::new("q2"));
    }

    #[test]
    fn decorated_view() {
        let id = StateId::new("q0");
        assert_eq!(State::new(&id, true, true).decorated(), "→*q0");
        assert_eq!(State::new(&id, false, true).decorated(), "*q0");
        assert_eq!(State::new(&id, false, false).to_string(), "q0");
        assert_eq!(
            State::new(&id, true, false).to_string(),
            "q0 [initial]"
        );
    }
}
