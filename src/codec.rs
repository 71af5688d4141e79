//! The persisted text format is a small, line-oriented subset of JSON:
//!
//! ```text
//! {
//!   "alphabet": ["a", "b"],
//!   "states": ["q0", "q1", "q2"],
//!   "initialState": "q0",
//!   "finalStates": ["q2"],
//!   "transitions": [
//!     {"from": "q0", "symbol": "a", "to": "q1"},
//!     {"from": "q1", "symbol": "b", "to": "q2"}
//!   ]
//! }
//! ```
//!
//! Each section occupies a single line and every transition record occupies a line of its own.
//! An automaton without initial state is written with `"initialState": ""`.
use std::{fs, io, path::Path, path::PathBuf};

use thiserror::Error;
use tracing::{debug, error};

use crate::automaton::Automaton;

pub mod input;
pub use input::{from_text, ParseError, ParseErrorKind, ParseMode};

pub mod output;
pub use output::{to_text, write_automaton, TextFormat};

/// Errors that occur while saving an automaton to or loading it from a file.
#[derive(Error, Debug)]
pub enum PersistError {
    /// The file could not be read.
    #[error("could not read {}: {source}", .path.display())]
    Load {
        /// The file that was to be read.
        path: PathBuf,
        /// The underlying io error.
        source: io::Error,
    },
    /// The file could not be written.
    #[error("could not write {}: {source}", .path.display())]
    Save {
        /// The file that was to be written.
        path: PathBuf,
        /// The underlying io error.
        source: io::Error,
    },
    /// The file was read but its content is not a valid automaton.
    #[error("invalid automaton in {}: {source}", .path.display())]
    Parse {
        /// The file that was read.
        path: PathBuf,
        /// What is wrong with its content.
        source: ParseError,
    },
}

/// Writes `automaton` to `path`, replacing the file if it exists.
pub fn save(automaton: &Automaton, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    fs::write(path, to_text(automaton)).map_err(|source| {
        error!("saving automaton to {} failed: {source}", path.display());
        PersistError::Save {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!("saved automaton to {}", path.display());
    Ok(())
}

/// Reads an automaton from `path`. See [`from_text`] for how `mode` affects parsing.
pub fn load(path: impl AsRef<Path>, mode: ParseMode) -> Result<Automaton, PersistError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PersistError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let automaton = from_text(&text, mode).map_err(|source| PersistError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded automaton from {}", path.display());
    Ok(automaton)
}

impl Automaton {
    /// Returns the persisted text representation, see [`to_text`].
    pub fn to_text(&self) -> String {
        to_text(self)
    }

    /// Parses an automaton, see [`from_text`].
    pub fn from_text(text: &str, mode: ParseMode) -> Result<Self, ParseError> {
        from_text(text, mode)
    }

    /// Saves the automaton to a file, see [`save`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        save(self, path)
    }

    /// Loads an automaton from a file, see [`load`].
    pub fn load(path: impl AsRef<Path>, mode: ParseMode) -> Result<Self, PersistError> {
        load(path, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::PersistError;
    use crate::{prelude::*, tests::ends_with_ab};

    #[test_log::test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ends_with_ab.json");

        let dfa = ends_with_ab();
        dfa.save(&path).unwrap();
        let loaded = Automaton::load(&path, ParseMode::Strict).unwrap();
        assert_eq!(loaded, dfa);
        assert_eq!(loaded.shortest_accepted_words(3), vec!["ab", "aab", "bab"]);
    }

    #[test]
    fn loading_a_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Automaton::load(dir.path().join("missing.json"), ParseMode::Lenient);
        assert!(matches!(result, Err(PersistError::Load { .. })));
    }

    #[test]
    fn saving_into_a_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir.json");
        assert!(matches!(
            ends_with_ab().save(path),
            Err(PersistError::Save { .. })
        ));
    }

    #[test]
    fn strict_load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"{\n  \"states\": [\"q0\", \"q0\"]\n}\n").unwrap();

        let error = Automaton::load(file.path(), ParseMode::Strict).unwrap_err();
        match &error {
            PersistError::Parse { source, .. } => assert_eq!(source.line, 2),
            other => panic!("unexpected error {other}"),
        }
        assert!(error.to_string().contains("line 2"));

        let lenient = Automaton::load(file.path(), ParseMode::Lenient).unwrap();
        assert_eq!(lenient.state_count(), 1);
    }
}
