//! Interactive session modes over a [KnowledgeBase].
//!
//! Every mode talks to the user through a [Console] and ends with an
//! [Outcome], or a [SessionError]. [SessionError::UserQuit] is the regular
//! way for the user to leave.
//!
//! # Modes
//! * [guess()] - guess an object, learning it if the guess was wrong
//! * [describe()] - list the properties of an object
//! * [compare()] - shared and distinct properties of two objects
//!
//! [play()] runs the menu loop over a knowledge file.
//!
//! # Example
//! ```
//! use std::io::Cursor;
//! use twentyq::config::Config;
//! use twentyq::knowledge_base::KnowledgeBase;
//! use twentyq::session::{IoConsole, Outcome, guess};
//!
//! let mut kb = KnowledgeBase::from_text(
//!     "(\"is it alive?\" (\"dog\") (\"rock\"))",
//!     Config::default(),
//! )?;
//! let mut console = IoConsole::new(Cursor::new("yes\nyes\n"), Vec::new());
//!
//! assert_eq!(guess(&mut kb, &mut console)?, Outcome::Confirmed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod compare;
pub mod console;
mod describe;
mod guess;
pub mod session_error;

pub use compare::compare;
pub use console::{Console, IoConsole};
pub use describe::describe;
pub use guess::{guess, question_phrase};
pub use session_error::SessionError;

use crate::config::Config;
use crate::knowledge_base::KnowledgeBase;
use crate::model::TreeError;
use crate::tracer::{Contrast, Property};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Result of a completed round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The guess was right
    Confirmed,
    /// A new object was learned; `persisted` if it was saved
    Learned { persisted: bool },
    Described {
        object: String,
        properties: Vec<Property>,
    },
    Compared {
        first: String,
        second: String,
        contrast: Contrast,
    },
    /// The named object is not in the knowledge base
    NotFound(String),
    /// The tree was shown
    Printed,
}

/// Entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Guess,
    Describe,
    Compare,
    Print,
    Quit,
}

pub const MENU: &str = "[G]uess, [D]escribe, [C]ompare, [P]rint or [Q]uit?";

impl Mode {
    /// Mode selected by the first letter of `choice`, case-insensitive.
    pub fn from_choice(choice: &str) -> Option<Mode> {
        match choice.trim().chars().next()?.to_ascii_lowercase() {
            'g' => Some(Mode::Guess),
            'd' => Some(Mode::Describe),
            'c' => Some(Mode::Compare),
            'p' => Some(Mode::Print),
            'q' => Some(Mode::Quit),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Guess => "guess",
            Mode::Describe => "describe",
            Mode::Compare => "compare",
            Mode::Print => "print",
            Mode::Quit => "quit",
        };
        write!(f, "{name}")
    }
}

/// Shows the menu until a valid mode is chosen.
///
/// # Errors
/// [SessionError::UserQuit] at end of input.
pub fn choose_mode<C: Console + ?Sized>(console: &mut C) -> Result<Mode, SessionError> {
    loop {
        console.say(MENU)?;
        let Some(choice) = console.read_line(16)? else {
            return Err(SessionError::UserQuit);
        };
        match Mode::from_choice(&choice) {
            Some(mode) => return Ok(mode),
            None => console.say(&format!("Unknown mode \"{choice}\""))?,
        }
    }
}

/// Runs a single round of `mode`.
///
/// # Errors
/// [SessionError::UserQuit] for [Mode::Quit], otherwise as the mode itself.
pub fn run<C: Console + ?Sized>(
    mode: Mode,
    kb: &mut KnowledgeBase,
    console: &mut C,
) -> Result<Outcome, SessionError> {
    match mode {
        Mode::Guess => guess(kb, console),
        Mode::Describe => describe(kb, console),
        Mode::Compare => compare(kb, console),
        Mode::Print => {
            console.say(&kb.tree().to_string())?;
            Ok(Outcome::Printed)
        }
        Mode::Quit => Err(SessionError::UserQuit),
    }
}

/// Menu loop over the knowledge file at `path`.
///
/// The file is read and verified before the menu is first shown, and
/// re-read for every further round, so unsaved edits last one round.
/// Rounds failing on the tree itself are reported and the loop goes on.
///
/// # Errors
/// * [SessionError::Parsing] / [SessionError::Tree] - the file cannot be
///   loaded, before or between rounds
/// * [SessionError::Io] - console or storage failure
///
/// Leaving through [Mode::Quit] or end of input is `Ok`.
pub fn play<C: Console + ?Sized>(
    path: &Path,
    config: &Config,
    console: &mut C,
) -> Result<(), SessionError> {
    let mut kb = KnowledgeBase::open(path, config.clone())?;

    loop {
        let mode = match choose_mode(console) {
            Ok(Mode::Quit) | Err(SessionError::UserQuit) => break,
            Ok(mode) => mode,
            Err(e) => return Err(e),
        };

        match run(mode, &mut kb, console) {
            Ok(outcome) => report(&outcome),
            Err(SessionError::UserQuit) => break,
            Err(SessionError::Tree(e @ TreeError::DepthExceeded(..))) => {
                warn!(error = %e, %mode, "Round aborted");
                console.say(&format!("Cannot learn any more objects there: {e}"))?;
            }
            Err(e @ (SessionError::Tree(_) | SessionError::Trace(_))) => {
                warn!(error = %e, %mode, "Round aborted");
                console.say(&format!("Knowledge base is inconsistent: {e}"))?;
            }
            Err(e) => return Err(e),
        }

        kb = KnowledgeBase::open(path, config.clone())?;
    }

    info!("User quit");
    console.say("Bye Bye")?;
    Ok(())
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Learned { persisted: false } => info!("Learned object was not saved"),
        Outcome::NotFound(name) => info!(%name, "Object not found"),
        _ => info!(?outcome, "Round finished"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_choice() {
        assert_eq!(Mode::from_choice("g"), Some(Mode::Guess));
        assert_eq!(Mode::from_choice(" Describe"), Some(Mode::Describe));
        assert_eq!(Mode::from_choice("Q"), Some(Mode::Quit));
        assert_eq!(Mode::from_choice("x"), None);
        assert_eq!(Mode::from_choice(""), None);
    }
}
