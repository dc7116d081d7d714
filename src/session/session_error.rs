use crate::knowledge_base::LoadError;
use crate::model::TreeError;
use crate::parser::ParsingError;
use crate::tracer::TraceError;
use std::io;
use thiserror::Error;

/// Error ending a session mode.
///
/// [SessionError::UserQuit] is a regular way to end a session,
/// not a failure.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("User quit")]
    UserQuit,

    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl SessionError {
    pub fn is_user_quit(&self) -> bool {
        matches!(self, SessionError::UserQuit)
    }
}

impl From<LoadError> for SessionError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Parsing(e) => SessionError::Parsing(e),
            LoadError::Tree(e) => SessionError::Tree(e),
        }
    }
}
