//! A [KnowledgeTree] together with the file it is persisted in.

use crate::config::Config;
use crate::lisp::{self, LispParser, LispWriter};
use crate::model::{KnowledgeTree, TreeError};
use crate::parser::ParsingError;
use crate::parser::byte_parser::ByteParser;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error("Knowledge file holds an invalid tree: {0}")]
    Tree(#[from] TreeError),
}

/// Knowledge tree with optional backing storage.
///
/// A knowledge base opened from a path that does not exist starts out as a
/// single placeholder root; the file is only created on [save](Self::save).
#[derive(Debug)]
pub struct KnowledgeBase {
    tree: KnowledgeTree,
    storage: Option<PathBuf>,
    config: Config,
}

impl KnowledgeBase {
    /// Reads and verifies the knowledge file at `path`.
    ///
    /// # Errors
    /// * [LoadError::Parsing] - file unreadable or malformed
    /// * [LoadError::Tree] - file is well-formed but does not describe a
    ///   proper binary tree, e.g. a question with only one answer
    pub fn open<P: AsRef<Path>>(path: P, config: Config) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let tree = lisp::read_file(path, &config)?;
        if let Err(e) = tree.verify() {
            warn!(path = %path.display(), error = %e, "Rejecting knowledge file");
            return Err(e.into());
        }

        Ok(Self {
            tree,
            storage: Some(path.to_path_buf()),
            config,
        })
    }

    /// Reads and verifies a knowledge base from text, without backing storage.
    pub fn from_text(text: &str, config: Config) -> Result<Self, LoadError> {
        let mut byte_parser = ByteParser::for_str(text);
        let tree = LispParser::from_config(&config).parse_tree(&mut byte_parser)?;
        tree.verify()?;
        Ok(Self {
            tree,
            storage: None,
            config,
        })
    }

    /// Placeholder knowledge base without backing storage.
    pub fn in_memory(config: Config) -> Self {
        let tree = KnowledgeTree::new(config.placeholder_label.clone())
            .with_max_label_len(config.max_label_len)
            .with_max_depth(config.max_depth);
        Self {
            tree,
            storage: None,
            config,
        }
    }

    pub fn tree(&self) -> &KnowledgeTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut KnowledgeTree {
        &mut self.tree
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> Option<&Path> {
        self.storage.as_deref()
    }

    /// Writes the tree to its backing file.
    ///
    /// # Returns
    /// `Ok(false)` if there is no backing file, `Ok(true)` once written.
    pub fn save(&self) -> io::Result<bool> {
        let Some(path) = &self.storage else {
            return Ok(false);
        };
        lisp::write_file(path, &self.tree, &self.config)?;
        info!(path = %path.display(), objects = self.tree.num_leaves(), "Saved knowledge base");
        Ok(true)
    }

    /// Text the tree would be saved as.
    pub fn to_text(&self) -> String {
        LispWriter::from_config(&self.config).write(&self.tree)
    }
}
