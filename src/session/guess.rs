//! Guess mode: walk the tree by yes/no answers, learn from wrong guesses.

use crate::knowledge_base::KnowledgeBase;
use crate::model::{Branch, NodeIndex, TreeError};
use crate::session::Outcome;
use crate::session::console::{Console, ask_label, ask_yes_no};
use crate::session::session_error::SessionError;
use tracing::{debug, info};

/// Plays one round of guessing on `kb`.
///
/// Starting at the root, every label is asked as a yes/no question. At a
/// question, yes continues left and no right. At a leaf, yes ends the round
/// as [Outcome::Confirmed]; no asks for the object and a question telling it
/// apart, splits the leaf and offers to save ([Outcome::Learned]).
///
/// # Errors
/// * [SessionError::UserQuit] - user declined to continue or input ended
/// * [SessionError::Tree] - a node with exactly one child was reached,
///   or the split failed
/// * [SessionError::Io] - console or saving failed
pub fn guess<C: Console + ?Sized>(
    kb: &mut KnowledgeBase,
    console: &mut C,
) -> Result<Outcome, SessionError> {
    let mut current = kb.tree().root_index();

    loop {
        let node = kb
            .tree()
            .get(current)
            .ok_or(TreeError::InvalidIndex(current))?;
        if node.is_degenerate() {
            return Err(TreeError::UnexpectedNode(current).into());
        }

        let yes = ask_yes_no(console, &question_phrase(node.label()))?;
        match node.children() {
            Some((left, right)) => {
                current = match Branch::from_answer(yes) {
                    Branch::Left => left,
                    Branch::Right => right,
                }
            }
            None if yes => {
                console.say("Easy!")?;
                info!(object = node.label(), "Guessed object");
                return Ok(Outcome::Confirmed);
            }
            None => return learn(kb, console, current),
        }
    }
}

/// Turns a label into the question shown to the user.
///
/// Labels already phrased as a question are asked verbatim.
pub fn question_phrase(label: &str) -> String {
    if label.ends_with('?') {
        label.to_string()
    } else {
        format!("Is it {label}?")
    }
}

fn learn<C: Console + ?Sized>(
    kb: &mut KnowledgeBase,
    console: &mut C,
    leaf: NodeIndex,
) -> Result<Outcome, SessionError> {
    let max_len = kb.tree().max_label_len();
    let old_object = kb.tree().node(leaf).label().to_string();

    let new_object = ask_label(console, "What did you guess?", max_len)?;
    let question = ask_label(
        console,
        &format!("What is the difference between {new_object} and {old_object}?"),
        max_len,
    )?;

    kb.tree_mut().split(leaf, &new_object, &question)?;
    info!(%new_object, %old_object, %question, "Learned new object");

    let persisted = if console.confirm("Do you want to save edits in data base?")? {
        match kb.storage() {
            Some(path) => {
                debug!(path = %path.display(), "Saving learned object");
                kb.save()?;
                console.say("Data successfully updated")?;
                true
            }
            None => {
                debug!("Knowledge base has no backing file, not saving");
                false
            }
        }
    } else {
        false
    };

    Ok(Outcome::Learned { persisted })
}
