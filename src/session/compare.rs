//! Compare mode: shared and distinct properties of two objects.

use crate::knowledge_base::KnowledgeBase;
use crate::session::Outcome;
use crate::session::console::{Console, ask_label};
use crate::session::describe::not_found_phrase;
use crate::session::session_error::SessionError;
use crate::tracer::{self, join_properties};
use tracing::info;

/// Asks for two objects and says what they share and what sets them apart.
///
/// If either object is unknown the round ends as [Outcome::NotFound]
/// for the first one missing.
pub fn compare<C: Console + ?Sized>(
    kb: &KnowledgeBase,
    console: &mut C,
) -> Result<Outcome, SessionError> {
    let max_len = kb.config().max_label_len;
    let first = ask_label(console, "Enter the first object to compare:", max_len)?;
    let second = ask_label(console, "Enter the second object to compare:", max_len)?;

    let tree = kb.tree();
    let mut paths = Vec::with_capacity(2);
    for name in [&first, &second] {
        match tracer::locate(tree, name)? {
            Some(path) => paths.push(path),
            None => {
                console.say(&not_found_phrase(name))?;
                info!(%name, "Object to compare not found");
                return Ok(Outcome::NotFound(name.clone()));
            }
        }
    }

    let contrast = tracer::contrast(tree, &paths[0], &paths[1])?;

    if contrast.shared.is_empty() {
        console.say(&format!("{first} and {second} have nothing in common"))?;
    } else {
        console.say(&format!(
            "{first} and {second} are similar in that they both are: {}",
            join_properties(&contrast.shared)
        ))?;
    }
    if !contrast.first.is_empty() || !contrast.second.is_empty() {
        console.say(&format!("But {first} is: {}", join_properties(&contrast.first)))?;
        console.say(&format!("And {second} is: {}", join_properties(&contrast.second)))?;
    }

    Ok(Outcome::Compared {
        first,
        second,
        contrast,
    })
}
