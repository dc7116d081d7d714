//! Describe mode: list the properties leading to an object.

use crate::knowledge_base::KnowledgeBase;
use crate::session::Outcome;
use crate::session::console::{Console, ask_label};
use crate::session::session_error::SessionError;
use crate::tracer::{self, Property, join_properties};
use tracing::info;

/// Asks for an object and says its properties, e.g. `dog - alive, barks`.
///
/// An unknown object ends the round as [Outcome::NotFound].
pub fn describe<C: Console + ?Sized>(
    kb: &KnowledgeBase,
    console: &mut C,
) -> Result<Outcome, SessionError> {
    let name = ask_label(
        console,
        "Whom do you want to describe?",
        kb.config().max_label_len,
    )?;

    let tree = kb.tree();
    let Some(path) = tracer::locate(tree, &name)? else {
        console.say(&not_found_phrase(&name))?;
        info!(%name, "Object to describe not found");
        return Ok(Outcome::NotFound(name));
    };

    let rendering = tracer::render(tree, &path)?;
    let object = tree.node(rendering.node).label().to_string();
    console.say(&description_phrase(&object, &rendering.properties))?;

    Ok(Outcome::Described {
        object,
        properties: rendering.properties,
    })
}

pub(crate) fn not_found_phrase(name: &str) -> String {
    format!("There is no {name} in the data base")
}

fn description_phrase(object: &str, properties: &[Property]) -> String {
    if properties.is_empty() {
        format!("{object} - nothing known yet")
    } else {
        format!("{object} - {}", join_properties(properties))
    }
}
