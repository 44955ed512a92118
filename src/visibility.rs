//! Derives hidden flags for the whole diagram from a process selection.
//!
//! Only process visibility is driven directly by user input; topic and link
//! visibility is derived from it. Resolution is synchronous and pure: the
//! input list is never mutated, callers replace their held list with the
//! returned one so downstream change detection fires.

use std::collections::HashSet;

use tracing::debug;

use crate::graph::{Entity, PeerIndex};

/// Resolve every entity's visibility from the selected process labels.
///
/// A process is visible iff its label is selected; a topic is visible iff at
/// least one peer process is visible (a topic with no edges is always
/// hidden); a link is visible iff both its endpoints are. A link endpoint
/// that refers to no known entity counts as not visible rather than being an
/// error, and a selected label that matches no process is a no-op.
///
/// Matching is by display label, not id, because the selection UI surfaces
/// processes by name: two processes sharing a label are indistinguishable
/// here.
///
/// The returned list is ordered processes, then topics, then links. Nothing
/// is ever removed — deselected entities stay in the list hidden, so
/// re-selection is cheap and resolution is idempotent.
pub fn resolve_visibility<S>(entities: &[Entity], selected_labels: &[S]) -> Vec<Entity>
where
    S: AsRef<str>,
{
    let selected: HashSet<&str> = selected_labels.iter().map(AsRef::as_ref).collect();
    let index = PeerIndex::build(entities);

    let mut processes: Vec<Entity> = Vec::new();
    let mut topics: Vec<Entity> = Vec::new();
    let mut links: Vec<Entity> = Vec::new();

    for entity in entities {
        match entity {
            Entity::Process(node) => {
                let mut node = node.clone();
                node.hidden = !selected.contains(node.label.as_str());
                processes.push(Entity::Process(node));
            }
            Entity::Topic(_) => topics.push(entity.clone()),
            Entity::Link(_) => links.push(entity.clone()),
        }
    }

    let visible_processes: HashSet<&str> = processes
        .iter()
        .filter(|e| !e.hidden())
        .map(Entity::id)
        .collect();

    for entity in &mut topics {
        if let Entity::Topic(node) = entity {
            let any_visible_peer = index
                .peers(&node.id)
                .iter()
                .any(|peer| visible_processes.contains(peer));
            node.hidden = !any_visible_peer;
        }
    }

    let visible_nodes: HashSet<&str> = processes
        .iter()
        .chain(topics.iter())
        .filter(|e| !e.hidden())
        .map(Entity::id)
        .collect();

    for entity in &mut links {
        if let Entity::Link(link) = entity {
            link.hidden = !(visible_nodes.contains(link.source.as_str())
                && visible_nodes.contains(link.target.as_str()));
        }
    }

    debug!(
        selected = selected.len(),
        visible = visible_nodes.len(),
        total = entities.len(),
        "resolved visibility"
    );

    let mut resolved = processes;
    resolved.append(&mut topics);
    resolved.append(&mut links);
    resolved
}
