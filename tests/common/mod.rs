//! Shared fixtures for integration tests.

#![allow(dead_code)]

use rosgraph_view::{Entity, Size, PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH};

pub const TALKER: &str = "0-host-130956-0x5571dbae10b0";
pub const LISTENER: &str = "0-host-131016-0x55d655274fb0";

/// Measurement stub that always returns the layout placeholder size, so
/// re-centering is a no-op and positions compare exactly.
pub fn placeholder_measure(_label: &str) -> Size {
    Size::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT)
}

/// The talker/listener demo graph: two processes, three topics and the
/// links commonly wired between them (both log to /rosout, both publish to
/// and subscribe from /parameter_events, and chatter flows
/// talker → /chatter → listener).
pub fn talker_listener_graph() -> Vec<Entity> {
    let mut entities = vec![
        Entity::process(TALKER, "talker"),
        Entity::process(LISTENER, "listener"),
        Entity::topic("topic-/rosout", "/rosout"),
        Entity::topic("topic-/parameter_events", "/parameter_events"),
        Entity::topic("topic-/chatter", "/chatter"),
        Entity::link("pub-talker-rosout", TALKER, "topic-/rosout"),
        Entity::link("pub-listener-rosout", LISTENER, "topic-/rosout"),
        Entity::link("pub-talker-events", TALKER, "topic-/parameter_events"),
        Entity::link("pub-listener-events", LISTENER, "topic-/parameter_events"),
        Entity::link("sub-talker-events", "topic-/parameter_events", TALKER),
        Entity::link("sub-listener-events", "topic-/parameter_events", LISTENER),
        Entity::link("pub-talker-chatter", TALKER, "topic-/chatter"),
        Entity::link("sub-listener-chatter", "topic-/chatter", LISTENER),
    ];
    // Process boxes come in from ingestion with their rendered size; topics
    // get theirs from text measurement at layout time.
    for entity in &mut entities {
        if entity.is_process() {
            if let Some(node) = entity.node_mut() {
                node.size = Size::new(275.0, 79.0);
            }
        }
    }
    entities
}

/// Look up an entity by id, panicking if it is missing.
pub fn find<'a>(entities: &'a [Entity], id: &str) -> &'a Entity {
    entities
        .iter()
        .find(|e| e.id() == id)
        .unwrap_or_else(|| panic!("entity `{id}` not in list"))
}

pub fn is_hidden(entities: &[Entity], id: &str) -> bool {
    find(entities, id).hidden()
}
