//! # rosgraph-view
//!
//! Headless core of a live pub/sub process-graph viewer: given the
//! processes, topics and publish/subscribe links of a running system, it
//! decides which entities should be drawn for a user's process selection and
//! arranges the visible subgraph with a layered graph-drawing algorithm.
//!
//! UI widgets, telemetry ingestion and the on-screen renderer are external
//! collaborators; this crate only defines the contracts it needs from them
//! (plain tagged entity data in, a [`MeasureText`] capability, a
//! render-update callback out).
//!
//! ## Components
//!
//! - [`graph`] — typed entities and classification predicates
//! - [`visibility`] — selection → hidden flags, pure and synchronous
//! - [`layout`] — visible subgraph → positions and anchor sides, async,
//!   backed by the `rust-sugiyama` crate
//! - [`controller`] — session state and the visibility→layout sequencing,
//!   with last-writer-wins staleness handling for in-flight layouts
//!
//! ## Quick start
//!
//! ```
//! use rosgraph_view::{resolve_visibility, Entity};
//!
//! let entities = vec![
//!     Entity::process("n-talker", "talker"),
//!     Entity::process("n-listener", "listener"),
//!     Entity::topic("topic-/chatter", "/chatter"),
//!     Entity::link("pub-chatter", "n-talker", "topic-/chatter"),
//!     Entity::link("sub-chatter", "topic-/chatter", "n-listener"),
//! ];
//!
//! // Show only the talker: the topic stays visible through its visible
//! // peer, but the subscription link loses an endpoint and is hidden.
//! let resolved = resolve_visibility(&entities, &["talker"]);
//! let hidden: Vec<&str> = resolved
//!     .iter()
//!     .filter(|e| e.hidden())
//!     .map(|e| e.id())
//!     .collect();
//! assert_eq!(hidden, ["n-listener", "sub-chatter"]);
//! ```
//!
//! Driving a whole session goes through [`GraphController`]:
//!
//! ```ignore
//! let controller = GraphController::new();
//! controller.on_update(|version, entities| renderer.draw(version, entities));
//! controller.set_entities(discovered_entities);
//! controller.update_layout(&measure).await?;        // initial arrangement
//! controller.set_selection(&["talker"]);            // immediate
//! controller.update_layout(&measure).await?;        // re-flow
//! ```

pub mod controller;
pub mod error;
pub mod graph;
pub mod layout;
pub mod visibility;

pub use controller::{GraphController, LayoutOutcome, LayoutTicket};
pub use error::{LayoutError, Result};
pub use graph::{AnchorSide, Entity, GraphNode, LinkEdge, PeerIndex, Point, Size};
pub use layout::{
    layout_graph, layout_graph_with, LayoutConfig, LayoutEngine, MeasureText, Orientation,
    SugiyamaEngine, PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH,
};
pub use visibility::resolve_visibility;
