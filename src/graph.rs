//! Graph entities for a pub/sub process diagram.
//!
//! A diagram is a flat list of [`Entity`] values: process nodes, topic nodes
//! and the directed links between them (process→topic is a publication,
//! topic→process a subscription). The host feeds this list in as plain
//! tagged data; the resolver and layout adapter hand back fresh lists with
//! visibility and geometry filled in.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Width and height in current-theme pixel units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of a node's box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Side of a node's box where an incoming or outgoing edge connects.
///
/// Assigned by the layout adapter from the flow direction: top/bottom for
/// top-down layouts, left/right for left-right layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

/// A process or topic box in the diagram.
///
/// The two node kinds share one shape; [`Entity`]'s discriminant tells them
/// apart. `hidden` is written only by the visibility resolver, `position`
/// and the anchor sides only by the layout adapter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Identity, stable across renders.
    pub id: String,
    /// Display name: process name or topic name.
    pub label: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub source_anchor: AnchorSide,
    #[serde(default)]
    pub target_anchor: AnchorSide,
}

impl GraphNode {
    /// New visible node at the origin with zero size.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            namespace: String::new(),
            hidden: false,
            position: Point::default(),
            size: Size::ZERO,
            source_anchor: AnchorSide::default(),
            target_anchor: AnchorSide::default(),
        }
    }
}

/// A directed publish or subscribe connection between a process and a topic.
///
/// `hidden` is derived from the two endpoints by the visibility resolver;
/// links carry no geometry of their own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkEdge {
    pub id: String,
    /// Entity id the link leaves from.
    pub source: String,
    /// Entity id the link points at.
    pub target: String,
    #[serde(default)]
    pub hidden: bool,
    /// Optional telemetry annotation (e.g. a message rate like "10Hz").
    #[serde(default)]
    pub label: Option<String>,
}

impl LinkEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            hidden: false,
            label: None,
        }
    }
}

/// A single element of the diagram.
///
/// Closed over exactly three variants so classification is total, mutually
/// exclusive and decided by the discriminant alone. Serializes with a
/// `"type"` tag (`"process"`, `"topic"`, `"link"`), matching the plain data
/// shape the ingestion collaborator supplies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entity {
    Process(GraphNode),
    Topic(GraphNode),
    Link(LinkEdge),
}

impl Entity {
    /// New visible process node.
    pub fn process(id: impl Into<String>, label: impl Into<String>) -> Self {
        Entity::Process(GraphNode::new(id, label))
    }

    /// New visible topic node.
    pub fn topic(id: impl Into<String>, label: impl Into<String>) -> Self {
        Entity::Topic(GraphNode::new(id, label))
    }

    /// New visible link.
    pub fn link(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Entity::Link(LinkEdge::new(id, source, target))
    }

    pub fn is_process(&self) -> bool {
        matches!(self, Entity::Process(_))
    }

    pub fn is_topic(&self) -> bool {
        matches!(self, Entity::Topic(_))
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Entity::Link(_))
    }

    pub fn id(&self) -> &str {
        match self {
            Entity::Process(node) | Entity::Topic(node) => &node.id,
            Entity::Link(link) => &link.id,
        }
    }

    pub fn hidden(&self) -> bool {
        match self {
            Entity::Process(node) | Entity::Topic(node) => node.hidden,
            Entity::Link(link) => link.hidden,
        }
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        match self {
            Entity::Process(node) | Entity::Topic(node) => node.hidden = hidden,
            Entity::Link(link) => link.hidden = hidden,
        }
    }

    /// Display label; `None` for an unannotated link.
    pub fn label(&self) -> Option<&str> {
        match self {
            Entity::Process(node) | Entity::Topic(node) => Some(&node.label),
            Entity::Link(link) => link.label.as_deref(),
        }
    }

    /// Node view of the entity; `None` for links.
    pub fn node(&self) -> Option<&GraphNode> {
        match self {
            Entity::Process(node) | Entity::Topic(node) => Some(node),
            Entity::Link(_) => None,
        }
    }

    pub fn node_mut(&mut self) -> Option<&mut GraphNode> {
        match self {
            Entity::Process(node) | Entity::Topic(node) => Some(node),
            Entity::Link(_) => None,
        }
    }
}

/// Topic → peer adjacency, built in one linear pass over the edge list.
///
/// [`PeerIndex::peers`] then answers in time proportional to the edges
/// touching that topic rather than the whole graph, which keeps interactive
/// visibility updates responsive as graphs grow. Peers are collected from
/// edges in either direction and regardless of hidden state; an edge whose
/// far endpoint is unknown still contributes its id (the resolver treats
/// unknown ids as not visible).
pub struct PeerIndex<'a> {
    peers: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> PeerIndex<'a> {
    pub fn build(entities: &'a [Entity]) -> Self {
        let topic_ids: HashSet<&str> = entities
            .iter()
            .filter(|e| e.is_topic())
            .map(Entity::id)
            .collect();

        let mut peers: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        for entity in entities {
            if let Entity::Link(link) = entity {
                if topic_ids.contains(link.source.as_str()) {
                    peers
                        .entry(link.source.as_str())
                        .or_default()
                        .push(link.target.as_str());
                }
                if topic_ids.contains(link.target.as_str()) {
                    peers
                        .entry(link.target.as_str())
                        .or_default()
                        .push(link.source.as_str());
                }
            }
        }
        Self { peers }
    }

    /// Ids connected to `topic_id` by any edge, hidden or not. Empty for an
    /// unknown topic or a topic with no edges.
    pub fn peers(&self, topic_id: &str) -> &[&'a str] {
        self.peers.get(topic_id).map(Vec::as_slice).unwrap_or(&[])
    }
}
