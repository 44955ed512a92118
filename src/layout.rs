//! Layered layout of the visible subgraph.
//!
//! Positions are computed by an external layered graph-drawing algorithm —
//! by default the Sugiyama implementation in the `rust-sugiyama` crate. The
//! adapter submits every participating node at a fixed placeholder size so
//! the algorithm aligns rows and columns uniformly, then re-centers each box
//! for its true rendered size and assigns the connection-anchor sides from
//! the flow direction.
//!
//! The adapter works in `f64` because the underlying algorithm does; the
//! rendering collaborator converts as needed.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{LayoutError, Result};
use crate::graph::{AnchorSide, Entity, Point, Size};

/// Flow direction of the layered layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Layers flow top to bottom (default).
    #[default]
    TopDown,
    /// Layers flow left to right.
    LeftRight,
}

/// Uniform size submitted to the layout algorithm for every participant.
///
/// Laying out with heterogeneous real sizes produces ragged rows, so the
/// graph-theoretic computation runs against this placeholder and the true
/// size is applied afterwards, purely for rendering (see [`layout_graph`]).
pub const PLACEHOLDER_WIDTH: f64 = 200.0;
pub const PLACEHOLDER_HEIGHT: f64 = 50.0;

const VERTEX_SPACING: f64 = 75.0;

/// Text measurement capability supplied by the rendering collaborator.
///
/// Returns pixel width/height for a label under the current visual theme;
/// must be synchronous and pure for a given label and theme. Used only for
/// topic sizing.
pub trait MeasureText {
    fn measure(&self, label: &str) -> Size;
}

impl<F> MeasureText for F
where
    F: Fn(&str) -> Size,
{
    fn measure(&self, label: &str) -> Size {
        self(label)
    }
}

/// Configuration passed to a [`LayoutEngine`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutConfig {
    pub orientation: Orientation,
    /// Minimum spacing between vertices (0.0 uses the engine default).
    pub vertex_spacing: f64,
    /// Minimum edge length between layers (0 uses the engine default).
    pub minimum_length: u32,
    /// Whether to include dummy vertices in the layout.
    pub dummy_vertices: bool,
}

/// Narrow contract over an external layered graph-drawing algorithm.
///
/// Vertices are dense indices `0..n` paired with sizes; edges are index
/// pairs. The result maps each index back to the top-left (x, y) of its
/// box. Implementations must position every vertex or return an error — the
/// adapter rejects partial results rather than rendering a garbled layout.
pub trait LayoutEngine {
    fn positions(
        &self,
        vertices: &[(u32, (f64, f64))],
        edges: &[(u32, u32)],
        config: &LayoutConfig,
    ) -> Result<Vec<(u32, (f64, f64))>>;
}

/// Default engine backed by the `rust-sugiyama` crate.
///
/// Handles cycles internally (depth-first cycle breaking) and lays out
/// disconnected components as separate subgraphs.
#[derive(Clone, Copy, Debug, Default)]
pub struct SugiyamaEngine;

impl LayoutEngine for SugiyamaEngine {
    fn positions(
        &self,
        vertices: &[(u32, (f64, f64))],
        edges: &[(u32, u32)],
        config: &LayoutConfig,
    ) -> Result<Vec<(u32, (f64, f64))>> {
        if vertices.is_empty() {
            return Ok(Vec::new());
        }

        let horizontal = config.orientation == Orientation::LeftRight;

        // For horizontal flow, swap width/height so the algorithm spaces
        // layers along what will become the x-axis.
        let submitted: Vec<(u32, (f64, f64))> = vertices
            .iter()
            .map(|&(idx, (w, h))| (idx, if horizontal { (h, w) } else { (w, h) }))
            .collect();

        let mut sg_config = rust_sugiyama::configure::Config {
            dummy_vertices: config.dummy_vertices,
            ..Default::default()
        };
        if config.vertex_spacing > 0.0 {
            sg_config.vertex_spacing = config.vertex_spacing;
        }
        if config.minimum_length > 0 {
            sg_config.minimum_length = config.minimum_length;
        }

        // Disconnected components come back as separate subgraphs.
        let subgraphs = rust_sugiyama::from_vertices_and_edges(&submitted, edges, &sg_config);

        let mut results = Vec::with_capacity(vertices.len());
        for (layout, _width, _height) in &subgraphs {
            for &(idx, (x, y)) in layout {
                let (px, py) = if horizontal { (y, x) } else { (x, y) };
                results.push((idx as u32, (px, py)));
            }
        }
        Ok(results)
    }
}

/// Lay out the visible subgraph with the default [`SugiyamaEngine`].
///
/// See [`layout_graph_with`] for the full contract.
pub async fn layout_graph<M>(
    entities: &[Entity],
    orientation: Orientation,
    measure: &M,
) -> Result<Vec<Entity>>
where
    M: MeasureText + ?Sized,
{
    layout_graph_with(&SugiyamaEngine, entities, orientation, measure).await
}

/// Lay out the visible subgraph with an explicit engine.
///
/// Only non-hidden process and topic nodes participate; hidden nodes keep
/// their last position and links pass through untouched (visibility, not
/// position, applies to links). Each participating topic is resized from
/// `measure(label)` before layout; the engine nevertheless sees the uniform
/// placeholder size, and the reported position is re-centered afterwards so
/// the true box is drawn around the same anchor point:
///
/// ```text
/// x = layout_x - (true_width - PLACEHOLDER_WIDTH) / 2
/// ```
///
/// Two participants reported at the identical point are separated by a
/// deterministic sub-pixel nudge derived from the node id; it never affects
/// layout topology, only pixel rendering.
///
/// On failure the caller's previously displayed layout stays valid: the
/// error is returned instead of a partial result. An empty or all-hidden
/// graph is not an error.
///
/// The returned list is participants (repositioned), then hidden nodes,
/// then links.
pub async fn layout_graph_with<E, M>(
    engine: &E,
    entities: &[Entity],
    orientation: Orientation,
    measure: &M,
) -> Result<Vec<Entity>>
where
    E: LayoutEngine + ?Sized,
    M: MeasureText + ?Sized,
{
    let mut participants: Vec<Entity> = Vec::new();
    let mut hidden: Vec<Entity> = Vec::new();
    let mut links: Vec<Entity> = Vec::new();

    for entity in entities {
        match entity {
            Entity::Link(_) => links.push(entity.clone()),
            node if node.hidden() => hidden.push(entity.clone()),
            _ => participants.push(entity.clone()),
        }
    }

    // Topics are resized from their measured label before layout; the
    // measurement is recorded for rendering only.
    for entity in &mut participants {
        if let Entity::Topic(topic) = entity {
            topic.size = measure.measure(&topic.label);
        }
    }

    let vertices: Vec<(u32, (f64, f64))> = (0..participants.len())
        .map(|i| (i as u32, (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT)))
        .collect();

    let engine_edges: Vec<(u32, u32)> = {
        let id_to_idx: HashMap<&str, u32> = participants
            .iter()
            .enumerate()
            .map(|(i, entity)| (entity.id(), i as u32))
            .collect();

        links
            .iter()
            .filter_map(|entity| match entity {
                Entity::Link(link) if !link.hidden => {
                    let src = *id_to_idx.get(link.source.as_str())?;
                    let dst = *id_to_idx.get(link.target.as_str())?;
                    Some((src, dst))
                }
                _ => None,
            })
            .collect()
    };

    debug!(
        nodes = vertices.len(),
        edges = engine_edges.len(),
        ?orientation,
        "submitting layout request"
    );

    let config = LayoutConfig {
        orientation,
        vertex_spacing: VERTEX_SPACING,
        ..Default::default()
    };
    let raw = engine.positions(&vertices, &engine_edges, &config)?;

    let mut positions: Vec<Option<(f64, f64)>> = vec![None; participants.len()];
    for (idx, (x, y)) in raw {
        if let Some(slot) = positions.get_mut(idx as usize) {
            *slot = Some((x, y));
        }
    }

    let (target_anchor, source_anchor) = match orientation {
        Orientation::LeftRight => (AnchorSide::Left, AnchorSide::Right),
        Orientation::TopDown => (AnchorSide::Top, AnchorSide::Bottom),
    };

    let mut occupied: HashSet<(u64, u64)> = HashSet::with_capacity(participants.len());
    for (i, entity) in participants.iter_mut().enumerate() {
        let (x, y) = positions[i].ok_or_else(|| LayoutError::MissingPosition {
            id: entity.id().to_string(),
        })?;
        if !(x.is_finite() && y.is_finite()) {
            return Err(LayoutError::NonFiniteCoordinate {
                id: entity.id().to_string(),
            });
        }

        // Both participant variants are nodes; links were split off above.
        if let Some(node) = entity.node_mut() {
            let mut fx = x - (node.size.width - PLACEHOLDER_WIDTH) / 2.0;
            let fy = y - (node.size.height - PLACEHOLDER_HEIGHT) / 2.0;
            if !occupied.insert((fx.to_bits(), fy.to_bits())) {
                fx += subpixel_nudge(&node.id);
                occupied.insert((fx.to_bits(), fy.to_bits()));
            }
            node.position = Point::new(fx, fy);
            node.source_anchor = source_anchor;
            node.target_anchor = target_anchor;
        }
    }

    participants.extend(hidden);
    participants.extend(links);
    Ok(participants)
}

/// Deterministic sub-pixel x offset used to separate nodes that land on an
/// identical point. Always in (0, 0.001), so it can never change which grid
/// cell or layer a node renders in.
fn subpixel_nudge(id: &str) -> f64 {
    // FNV-1a
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in id.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100_0000_01b3);
    }
    ((hash % 999) + 1) as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos_map(results: Vec<(u32, (f64, f64))>) -> HashMap<u32, (f64, f64)> {
        results.into_iter().collect()
    }

    fn uniform(n: u32) -> Vec<(u32, (f64, f64))> {
        (0..n)
            .map(|i| (i, (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT)))
            .collect()
    }

    // ========================================================================
    // SugiyamaEngine
    // ========================================================================

    #[test]
    fn test_engine_empty_input() {
        let result = SugiyamaEngine
            .positions(&[], &[], &LayoutConfig::default())
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_engine_two_nodes_one_edge() {
        let result = SugiyamaEngine
            .positions(&uniform(2), &[(0, 1)], &LayoutConfig::default())
            .unwrap();
        assert_eq!(result.len(), 2);
        let pos = pos_map(result);
        // Source should be in an earlier layer in top-down flow.
        assert!(pos[&0].1 < pos[&1].1);
    }

    #[test]
    fn test_engine_diamond_keeps_middle_layer_aligned() {
        // 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3
        let edges = [(0, 1), (0, 2), (1, 3), (2, 3)];
        let result = SugiyamaEngine
            .positions(&uniform(4), &edges, &LayoutConfig::default())
            .unwrap();
        let pos = pos_map(result);
        assert!(pos[&0].1 < pos[&3].1);
        assert!((pos[&1].1 - pos[&2].1).abs() < 1.0);
    }

    #[test]
    fn test_engine_left_right_swaps_axes() {
        let config = LayoutConfig {
            orientation: Orientation::LeftRight,
            ..Default::default()
        };
        let result = SugiyamaEngine
            .positions(&uniform(2), &[(0, 1)], &config)
            .unwrap();
        let pos = pos_map(result);
        // Layers separate along x in left-right flow.
        assert!(pos[&0].0 < pos[&1].0);
    }

    #[test]
    fn test_engine_disconnected_components_all_positioned() {
        let result = SugiyamaEngine
            .positions(&uniform(4), &[(0, 1), (2, 3)], &LayoutConfig::default())
            .unwrap();
        let pos = pos_map(result);
        assert_eq!(pos.len(), 4);
        assert!(pos[&0].1 < pos[&1].1);
        assert!(pos[&2].1 < pos[&3].1);
    }

    #[test]
    fn test_engine_cycle_does_not_panic() {
        let result = SugiyamaEngine
            .positions(&uniform(3), &[(0, 1), (1, 2), (2, 0)], &LayoutConfig::default())
            .unwrap();
        assert_eq!(result.len(), 3);
        for (_, (x, y)) in result {
            assert!(x.is_finite() && y.is_finite());
        }
    }

    // ========================================================================
    // subpixel_nudge
    // ========================================================================

    #[test]
    fn test_nudge_is_deterministic_and_subpixel() {
        let a = subpixel_nudge("topic-/chatter");
        let b = subpixel_nudge("topic-/chatter");
        assert_eq!(a, b);
        assert!(a > 0.0 && a < 0.001);
    }

    #[test]
    fn test_nudge_differs_across_ids() {
        assert_ne!(subpixel_nudge("a"), subpixel_nudge("b"));
    }
}
