//! Session controller: owns the entity list and sequences visibility and
//! layout updates.
//!
//! Scheduling is single-threaded and cooperative. Visibility resolution is
//! synchronous and completes before control returns; layout is the sole
//! suspending operation. Only one logical layout flow is meaningful at a
//! time per session: every layout request gets a monotonically increasing
//! sequence number and only a result matching the latest issued request is
//! applied — a stale in-flight result is discarded rather than racing to
//! overwrite a newer arrangement. That last-writer-wins discipline
//! substitutes for locking.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::graph::Entity;
use crate::layout::{self, LayoutEngine, MeasureText, Orientation, SugiyamaEngine};
use crate::visibility::resolve_visibility;

/// Outcome of a completed layout flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutOutcome {
    /// The result matched the latest issued request and was applied.
    Applied,
    /// A newer request was issued while this one was in flight; the result
    /// was discarded.
    Superseded,
}

/// Snapshot of the session taken when a layout request is issued.
///
/// `seq` ties the eventual result back to this request; only the latest
/// issued request may be applied (see [`GraphController::apply_layout`]).
#[derive(Clone, Debug)]
pub struct LayoutTicket {
    pub seq: u64,
    pub entities: Vec<Entity>,
    pub orientation: Orientation,
}

type UpdateCallback = Rc<dyn Fn(u64, &[Entity])>;

struct SessionState {
    entities: Vec<Entity>,
    orientation: Orientation,
    version: u64,
    layout_seq: u64,
    on_update: Option<UpdateCallback>,
}

/// Controller for one active diagram session.
///
/// Holds the authoritative entity list. On a selection change, apply
/// [`Self::set_selection`] then [`Self::update_layout`] (shown/hidden topics
/// change which nodes participate in layout); on an orientation toggle,
/// [`Self::set_orientation`] then [`Self::update_layout`] only.
///
/// Clone the controller to share it across callbacks; clones operate on the
/// same session.
#[derive(Clone)]
pub struct GraphController {
    state: Rc<RefCell<SessionState>>,
    engine: Rc<dyn LayoutEngine>,
}

impl Default for GraphController {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphController {
    /// Controller with the default [`SugiyamaEngine`].
    pub fn new() -> Self {
        Self::with_engine(SugiyamaEngine)
    }

    /// Controller with a custom layout engine.
    pub fn with_engine<E: LayoutEngine + 'static>(engine: E) -> Self {
        Self {
            state: Rc::new(RefCell::new(SessionState {
                entities: Vec::new(),
                orientation: Orientation::default(),
                version: 0,
                layout_seq: 0,
                on_update: None,
            })),
            engine: Rc::new(engine),
        }
    }

    /// Register the render-consumption callback.
    ///
    /// Invoked with the snapshot version and the full entity list after
    /// every applied change (ingestion, selection, applied layout).
    pub fn on_update(&self, callback: impl Fn(u64, &[Entity]) + 'static) {
        self.state.borrow_mut().on_update = Some(Rc::new(callback));
    }

    /// Replace the entity list (ingestion interface). Visibility is
    /// whatever the host supplied.
    pub fn set_entities(&self, entities: Vec<Entity>) {
        {
            let mut state = self.state.borrow_mut();
            state.entities = entities;
            state.version += 1;
        }
        self.notify();
    }

    /// Apply a new process selection (selection interface).
    ///
    /// Resolves visibility synchronously and publishes the new snapshot
    /// immediately, even if a layout is still pending. Follow up with
    /// [`Self::update_layout`].
    pub fn set_selection<S: AsRef<str>>(&self, selected_labels: &[S]) {
        let resolved = resolve_visibility(&self.state.borrow().entities, selected_labels);
        {
            let mut state = self.state.borrow_mut();
            state.entities = resolved;
            state.version += 1;
        }
        self.notify();
    }

    /// Hide a single process, keeping every other visible process selected.
    pub fn hide_process(&self, id: &str) {
        let selected: Vec<String> = {
            let state = self.state.borrow();
            state
                .entities
                .iter()
                .filter_map(|entity| match entity {
                    Entity::Process(node) if !node.hidden && node.id != id => {
                        Some(node.label.clone())
                    }
                    _ => None,
                })
                .collect()
        };
        self.set_selection(&selected);
    }

    /// Labels of currently visible processes (what the selection UI shows
    /// as checked).
    pub fn visible_process_labels(&self) -> Vec<String> {
        self.state
            .borrow()
            .entities
            .iter()
            .filter_map(|entity| match entity {
                Entity::Process(node) if !node.hidden => Some(node.label.clone()),
                _ => None,
            })
            .collect()
    }

    /// Set the flow direction (orientation interface). Visibility is
    /// orientation-independent; follow up with [`Self::update_layout`].
    pub fn set_orientation(&self, orientation: Orientation) {
        self.state.borrow_mut().orientation = orientation;
    }

    pub fn orientation(&self) -> Orientation {
        self.state.borrow().orientation
    }

    /// Snapshot version, bumped on every applied change.
    pub fn version(&self) -> u64 {
        self.state.borrow().version
    }

    /// Cloned snapshot of the current entity list.
    pub fn entities(&self) -> Vec<Entity> {
        self.state.borrow().entities.clone()
    }

    /// Issue a new layout request over the current session state.
    ///
    /// Issuing supersedes every earlier in-flight request: their results
    /// will be rejected by [`Self::apply_layout`].
    pub fn request_layout(&self) -> LayoutTicket {
        let mut state = self.state.borrow_mut();
        state.layout_seq += 1;
        debug!(seq = state.layout_seq, "issued layout request");
        LayoutTicket {
            seq: state.layout_seq,
            entities: state.entities.clone(),
            orientation: state.orientation,
        }
    }

    /// Apply a computed layout if its request is still the latest issued
    /// one. Returns whether the result was applied.
    pub fn apply_layout(&self, seq: u64, entities: Vec<Entity>) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if seq != state.layout_seq {
                warn!(
                    seq,
                    latest = state.layout_seq,
                    "discarding stale layout result"
                );
                return false;
            }
            state.entities = entities;
            state.version += 1;
        }
        self.notify();
        true
    }

    /// Run a full layout flow: snapshot, compute, apply-if-latest.
    ///
    /// On error the previously applied arrangement is left untouched and
    /// the failure is returned for the caller to report; it is never fatal
    /// to the session.
    pub async fn update_layout<M>(&self, measure: &M) -> Result<LayoutOutcome>
    where
        M: MeasureText + ?Sized,
    {
        let ticket = self.request_layout();
        let engine = self.engine.clone();
        let computed = layout::layout_graph_with(
            engine.as_ref(),
            &ticket.entities,
            ticket.orientation,
            measure,
        )
        .await;

        match computed {
            Ok(entities) => {
                if self.apply_layout(ticket.seq, entities) {
                    Ok(LayoutOutcome::Applied)
                } else {
                    Ok(LayoutOutcome::Superseded)
                }
            }
            Err(err) => {
                warn!(error = %err, "layout failed; keeping previous arrangement");
                Err(err)
            }
        }
    }

    fn notify(&self) {
        let (callback, version, entities) = {
            let state = self.state.borrow();
            match &state.on_update {
                Some(callback) => (callback.clone(), state.version, state.entities.clone()),
                None => return,
            }
        };
        callback(version, &entities);
    }
}
