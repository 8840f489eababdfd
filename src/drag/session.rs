use tracing::trace;

use super::payload::DragPayload;

/// Pointer position in the host's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Bounding region of a drop target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        payload: DragPayload,
        source_index: usize,
    },
    Hovering {
        payload: DragPayload,
        source_index: usize,
        target: String,
    },
}

/// A completed drop, handed to the sync controller.
#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome {
    pub payload: DragPayload,
    pub source_index: usize,
    pub dest_index: usize,
    pub target: String,
}

/// Ephemeral per-interaction drag state. Cyclic: every session ends back in
/// `Idle` with the payload cleared, whether it resolved in a drop or was
/// abandoned. A new drag only starts from `Idle`, which serializes mutations
/// without any locking.
#[derive(Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// Begin a drag. Refused unless the session is idle, so an in-flight
    /// interaction can never be stomped.
    pub fn drag_start(&mut self, payload: DragPayload, source_index: usize) -> bool {
        if !self.is_idle() {
            return false;
        }
        trace!("Drag started from index {}", source_index);
        self.state = DragState::Dragging {
            payload,
            source_index,
        };
        true
    }

    /// Pointer entered a drop target.
    pub fn drag_enter(&mut self, target: impl Into<String>) {
        let target = target.into();
        self.state = match std::mem::take(&mut self.state) {
            DragState::Dragging {
                payload,
                source_index,
            }
            | DragState::Hovering {
                payload,
                source_index,
                ..
            } => DragState::Hovering {
                payload,
                source_index,
                target,
            },
            DragState::Idle => DragState::Idle,
        };
    }

    /// Pointer left the hovered target. Browser drag events fire a leave for
    /// every child element crossed, so the transition only happens when the
    /// pointer is truly outside the target's bounds.
    pub fn drag_leave(&mut self, pointer: Point, target_bounds: Bounds) {
        if target_bounds.contains(pointer) {
            return;
        }
        self.state = match std::mem::take(&mut self.state) {
            DragState::Hovering {
                payload,
                source_index,
                ..
            } => DragState::Dragging {
                payload,
                source_index,
            },
            other => other,
        };
    }

    /// Resolve the session in a drop. Only a hovered target can receive one;
    /// any other state resets to idle with nothing to apply.
    pub fn drop(&mut self, dest_index: usize) -> Option<DropOutcome> {
        match std::mem::take(&mut self.state) {
            DragState::Hovering {
                payload,
                source_index,
                target,
            } => {
                trace!("Drop at index {} on {}", dest_index, target);
                Some(DropOutcome {
                    payload,
                    source_index,
                    dest_index,
                    target,
                })
            }
            _ => None,
        }
    }

    /// Unconditional reset. Fires on drag end or cancel from any state, even
    /// when no drop occurred, and always clears the payload.
    pub fn end(&mut self) {
        if !self.is_idle() {
            trace!("Drag session cleared");
        }
        self.state = DragState::Idle;
    }
}
