mod payload;
mod session;

pub use payload::DragPayload;
pub use session::{Bounds, DragSession, DragState, DropOutcome, Point};
