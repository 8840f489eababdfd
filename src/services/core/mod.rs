/// The pure reorder engine and the controllers built on it.
pub mod content;
pub mod page;
pub mod reorder;
pub mod sync;

pub use content::{ContentService, MoveDirection, filter_content};
pub use page::PageService;
pub use reorder::{compute_reorder, is_noop_reorder};
pub use sync::{Invalidation, MutationOutcome, OrderedStore, ReorderOutcome, SyncController};
