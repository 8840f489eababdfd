pub mod core;

pub use core::{
    ContentService, MoveDirection, MutationOutcome, PageService, ReorderOutcome, SyncController,
};
