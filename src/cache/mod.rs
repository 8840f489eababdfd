pub mod keys;
pub mod store;

pub use keys::{CacheKey, KeyClass};
pub use store::{MemoryCache, QueryCache, get_typed, put_typed};
