// Tuning constants in one place.

// === Query cache ===
// Distinct query keys alive at once: one sections list, one page list, plus
// per-section content and per-page data entries.
pub const QUERY_CACHE_CAPACITY: usize = 256;

// === Network ===
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// === Event bus ===
pub const EVENT_BUS_CAPACITY: usize = 1000;
