//! Container layout constants

/// Entries in the frequency header, one per byte value.
pub const SYMBOL_COUNT: usize = 256;

/// Width of one frequency entry (big-endian u32).
pub const COUNT_WIDTH: usize = 4;

/// Fixed header size: 256 big-endian u32 counts.
pub const HEADER_SIZE: usize = SYMBOL_COUNT * COUNT_WIDTH;

/// Suffix appended to encoded files unless configured otherwise.
pub const DEFAULT_SUFFIX: &str = ".huff";
