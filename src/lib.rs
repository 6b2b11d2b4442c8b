//! Byte-oriented Huffman compression.
//!
//! An encoded file is a 1024-byte header of 256 big-endian `u32` byte counts
//! followed by the MSB-first packed bitstream. The decoder rebuilds the tree
//! from the counts and stops after exactly `sum(counts)` symbols.
//!
//! ```
//! use huffpack::{compress, decompress, report::NullReporter};
//!
//! let packed = compress(b"aaabbc", &mut NullReporter)?;
//! assert_eq!(decompress(&packed, &mut NullReporter)?, b"aaabbc");
//! # Ok::<(), huffpack::HuffError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod report;
pub mod utils;

pub use engine::{compress, decompress};
pub use error::{HuffError, Result};
