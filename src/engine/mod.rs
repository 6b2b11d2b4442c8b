pub mod bits;
pub mod codes;
pub mod compressor;
pub mod decompressor;
pub mod frequency;
pub mod huffman;

pub use compressor::*;
pub use decompressor::*;
