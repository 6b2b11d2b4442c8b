use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, HuffError>;

#[derive(Debug)]
pub enum HuffError {
    InputUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
    OutputUnwritable {
        path: PathBuf,
        source: std::io::Error,
    },
    MalformedContainer {
        reason: String,
        offset: usize,
    },
    StreamTruncated {
        emitted: u64,
        expected: u64,
        bits_consumed: u64,
    },
    StreamCorrupt {
        bit_offset: u64,
    },
    InternalConsistency {
        byte: u8,
        offset: usize,
    },
    TableOverflow {
        byte: u8,
        count: u64,
    },
}

impl HuffError {
    pub fn malformed(reason: impl Into<String>, offset: usize) -> Self {
        HuffError::MalformedContainer {
            reason: reason.into(),
            offset,
        }
    }
}

impl fmt::Display for HuffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HuffError::InputUnavailable { path, source } =>
                write!(f, "cannot read input {}: {}", path.display(), source),
            HuffError::OutputUnwritable { path, source } =>
                write!(f, "cannot write output {} (file may be incomplete): {}", path.display(), source),
            HuffError::MalformedContainer { reason, offset } =>
                write!(f, "malformed container at offset {}: {}", offset, reason),
            HuffError::StreamTruncated { emitted, expected, bits_consumed } =>
                write!(f, "bitstream truncated after {} bits: decoded {} of {} symbols", bits_consumed, emitted, expected),
            HuffError::StreamCorrupt { bit_offset } =>
                write!(f, "corrupt bitstream: bit {} leads to a missing tree branch", bit_offset),
            HuffError::InternalConsistency { byte, offset } =>
                write!(f, "internal error: byte 0x{:02x} at offset {} has no code", byte, offset),
            HuffError::TableOverflow { byte, count } =>
                write!(f, "byte 0x{:02x} occurs {} times, more than a frequency entry can hold", byte, count),
        }
    }
}

impl std::error::Error for HuffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HuffError::InputUnavailable { source, .. } => Some(source),
            HuffError::OutputUnwritable { source, .. } => Some(source),
            _ => None,
        }
    }
}
