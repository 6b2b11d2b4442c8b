use tracing::error;

use crate::engine::frequency::FrequencyTable;
use crate::error::{HuffError, Result};
use crate::format::constants::{COUNT_WIDTH, HEADER_SIZE, SYMBOL_COUNT};

/// Encoded file: the 1024-byte frequency header followed by the packed
/// bitstream, which runs to the end of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub table: FrequencyTable,
    pub payload: Vec<u8>,
}

impl Container {
    pub fn new(table: FrequencyTable, payload: Vec<u8>) -> Self {
        Self { table, payload }
    }

    pub fn encode_header(table: &FrequencyTable) -> Result<[u8; HEADER_SIZE]> {
        let mut buf = [0u8; HEADER_SIZE];
        for (byte, &count) in table.counts().iter().enumerate() {
            let count = u32::try_from(count).map_err(|_| HuffError::TableOverflow {
                byte: byte as u8,
                count,
            })?;
            let at = byte * COUNT_WIDTH;
            buf[at..at + COUNT_WIDTH].copy_from_slice(&count.to_be_bytes());
        }
        Ok(buf)
    }

    /// Parse the frequency header without touching the payload.
    pub fn read_header(data: &[u8]) -> Result<FrequencyTable> {
        if data.len() < HEADER_SIZE {
            error!("Container header too short: {} bytes", data.len());
            return Err(HuffError::malformed(
                format!("header needs {} bytes, found {}", HEADER_SIZE, data.len()),
                data.len(),
            ));
        }

        let mut counts = [0u64; SYMBOL_COUNT];
        for (byte, chunk) in data[..HEADER_SIZE].chunks_exact(COUNT_WIDTH).enumerate() {
            counts[byte] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as u64;
        }
        Ok(FrequencyTable::from_counts(counts))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let header = Self::encode_header(&self.table)?;
        let mut out = Vec::with_capacity(HEADER_SIZE + self.payload.len());
        out.extend_from_slice(&header);
        out.extend_from_slice(&self.payload);
        Ok(out)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let table = Self::read_header(data)?;
        Ok(Self {
            table,
            payload: data[HEADER_SIZE..].to_vec(),
        })
    }
}
