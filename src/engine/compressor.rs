use tracing::{debug, error};

use crate::engine::{
    bits::BitWriter,
    codes::CodeTable,
    frequency::FrequencyTable,
    huffman::HuffmanTree,
};
use crate::error::{HuffError, Result};
use crate::format::Container;
use crate::report::{Event, Reporter, Stage, Summary};
use crate::utils::crc::crc32;

/// Concatenate the code of every input byte into one packed bitstream.
pub fn pack(input: &[u8], codes: &CodeTable, expected_bits: u64) -> Result<Vec<u8>> {
    let mut writer = BitWriter::with_capacity_bits(expected_bits);

    for (offset, &byte) in input.iter().enumerate() {
        let Some(code) = codes.get(byte) else {
            error!("no code for byte 0x{:02x} at offset {}", byte, offset);
            return Err(HuffError::InternalConsistency { byte, offset });
        };
        writer.push_bits(code);
    }

    debug!("packed {} bits", writer.bit_len());
    Ok(writer.finish())
}

/// Build the container for `input` without serializing it.
pub fn compress_container(input: &[u8], reporter: &mut dyn Reporter) -> Result<Container> {
    reporter.report(Event::StageStarted { stage: Stage::CountFrequencies });
    let table = FrequencyTable::count(input);
    debug!("{} bytes, {} distinct symbols", input.len(), table.distinct());

    reporter.report(Event::StageStarted { stage: Stage::BuildTree });
    let Some(tree) = HuffmanTree::build(&table) else {
        return Ok(Container::new(table, Vec::new()));
    };
    let codes = CodeTable::from_tree(&tree);
    debug!("tree depth {}, {} codes", tree.depth(), codes.len());

    reporter.report(Event::StageStarted { stage: Stage::PackBits });
    let payload = pack(input, &codes, codes.total_bits(&table))?;

    Ok(Container::new(table, payload))
}

/// Encode `input` into a complete container byte buffer.
pub fn compress(input: &[u8], reporter: &mut dyn Reporter) -> Result<Vec<u8>> {
    let container = compress_container(input, reporter)?;
    let output = container.to_bytes()?;

    reporter.report(Event::Encoded(Summary::new(
        input.len() as u64,
        output.len() as u64,
        container.table.distinct(),
        crc32(input),
    )));

    Ok(output)
}
