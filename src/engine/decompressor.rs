use tracing::{debug, error};

use crate::engine::{
    bits::BitReader,
    huffman::{HuffmanNode, HuffmanTree},
};
use crate::error::{HuffError, Result};
use crate::format::{Container, HEADER_SIZE};
use crate::report::{Event, Reporter, Stage, Summary};
use crate::utils::crc::crc32;

/// Walk `reader` against the tree rooted at `root`, emitting a byte at every
/// leaf, until `symbols` bytes have been produced. Remaining bits are left
/// unread.
pub fn walk(root: &HuffmanNode, reader: &mut BitReader<'_>, symbols: u64) -> Result<Vec<u8>> {
    let capacity = symbols.min(reader.remaining()) as usize;
    let mut out = Vec::with_capacity(capacity);
    let mut current = root;
    let mut emitted = 0u64;

    while emitted < symbols {
        let bit_offset = reader.bits_read();
        let Some(bit) = reader.read_bit() else {
            error!("bitstream ended after {} of {} symbols", emitted, symbols);
            return Err(HuffError::StreamTruncated {
                emitted,
                expected: symbols,
                bits_consumed: reader.bits_read(),
            });
        };

        current = current
            .child(bit)
            .ok_or(HuffError::StreamCorrupt { bit_offset })?;

        if let HuffmanNode::Leaf { byte, .. } = current {
            out.push(*byte);
            emitted += 1;
            current = root;
        }
    }

    Ok(out)
}

/// Decode the payload of an already parsed container.
pub fn unpack(container: &Container, reporter: &mut dyn Reporter) -> Result<Vec<u8>> {
    let symbols = container.table.total();
    let payload = &container.payload;

    reporter.report(Event::StageStarted { stage: Stage::BuildTree });
    let Some(tree) = HuffmanTree::build(&container.table) else {
        if !payload.is_empty() {
            return Err(HuffError::malformed(
                format!("{} payload bytes after an empty frequency table", payload.len()),
                HEADER_SIZE,
            ));
        }
        return Ok(Vec::new());
    };

    reporter.report(Event::StageStarted { stage: Stage::UnpackBits });
    if let HuffmanNode::Leaf { byte, .. } = tree.root {
        // One bit per symbol was written, but no walk is needed to read it back.
        let available_bits = payload.len() as u64 * 8;
        if available_bits < symbols {
            error!("single-symbol stream holds {} of {} symbols", available_bits, symbols);
            return Err(HuffError::StreamTruncated {
                emitted: available_bits,
                expected: symbols,
                bits_consumed: available_bits,
            });
        }
        check_trailing(payload.len(), symbols.div_ceil(8) as usize)?;
        return Ok(vec![byte; symbols as usize]);
    }

    let mut reader = BitReader::new(payload);
    let out = walk(&tree.root, &mut reader, symbols)?;
    debug!("walked {} bits for {} symbols", reader.bits_read(), symbols);

    check_trailing(payload.len(), reader.bits_read().div_ceil(8) as usize)?;
    Ok(out)
}

fn check_trailing(payload_len: usize, used: usize) -> Result<()> {
    if payload_len > used {
        error!("{} trailing payload bytes", payload_len - used);
        return Err(HuffError::malformed(
            format!("{} bytes of data after the last symbol", payload_len - used),
            HEADER_SIZE + used,
        ));
    }
    Ok(())
}

/// Decode a complete container byte buffer back into the original bytes.
pub fn decompress(data: &[u8], reporter: &mut dyn Reporter) -> Result<Vec<u8>> {
    let container = Container::from_bytes(data)?;

    let out = unpack(&container, reporter)?;

    reporter.report(Event::Decoded(Summary::new(
        data.len() as u64,
        out.len() as u64,
        container.table.distinct(),
        crc32(&out),
    )));

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compressor::compress;
    use crate::engine::frequency::FrequencyTable;
    use crate::format::COUNT_WIDTH;
    use crate::report::{CollectingReporter, NullReporter};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn roundtrip(data: &[u8]) -> Vec<u8> {
        let encoded = compress(data, &mut NullReporter).unwrap();
        decompress(&encoded, &mut NullReporter).unwrap()
    }

    #[test]
    fn corpus_example_roundtrips() {
        assert_eq!(roundtrip(b"aaabbc"), b"aaabbc");
    }

    #[test]
    fn degenerate_inputs_roundtrip() {
        assert_eq!(roundtrip(&[]), Vec::<u8>::new());
        assert_eq!(roundtrip(&[0u8]), vec![0u8]);
        assert_eq!(roundtrip(&[0xFF; 1000]), vec![0xFF; 1000]);
        assert_eq!(roundtrip(b"ab"), b"ab");
    }

    #[test]
    fn all_byte_values_roundtrip() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
        assert_eq!(roundtrip(&data), data);
    }

    #[test]
    fn padding_bits_are_ignored() {
        let mut encoded = compress(b"aaabbc", &mut NullReporter).unwrap();
        *encoded.last_mut().unwrap() |= 0x7F;
        assert_eq!(decompress(&encoded, &mut NullReporter).unwrap(), b"aaabbc");
    }

    #[test]
    fn truncated_stream_is_detected() {
        let data = b"the rain in spain stays mainly in the plain";
        let mut encoded = compress(data, &mut NullReporter).unwrap();
        encoded.truncate(encoded.len() - 3);
        let err = decompress(&encoded, &mut NullReporter).unwrap_err();
        assert!(matches!(err, HuffError::StreamTruncated { expected, .. } if expected == data.len() as u64));
    }

    #[test]
    fn truncated_single_symbol_stream_is_detected() {
        let mut encoded = compress(&[7u8; 20], &mut NullReporter).unwrap();
        encoded.pop();
        let err = decompress(&encoded, &mut NullReporter).unwrap_err();
        assert!(matches!(err, HuffError::StreamTruncated { emitted: 16, expected: 20, .. }));
    }

    #[test]
    fn trailing_bytes_are_malformed() {
        let mut encoded = compress(b"aaabbc", &mut NullReporter).unwrap();
        encoded.push(0);
        let err = decompress(&encoded, &mut NullReporter).unwrap_err();
        assert!(matches!(err, HuffError::MalformedContainer { offset, .. } if offset == HEADER_SIZE + 2));
    }

    #[test]
    fn payload_without_symbols_is_malformed() {
        let mut encoded = vec![0u8; HEADER_SIZE];
        encoded.push(0xAA);
        let err = decompress(&encoded, &mut NullReporter).unwrap_err();
        assert!(matches!(err, HuffError::MalformedContainer { .. }));
    }

    #[test]
    fn walking_past_a_leaf_is_corrupt() {
        let tree = HuffmanTree::build(&FrequencyTable::count(b"zz")).unwrap();
        let mut reader = BitReader::new(&[0x00]);
        let err = walk(&tree.root, &mut reader, 2).unwrap_err();
        assert!(matches!(err, HuffError::StreamCorrupt { bit_offset: 0 }));
    }

    #[test]
    fn walk_stops_at_symbol_count() {
        let tree = HuffmanTree::build(&FrequencyTable::count(b"aaabbc")).unwrap();
        let mut reader = BitReader::new(&[0b0001_1111, 0b0000_0000]);
        assert_eq!(walk(&tree.root, &mut reader, 3).unwrap(), b"aaa");
        assert_eq!(reader.bits_read(), 3);
    }

    #[test]
    fn stages_follow_decode_progress() {
        let packed = compress(b"stages", &mut NullReporter).unwrap();
        let mut reporter = CollectingReporter::default();
        decompress(&packed, &mut reporter).unwrap();
        assert_eq!(reporter.events[0], Event::StageStarted { stage: Stage::BuildTree });
        assert_eq!(reporter.events[1], Event::StageStarted { stage: Stage::UnpackBits });
        assert!(matches!(reporter.events[2], Event::Decoded(_)));

        // nothing to unpack without a tree
        let mut reporter = CollectingReporter::default();
        decompress(&[0u8; HEADER_SIZE], &mut reporter).unwrap();
        assert_eq!(reporter.events.len(), 2);
        assert_eq!(reporter.events[0], Event::StageStarted { stage: Stage::BuildTree });
    }

    #[test]
    fn generated_inputs_roundtrip_and_damage_never_panics() {
        let mut rng = StdRng::seed_from_u64(0x2545_F491);

        for round in 0..300 {
            let len = rng.gen_range(0..700usize);
            let alphabet = rng.gen_range(1..=256u16);
            let data: Vec<u8> = (0..len).map(|_| rng.gen_range(0..alphabet) as u8).collect();
            let packed = compress(&data, &mut NullReporter).unwrap();
            assert_eq!(decompress(&packed, &mut NullReporter).unwrap(), data, "round {}", round);

            if packed.len() > HEADER_SIZE {
                let mut flipped = packed.clone();
                let at = rng.gen_range(HEADER_SIZE..packed.len());
                flipped[at] ^= 1u8 << rng.gen_range(0..8u32);
                let _ = decompress(&flipped, &mut NullReporter);

                let cut = rng.gen_range(1..=packed.len() - HEADER_SIZE);
                assert!(decompress(&packed[..packed.len() - cut], &mut NullReporter).is_err());
            }
        }
    }

    #[test]
    fn huge_counts_with_tiny_payload_are_truncated() {
        let mut header = vec![0xFFu8; HEADER_SIZE];
        header.push(0x00);
        let err = decompress(&header, &mut NullReporter).unwrap_err();
        assert!(matches!(err, HuffError::StreamTruncated { .. }));

        let mut header = vec![0u8; HEADER_SIZE];
        let at = b'x' as usize * COUNT_WIDTH;
        header[at..at + COUNT_WIDTH].copy_from_slice(&u32::MAX.to_be_bytes());
        header.push(0x00);
        let err = decompress(&header, &mut NullReporter).unwrap_err();
        assert!(matches!(err, HuffError::StreamTruncated { emitted: 8, .. }));
    }
}
