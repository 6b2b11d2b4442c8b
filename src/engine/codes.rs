use std::collections::BTreeMap;

use crate::engine::frequency::FrequencyTable;
use crate::engine::huffman::{HuffmanNode, HuffmanTree};

/// Byte value to bit code, left edges are `false` and right edges `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    pub encode_table: BTreeMap<u8, Vec<bool>>,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut encode_table = BTreeMap::new();

        fn build_codes(node: &HuffmanNode, code: &mut Vec<bool>, table: &mut BTreeMap<u8, Vec<bool>>) {
            match node {
                HuffmanNode::Leaf { byte, .. } => {
                    // A lone leaf at the root still needs a bit to be addressable.
                    let bits = if code.is_empty() { vec![false] } else { code.clone() };
                    table.insert(*byte, bits);
                }
                HuffmanNode::Internal { left, right, .. } => {
                    code.push(false);
                    build_codes(left, code, table);
                    code.pop();

                    code.push(true);
                    build_codes(right, code, table);
                    code.pop();
                }
            }
        }

        build_codes(&tree.root, &mut Vec::new(), &mut encode_table);
        Self { encode_table }
    }

    pub fn get(&self, byte: u8) -> Option<&[bool]> {
        self.encode_table.get(&byte).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.encode_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encode_table.is_empty()
    }

    /// Exact number of payload bits needed to encode data with these counts.
    /// Bytes without a code contribute nothing.
    pub fn total_bits(&self, table: &FrequencyTable) -> u64 {
        table
            .iter_present()
            .filter_map(|(byte, count)| self.get(byte).map(|code| code.len() as u64 * count))
            .sum()
    }

    /// Symbols ordered by count descending, ties by byte value.
    pub fn by_frequency<'a>(&'a self, table: &FrequencyTable) -> Vec<(u8, u64, &'a [bool])> {
        let mut rows: Vec<_> = table
            .iter_present()
            .filter_map(|(byte, count)| self.get(byte).map(|code| (byte, count, code)))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        rows
    }
}

/// Render a code as a string of `0` and `1`.
pub fn code_string(code: &[bool]) -> String {
    code.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}
