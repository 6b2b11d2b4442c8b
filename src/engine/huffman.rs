use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Write;

use tracing::trace;

use crate::engine::frequency::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        byte: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } => *weight,
            HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    /// Child selected by one bit: `false` goes left, `true` goes right.
    /// A leaf has no children.
    pub fn child(&self, bit: bool) -> Option<&HuffmanNode> {
        match self {
            HuffmanNode::Leaf { .. } => None,
            HuffmanNode::Internal { left, right, .. } => Some(if bit { right } else { left }),
        }
    }

    fn merge(left: HuffmanNode, right: HuffmanNode) -> Self {
        HuffmanNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Heap slot. `order` is the tie-break for equal weights: leaves use their
/// byte value, merged nodes take 256, 257, ... in creation order.
struct HeapEntry {
    weight: u64,
    order: u32,
    node: HuffmanNode,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.order == other.order
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.order.cmp(&self.order))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffmanNode,
}

impl HuffmanTree {
    /// Build the tree for a frequency table. Zero-count bytes are left out.
    /// Returns `None` when no byte has a nonzero count.
    pub fn build(table: &FrequencyTable) -> Option<Self> {
        let mut heap = BinaryHeap::new();
        for (byte, weight) in table.iter_present() {
            heap.push(HeapEntry {
                weight,
                order: byte as u32,
                node: HuffmanNode::Leaf { byte, weight },
            });
        }

        let mut next_order = 256u32;
        loop {
            let first = heap.pop()?;
            let Some(second) = heap.pop() else {
                trace!("tree complete, root weight {}", first.weight);
                return Some(Self { root: first.node });
            };

            let node = HuffmanNode::merge(first.node, second.node);
            heap.push(HeapEntry {
                weight: node.weight(),
                order: next_order,
                node,
            });
            next_order += 1;
        }
    }

    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        fn depth_of(node: &HuffmanNode) -> usize {
            match node {
                HuffmanNode::Leaf { .. } => 0,
                HuffmanNode::Internal { left, right, .. } => 1 + depth_of(left).max(depth_of(right)),
            }
        }
        depth_of(&self.root)
    }

    pub fn leaf_count(&self) -> usize {
        fn leaves(node: &HuffmanNode) -> usize {
            match node {
                HuffmanNode::Leaf { .. } => 1,
                HuffmanNode::Internal { left, right, .. } => leaves(left) + leaves(right),
            }
        }
        leaves(&self.root)
    }

    /// Indented dump of the tree, one node per line.
    pub fn render(&self) -> String {
        fn render_node(node: &HuffmanNode, depth: usize, label: &str, out: &mut String) {
            let indent = "  ".repeat(depth);
            match node {
                HuffmanNode::Leaf { byte, weight } => {
                    let _ = writeln!(out, "{}{} leaf {} [weight {}]", indent, label, display_byte(*byte), weight);
                }
                HuffmanNode::Internal { weight, left, right } => {
                    let _ = writeln!(out, "{}{} node [weight {}]", indent, label, weight);
                    render_node(left, depth + 1, "0", out);
                    render_node(right, depth + 1, "1", out);
                }
            }
        }

        let mut out = String::new();
        render_node(&self.root, 0, "*", &mut out);
        out
    }
}

/// Printable form of a byte for diagnostics: the character itself for
/// graphic ASCII, otherwise a hex escape.
pub fn display_byte(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", byte as char)
    } else {
        format!("0x{:02x}", byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_weights(node: &HuffmanNode) {
        if let HuffmanNode::Internal { weight, left, right } = node {
            assert_eq!(*weight, left.weight() + right.weight());
            check_weights(left);
            check_weights(right);
        }
    }

    #[test]
    fn empty_table_has_no_tree() {
        assert!(HuffmanTree::build(&FrequencyTable::new()).is_none());
    }

    #[test]
    fn single_symbol_is_a_leaf_root() {
        let tree = HuffmanTree::build(&FrequencyTable::count(b"qqqq")).unwrap();
        assert_eq!(tree.root, HuffmanNode::Leaf { byte: b'q', weight: 4 });
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn internal_weights_are_child_sums() {
        let data = b"the quick brown fox jumps over the lazy dog, again and again";
        let tree = HuffmanTree::build(&FrequencyTable::count(data)).unwrap();
        check_weights(&tree.root);
        assert_eq!(tree.weight(), data.len() as u64);
        assert_eq!(tree.leaf_count(), FrequencyTable::count(data).distinct());
    }

    #[test]
    fn equal_weights_break_ties_by_byte_then_creation() {
        // a:3 b:2 c:1 -> c+b merge first (c is lighter), then a (order 97)
        // is extracted before the merged node (order 256).
        let tree = HuffmanTree::build(&FrequencyTable::count(b"aaabbc")).unwrap();
        let HuffmanNode::Internal { left, right, .. } = &tree.root else {
            panic!("root should be internal");
        };
        assert_eq!(**left, HuffmanNode::Leaf { byte: b'a', weight: 3 });
        let HuffmanNode::Internal { left, right, .. } = &**right else {
            panic!("right subtree should be internal");
        };
        assert_eq!(**left, HuffmanNode::Leaf { byte: b'c', weight: 1 });
        assert_eq!(**right, HuffmanNode::Leaf { byte: b'b', weight: 2 });
    }

    #[test]
    fn building_twice_gives_identical_trees() {
        let table = FrequencyTable::count(b"abcdabcdabcdeeff");
        assert_eq!(HuffmanTree::build(&table), HuffmanTree::build(&table));
    }

    #[test]
    fn full_alphabet_depth_is_bounded() {
        let data: Vec<u8> = (0..=255u8).collect();
        let tree = HuffmanTree::build(&FrequencyTable::count(&data)).unwrap();
        assert_eq!(tree.leaf_count(), 256);
        assert_eq!(tree.depth(), 8);
    }

    #[test]
    fn render_lists_every_node() {
        let tree = HuffmanTree::build(&FrequencyTable::count(b"aab")).unwrap();
        let text = tree.render();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("leaf 'a' [weight 2]"));
    }
}
