/// Occurrence count for each of the 256 byte values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self { counts: [0; 256] }
    }

    pub fn from_counts(counts: [u64; 256]) -> Self {
        Self { counts }
    }

    /// Count every byte of `data`.
    pub fn count(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        Self { counts }
    }

    pub fn get(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    pub fn counts(&self) -> &[u64; 256] {
        &self.counts
    }

    /// Number of symbols the table describes, i.e. the original input length.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of byte values with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Present symbols in ascending byte order.
    pub fn iter_present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(b, &c)| (b as u8, c))
    }

    /// Add another table's counts into this one.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_sum_to_input_length() {
        let table = FrequencyTable::count(b"aaabbc");
        assert_eq!(table.get(b'a'), 3);
        assert_eq!(table.get(b'b'), 2);
        assert_eq!(table.get(b'c'), 1);
        assert_eq!(table.total(), 6);
        assert_eq!(table.distinct(), 3);
    }

    #[test]
    fn empty_input_gives_all_zero_table() {
        let table = FrequencyTable::count(&[]);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert_eq!(table.iter_present().count(), 0);
    }

    #[test]
    fn chunked_counts_merge_to_whole() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let mut merged = FrequencyTable::count(&data[..400]);
        merged.merge(&FrequencyTable::count(&data[400..]));
        assert_eq!(merged, FrequencyTable::count(&data));
    }

    #[test]
    fn present_symbols_are_ascending() {
        let table = FrequencyTable::count(b"zyxzz");
        let present: Vec<_> = table.iter_present().collect();
        assert_eq!(present, vec![(b'x', 1), (b'y', 1), (b'z', 3)]);
    }
}
