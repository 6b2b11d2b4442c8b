//! MSB-first bit packing. The first bit of a stream lands in bit 7 of the
//! first byte; a trailing partial byte is padded with zero bits.

#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    current_byte: u8,
    bit_count: u8,
    total_bits: u64,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_bits(bits: u64) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8) as usize),
            ..Self::default()
        }
    }

    pub fn push_bit(&mut self, bit: bool) {
        if bit {
            self.current_byte |= 1 << (7 - self.bit_count);
        }
        self.bit_count += 1;
        self.total_bits += 1;

        if self.bit_count == 8 {
            self.bytes.push(self.current_byte);
            self.current_byte = 0;
            self.bit_count = 0;
        }
    }

    pub fn push_bits(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.push_bit(bit);
        }
    }

    pub fn bit_len(&self) -> u64 {
        self.total_bits
    }

    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push(self.current_byte);
        }
        self.bytes
    }
}

#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    position: u64,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.position
    }

    pub fn remaining(&self) -> u64 {
        self.data.len() as u64 * 8 - self.position
    }

    pub fn read_bit(&mut self) -> Option<bool> {
        let byte = *self.data.get((self.position / 8) as usize)?;
        let bit = (byte >> (7 - (self.position % 8))) & 1 == 1;
        self.position += 1;
        Some(bit)
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit()
    }
}
