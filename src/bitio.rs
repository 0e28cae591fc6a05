//! Bit-granular reading and writing over byte buffers
//!
//! Bits are packed MSB-first within each byte, and multi-bit values are written and read with
//! their most significant bit first. The writer carries an explicit bit capacity: writes past it
//! are silently dropped, which is how the decoder discards the surplus traceback bit beyond the
//! message length.

/// Writer that packs bits MSB-first into a byte buffer, up to a fixed bit capacity.
#[derive(Debug)]
pub(crate) struct BitWriter<'a> {
    bytes: &'a mut [u8],
    bit_cap: usize,
    pos: usize,
}

impl<'a> BitWriter<'a> {
    /// Returns a writer over the given buffer with the given bit capacity.
    ///
    /// The buffer must hold at least `bit_cap` bits; the bytes it covers are zeroed up front so
    /// that single-bit writes can OR their way in.
    pub(crate) fn new(bytes: &'a mut [u8], bit_cap: usize) -> Self {
        debug_assert!(bytes.len() * 8 >= bit_cap);
        for byte in bytes.iter_mut().take(bit_cap.div_ceil(8)) {
            *byte = 0;
        }
        Self {
            bytes,
            bit_cap,
            pos: 0,
        }
    }

    /// Appends a single bit (the LSB of `bit`); a no-op once the capacity is reached.
    pub(crate) fn write_bit(&mut self, bit: u8) {
        if self.pos >= self.bit_cap {
            return;
        }
        self.bytes[self.pos / 8] |= (bit & 1) << (7 - self.pos % 8);
        self.pos += 1;
    }

    /// Appends the low `num_bits` bits of `val`, most significant first.
    pub(crate) fn write(&mut self, val: u16, num_bits: usize) {
        for shift in (0 .. num_bits).rev() {
            self.write_bit(((val >> shift) & 1) as u8);
        }
    }

    /// Returns the number of bits written so far.
    pub(crate) fn num_bits_written(&self) -> usize {
        self.pos
    }
}

/// Reader that consumes bits MSB-first from a byte buffer.
#[derive(Clone, Debug)]
pub(crate) struct BitReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Returns a reader over the given buffer, positioned at its first bit.
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Consumes and returns a single bit.
    pub(crate) fn read_bit(&mut self) -> u8 {
        let bit = (self.bytes[self.pos / 8] >> (7 - self.pos % 8)) & 1;
        self.pos += 1;
        bit
    }

    /// Consumes `num_bits` bits and returns them as a value, first-read bit most significant.
    pub(crate) fn read(&mut self, num_bits: usize) -> u16 {
        let mut val = 0;
        for _ in 0 .. num_bits {
            val = (val << 1) | u16::from(self.read_bit());
        }
        val
    }
}


#[cfg(test)]
mod tests_of_bitreader {
    use super::*;

    #[test]
    fn test_read_bit() {
        let bytes = [0b1011_0010, 0b1100_0000];
        let mut reader = BitReader::new(&bytes);
        let bits: Vec<u8> = (0 .. 10).map(|_| reader.read_bit()).collect();
        assert_eq!(bits, [1, 0, 1, 1, 0, 0, 1, 0, 1, 1]);
    }

    #[test]
    fn test_read_msb_first() {
        let bytes = [0b1010_1100];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read(3), 0b101);
        assert_eq!(reader.read(4), 0b0110);
    }

    #[test]
    fn test_round_trip_with_writer() {
        let mut bytes = [0u8; 4];
        let mut writer = BitWriter::new(&mut bytes, 32);
        for val in [0b11u16, 0b01, 0b00, 0b10] {
            writer.write(val, 2);
        }
        let mut reader = BitReader::new(&bytes);
        for val in [0b11u16, 0b01, 0b00, 0b10] {
            assert_eq!(reader.read(2), val);
        }
    }
}
