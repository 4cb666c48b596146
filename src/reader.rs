use byteorder::{ByteOrder, LittleEndian};

/// Byte order of a multi-byte value within the stream.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Endianness {
    /// Least significant byte first.
    LittleEndian,
    /// Most significant byte first (the byte order used by ICNS files).
    BigEndian,
}

/// A read cursor over an in-memory byte buffer.
///
/// Reads never fail.  When fewer bytes remain than a read asks for, the read
/// yields an empty result (an empty vector, an empty string, or zero) and
/// the cursor stays where it was.  Callers that care about truncation must
/// check for this themselves, e.g. by comparing lengths or by checking
/// [`remaining`](#method.remaining) beforehand.
pub struct StreamReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> StreamReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> StreamReader<'a> {
        StreamReader { data, position: 0 }
    }

    /// Returns the current cursor position, in bytes from the start.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of bytes between the cursor and the end.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Returns the total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true exactly when the cursor is at the end of the buffer.
    pub fn at_end(&self) -> bool {
        self.position == self.data.len()
    }

    /// Reads exactly `count` bytes.  For `BigEndian`, the bytes are returned
    /// in reverse storage order.  Returns an empty vector on a short read.
    pub fn read_bytes(&mut self, count: usize, endianness: Endianness)
                      -> Vec<u8> {
        match self.acquire(count) {
            Some(bytes) => {
                let mut bytes = bytes.to_vec();
                if endianness == Endianness::BigEndian {
                    bytes.reverse();
                }
                bytes
            }
            None => Vec::new(),
        }
    }

    /// Reads one byte, or returns zero at the end of the buffer.
    pub fn read_u8(&mut self) -> u8 {
        self.read_array::<1>(Endianness::LittleEndian).map_or(0, |b| b[0])
    }

    /// Reads a 32-bit value and returns whether it is non-zero.
    pub fn read_bool(&mut self, endianness: Endianness) -> bool {
        self.read_i32(endianness) != 0
    }

    /// Reads a `u16`, or returns zero on a short read.
    pub fn read_u16(&mut self, endianness: Endianness) -> u16 {
        self.read_array::<2>(endianness)
            .map_or(0, |b| LittleEndian::read_u16(&b))
    }

    /// Reads a 24-bit unsigned value (zero-extended into a `u32`), or returns
    /// zero on a short read.
    pub fn read_u24(&mut self, endianness: Endianness) -> u32 {
        self.read_array::<3>(endianness)
            .map_or(0, |b| LittleEndian::read_u24(&b))
    }

    /// Reads a `u32`, or returns zero on a short read.
    pub fn read_u32(&mut self, endianness: Endianness) -> u32 {
        self.read_array::<4>(endianness)
            .map_or(0, |b| LittleEndian::read_u32(&b))
    }

    /// Reads a `u64`, or returns zero on a short read.
    pub fn read_u64(&mut self, endianness: Endianness) -> u64 {
        self.read_array::<8>(endianness)
            .map_or(0, |b| LittleEndian::read_u64(&b))
    }

    /// Reads an `i16`, or returns zero on a short read.
    pub fn read_i16(&mut self, endianness: Endianness) -> i16 {
        self.read_array::<2>(endianness)
            .map_or(0, |b| LittleEndian::read_i16(&b))
    }

    /// Reads an `i32`, or returns zero on a short read.
    pub fn read_i32(&mut self, endianness: Endianness) -> i32 {
        self.read_array::<4>(endianness)
            .map_or(0, |b| LittleEndian::read_i32(&b))
    }

    /// Reads an `i64`, or returns zero on a short read.
    pub fn read_i64(&mut self, endianness: Endianness) -> i64 {
        self.read_array::<8>(endianness)
            .map_or(0, |b| LittleEndian::read_i64(&b))
    }

    /// Reads an IEEE 754 `f32`, or returns zero on a short read.
    pub fn read_f32(&mut self, endianness: Endianness) -> f32 {
        self.read_array::<4>(endianness)
            .map_or(0.0, |b| LittleEndian::read_f32(&b))
    }

    /// Reads `byte_count` bytes of single-byte text.  Bytes outside the
    /// ASCII range decode as `?`.  Returns an empty string on a short read.
    pub fn read_ansi_string(&mut self, byte_count: usize) -> String {
        match self.acquire(byte_count) {
            Some(bytes) => bytes
                .iter()
                .map(|&byte| if byte.is_ascii() { byte as char } else { '?' })
                .collect(),
            None => String::new(),
        }
    }

    /// Reads `byte_count` bytes of UTF-16LE text.  Unpaired surrogates and a
    /// trailing odd byte decode as U+FFFD.  Returns an empty string on a
    /// short read.
    pub fn read_unicode_string(&mut self, byte_count: usize) -> String {
        let bytes = match self.acquire(byte_count) {
            Some(bytes) => bytes,
            None => return String::new(),
        };
        let chunks = bytes.chunks_exact(2);
        let odd_tail = !chunks.remainder().is_empty();
        let units = chunks.map(LittleEndian::read_u16);
        let mut text: String = char::decode_utf16(units)
            .map(|ch| ch.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        if odd_tail {
            text.push(char::REPLACEMENT_CHARACTER);
        }
        text
    }

    /// Reads `N` bytes into an array in the byte order the little-endian
    /// decoders expect.
    fn read_array<const N: usize>(&mut self, endianness: Endianness)
                                  -> Option<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.acquire(N)?);
        if endianness == Endianness::BigEndian {
            array.reverse();
        }
        Some(array)
    }

    /// Private helper method; every read goes through here.
    fn acquire(&mut self, count: usize) -> Option<&'a [u8]> {
        if count > self.remaining() {
            return None;
        }
        let start = self.position;
        self.position += count;
        Some(&self.data[start..self.position])
    }
}
