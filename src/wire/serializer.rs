/// Append-order encoder for one outgoing request.
///
/// Every `push_*` call appends the big-endian byte form of its value to an
/// internal buffer; the buffer grows in exactly the order of the calls. One
/// serializer instance backs one request: the buffer is never reset, so a
/// fresh instance is created per call.
///
/// Out-of-range values are unrepresentable here. The typed signatures carry
/// the width, so a value that would not fit its wire field is rejected by the
/// compiler instead of being truncated at runtime.
#[derive(Debug, Default)]
pub struct Serializer {
    data: Vec<u8>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_u8(&mut self, val: u8) {
        self.data.push(val);
    }

    pub fn push_u16(&mut self, val: u16) {
        self.data.extend_from_slice(&val.to_be_bytes());
    }

    pub fn push_u32(&mut self, val: u32) {
        self.data.extend_from_slice(&val.to_be_bytes());
    }

    pub fn push_u64(&mut self, val: u64) {
        self.data.extend_from_slice(&val.to_be_bytes());
    }

    pub fn push_i8(&mut self, val: i8) {
        self.data.push(val as u8);
    }

    pub fn push_i16(&mut self, val: i16) {
        self.data.extend_from_slice(&val.to_be_bytes());
    }

    pub fn push_i32(&mut self, val: i32) {
        self.data.extend_from_slice(&val.to_be_bytes());
    }

    pub fn push_i64(&mut self, val: i64) {
        self.data.extend_from_slice(&val.to_be_bytes());
    }

    /// Appends the IEEE-754 big-endian form of a 4-byte float.
    pub fn push_float(&mut self, val: f32) {
        self.data.extend_from_slice(&val.to_be_bytes());
    }

    /// Appends the IEEE-754 big-endian form of an 8-byte float.
    pub fn push_double(&mut self, val: f64) {
        self.data.extend_from_slice(&val.to_be_bytes());
    }

    /// Borrows the bytes accumulated so far without resetting them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the serializer, yielding the finished request buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
