use std::convert::TryInto;

use crate::{Endian, Tag};

/// Builder for NBT data. This is to create test data. It specifically does
/// *not* guarantee the resulting data is valid NBT. Creating invalid NBT is
/// useful for testing.
pub struct Builder {
    payload: Vec<u8>,
    endian: Endian,
}

impl Builder {
    /// Big-endian data, as Java Edition writes it.
    pub fn new() -> Self {
        Self::with_endian(Endian::Big)
    }

    /// Little-endian data, as Bedrock Edition writes it.
    pub fn little() -> Self {
        Self::with_endian(Endian::Little)
    }

    pub fn with_endian(endian: Endian) -> Self {
        Builder {
            payload: Vec::new(),
            endian,
        }
    }

    pub fn tag(mut self, t: Tag) -> Self {
        self.payload.push(t as u8);
        self
    }

    /// A length-prefixed string, in modified UTF-8 for big-endian data.
    pub fn name(self, name: &str) -> Self {
        let bytes = match self.endian {
            Endian::Big => cesu8::to_java_cesu8(name),
            Endian::Little => name.as_bytes().into(),
        };
        self.raw_str_len(bytes.len()).raw_bytes(&bytes)
    }

    pub fn start_compound(self, name: &str) -> Self {
        self.tag(Tag::Compound).name(name)
    }

    pub fn end_compound(self) -> Self {
        self.tag(Tag::End)
    }

    pub fn start_list(self, name: &str, element_tag: Tag, size: i32) -> Self {
        self.tag(Tag::List)
            .name(name)
            .tag(element_tag)
            .int_payload(size)
    }

    pub fn start_anon_list(self, element_tag: Tag, size: i32) -> Self {
        self.tag(element_tag).int_payload(size)
    }

    pub fn byte(self, name: &str, b: i8) -> Self {
        self.tag(Tag::Byte).name(name).byte_payload(b)
    }

    pub fn short(self, name: &str, b: i16) -> Self {
        self.tag(Tag::Short).name(name).short_payload(b)
    }

    pub fn int(self, name: &str, b: i32) -> Self {
        self.tag(Tag::Int).name(name).int_payload(b)
    }

    pub fn long(self, name: &str, b: i64) -> Self {
        self.tag(Tag::Long).name(name).long_payload(b)
    }

    pub fn string(self, name: &str, s: &str) -> Self {
        self.tag(Tag::String).name(name).string_payload(s)
    }

    pub fn float(self, name: &str, n: f32) -> Self {
        self.tag(Tag::Float).name(name).float_payload(n)
    }

    pub fn double(self, name: &str, n: f64) -> Self {
        self.tag(Tag::Double).name(name).double_payload(n)
    }

    pub fn byte_array(self, name: &str, bs: &[i8]) -> Self {
        self.tag(Tag::ByteArray).name(name).byte_array_payload(bs)
    }

    pub fn int_array(self, name: &str, arr: &[i32]) -> Self {
        self.tag(Tag::IntArray).name(name).int_array_payload(arr)
    }

    pub fn long_array(self, name: &str, arr: &[i64]) -> Self {
        self.tag(Tag::LongArray).name(name).long_array_payload(arr)
    }

    pub fn string_payload(self, s: &str) -> Self {
        self.name(s)
    }

    pub fn byte_payload(mut self, b: i8) -> Self {
        self.payload.push(b as u8);
        self
    }

    /// Length prefix and bytes.
    pub fn byte_array_payload(mut self, bs: &[i8]) -> Self {
        self = self.int_payload(bs.len().try_into().unwrap());
        for b in bs {
            self.payload.push(*b as u8);
        }
        self
    }

    pub fn short_payload(self, i: i16) -> Self {
        let (be, le) = (i.to_be_bytes(), i.to_le_bytes());
        self.ordered(&be, &le)
    }

    pub fn int_payload(self, i: i32) -> Self {
        let (be, le) = (i.to_be_bytes(), i.to_le_bytes());
        self.ordered(&be, &le)
    }

    /// Length prefix and ints.
    pub fn int_array_payload(mut self, is: &[i32]) -> Self {
        self = self.int_payload(is.len().try_into().unwrap());
        for i in is {
            self = self.int_payload(*i);
        }
        self
    }

    pub fn long_payload(self, i: i64) -> Self {
        let (be, le) = (i.to_be_bytes(), i.to_le_bytes());
        self.ordered(&be, &le)
    }

    /// Length prefix and longs.
    pub fn long_array_payload(mut self, is: &[i64]) -> Self {
        self = self.int_payload(is.len().try_into().unwrap());
        for i in is {
            self = self.long_payload(*i);
        }
        self
    }

    pub fn float_payload(self, f: f32) -> Self {
        let (be, le) = (f.to_be_bytes(), f.to_le_bytes());
        self.ordered(&be, &le)
    }

    pub fn double_payload(self, f: f64) -> Self {
        let (be, le) = (f.to_be_bytes(), f.to_le_bytes());
        self.ordered(&be, &le)
    }

    pub fn raw_str_len(self, len: usize) -> Self {
        let len: u16 = len.try_into().expect("test given length beyond u16");
        let (be, le) = (len.to_be_bytes(), len.to_le_bytes());
        self.ordered(&be, &le)
    }

    /// Straight up add some bytes to the payload. For very corner-case tests
    /// that are not worth a specific builder method.
    pub fn raw_bytes(mut self, bs: &[u8]) -> Self {
        self.payload.extend_from_slice(bs);
        self
    }

    /// This is a no-op, but can make code clearer by showing the points where a
    /// compound in a list has logically started.
    pub fn start_anon_compound(self) -> Self {
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.payload
    }

    fn ordered(mut self, be: &[u8], le: &[u8]) -> Self {
        match self.endian {
            Endian::Big => self.payload.extend_from_slice(be),
            Endian::Little => self.payload.extend_from_slice(le),
        }
        self
    }
}
