//! Decoding of binary NBT into [`NamedTag`]s.
//!
//! The whole input is held in memory. Each top-level tag is read in turn until
//! the input is exhausted; unlike the entries of a compound, top-level tags are
//! not terminated by an End tag, and a buffer may hold more than one of them
//! (Bedrock Edition does this for some files).
//!
//! ```
//! use nbt2json::{read::decode, Endian, Value};
//!
//! let input = [10, 0, 0, 3, 0, 1, b'x', 0, 0, 0, 7, 0];
//! let tags = decode(&input, Endian::Big).unwrap();
//!
//! assert_eq!(tags.len(), 1);
//! assert_eq!(tags[0].value.get("x"), Some(&Value::Int(7)));
//! ```

use std::convert::TryFrom;
use std::marker::PhantomData;
use std::str;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use log::{debug, trace};

use crate::error::{DecodeError, DecodeResult};
use crate::{Endian, List, NamedTag, Tag, Value, MAX_DEPTH};

/// Decode every top-level tag in `input`.
pub fn decode(input: &[u8], endian: Endian) -> DecodeResult<Vec<NamedTag>> {
    let tags = match endian {
        Endian::Big => Reader::<BigEndian>::new(input, endian).read_all()?,
        Endian::Little => Reader::<LittleEndian>::new(input, endian).read_all()?,
    };
    debug!("decoded {} top-level tags from {} bytes", tags.len(), input.len());
    Ok(tags)
}

/// Reads NBT from a byte slice with the byte order `B`. The slice is advanced
/// as data is consumed, so `input.len()` is always the number of bytes left.
struct Reader<'a, B: ByteOrder> {
    input: &'a [u8],
    depth: usize,
    modified_utf8: bool,
    order: PhantomData<B>,
}

impl<'a, B: ByteOrder> Reader<'a, B> {
    fn new(input: &'a [u8], endian: Endian) -> Self {
        Self {
            input,
            depth: 0,
            modified_utf8: endian.modified_utf8(),
            order: PhantomData,
        }
    }

    fn read_all(&mut self) -> DecodeResult<Vec<NamedTag>> {
        let mut tags = vec![];
        while !self.input.is_empty() {
            let index = tags.len();
            let tag = self.read_tag()?;
            if tag == Tag::End {
                return Err(DecodeError::bespoke(format!(
                    "found end tag at top level, in place of tag {}",
                    index
                )));
            }
            let named = self
                .read_named(tag)
                .map_err(|e| e.within(format!("reading top-level tag {}", index)))?;
            tags.push(named);
        }
        Ok(tags)
    }

    fn read_tag(&mut self) -> DecodeResult<Tag> {
        let tag = self
            .input
            .read_u8()
            .map_err(|e| DecodeError::io("reading tag type", e))?;
        u8_to_tag(tag)
    }

    /// Read the name and payload of a tag whose type byte has been consumed.
    fn read_named(&mut self, tag: Tag) -> DecodeResult<NamedTag> {
        let name = self
            .read_size_prefixed_string()
            .map_err(|e| e.within("reading name - is the byte order set correctly?"))?;
        trace!("reading {:?} {:?}", tag, name);

        let value = self
            .read_payload(tag)
            .map_err(|e| e.within(format!("reading {} {:?}", tag_name(tag), name)))?;
        Ok(NamedTag { name, value })
    }

    fn read_size_prefixed_string(&mut self) -> DecodeResult<String> {
        let len = self
            .input
            .read_u16::<B>()
            .map_err(|e| DecodeError::io("reading string length", e))? as usize;
        let bytes = self.take(len, "reading string data")?;

        if self.modified_utf8 {
            match cesu8::from_java_cesu8(bytes) {
                Ok(s) => Ok(s.into_owned()),
                Err(e) => Err(DecodeError::nonunicode("reading string data", bytes.to_vec(), e)),
            }
        } else {
            match str::from_utf8(bytes) {
                Ok(s) => Ok(s.to_owned()),
                Err(e) => Err(DecodeError::nonunicode("reading string data", bytes.to_vec(), e)),
            }
        }
    }

    fn read_payload(&mut self, tag: Tag) -> DecodeResult<Value> {
        Ok(match tag {
            Tag::End => return Err(DecodeError::bespoke("end tag has no payload")),
            Tag::Byte => Value::Byte(self.read_i8()?),
            Tag::Short => Value::Short(self.read_i16()?),
            Tag::Int => Value::Int(self.read_i32()?),
            Tag::Long => Value::Long(self.read_i64()?),
            Tag::Float => Value::Float(self.read_f32()?),
            Tag::Double => Value::Double(self.read_f64()?),
            Tag::ByteArray => Value::ByteArray(self.read_byte_array()?),
            Tag::String => Value::String(self.read_size_prefixed_string()?),
            Tag::List => Value::List(self.nested(Self::read_list)?),
            Tag::Compound => Value::Compound(self.nested(Self::read_compound)?),
            Tag::IntArray => Value::IntArray(self.read_int_array()?),
            Tag::LongArray => Value::LongArray(self.read_long_array()?),
        })
    }

    fn read_compound(&mut self) -> DecodeResult<Vec<NamedTag>> {
        let mut entries = vec![];
        loop {
            let tag = self
                .read_tag()
                .map_err(|e| e.within("compound: reading next tag type"))?;
            if tag == Tag::End {
                return Ok(entries);
            }
            entries.push(self.read_named(tag)?);
        }
    }

    fn read_list(&mut self) -> DecodeResult<List> {
        let element = self
            .read_tag()
            .map_err(|e| e.within("reading list element type"))?;
        let len = self.read_len("list")?;

        Ok(match element {
            Tag::End if len == 0 => List::End,
            Tag::End => {
                return Err(DecodeError::invalid_length(format!(
                    "list of end tags with length {}",
                    len
                )))
            }
            Tag::Byte => List::Byte(self.read_items(len, 1, Self::read_i8)?),
            Tag::Short => List::Short(self.read_items(len, 2, Self::read_i16)?),
            Tag::Int => List::Int(self.read_items(len, 4, Self::read_i32)?),
            Tag::Long => List::Long(self.read_items(len, 8, Self::read_i64)?),
            Tag::Float => List::Float(self.read_items(len, 4, Self::read_f32)?),
            Tag::Double => List::Double(self.read_items(len, 8, Self::read_f64)?),
            Tag::ByteArray => List::ByteArray(self.read_items(len, 4, Self::read_byte_array)?),
            Tag::String => {
                List::String(self.read_items(len, 2, Self::read_size_prefixed_string)?)
            }
            Tag::List => List::List(self.read_items(len, 5, |r| r.nested(Self::read_list))?),
            Tag::Compound => {
                List::Compound(self.read_items(len, 1, |r| r.nested(Self::read_compound))?)
            }
            Tag::IntArray => List::IntArray(self.read_items(len, 4, Self::read_int_array)?),
            Tag::LongArray => List::LongArray(self.read_items(len, 4, Self::read_long_array)?),
        })
    }

    /// Read `len` list elements, each at least `min_size` bytes long.
    fn read_items<T>(
        &mut self,
        len: usize,
        min_size: usize,
        mut read: impl FnMut(&mut Self) -> DecodeResult<T>,
    ) -> DecodeResult<Vec<T>> {
        self.check_remaining(len, min_size, "list")?;
        let mut items = Vec::with_capacity(len);
        for i in 0..len {
            items.push(read(self).map_err(|e| e.within(format!("reading list item {}", i)))?);
        }
        Ok(items)
    }

    fn read_byte_array(&mut self) -> DecodeResult<Vec<i8>> {
        let len = self.read_len("byte array")?;
        let bytes = self.take(len, "reading byte in byte array tag")?;
        Ok(bytes.iter().map(|b| *b as i8).collect())
    }

    fn read_int_array(&mut self) -> DecodeResult<Vec<i32>> {
        let len = self.read_len("int array")?;
        self.check_remaining(len, 4, "int array")?;
        let mut buf = vec![0i32; len];
        self.input
            .read_i32_into::<B>(&mut buf)
            .map_err(|e| DecodeError::io("reading int in int array tag", e))?;
        Ok(buf)
    }

    fn read_long_array(&mut self) -> DecodeResult<Vec<i64>> {
        let len = self.read_len("long array")?;
        self.check_remaining(len, 8, "long array")?;
        let mut buf = vec![0i64; len];
        self.input
            .read_i64_into::<B>(&mut buf)
            .map_err(|e| DecodeError::io("reading long in long array tag", e))?;
        Ok(buf)
    }

    fn read_i8(&mut self) -> DecodeResult<i8> {
        self.input
            .read_i8()
            .map_err(|e| DecodeError::io("reading byte", e))
    }

    fn read_i16(&mut self) -> DecodeResult<i16> {
        self.input
            .read_i16::<B>()
            .map_err(|e| DecodeError::io("reading short", e))
    }

    fn read_i32(&mut self) -> DecodeResult<i32> {
        self.input
            .read_i32::<B>()
            .map_err(|e| DecodeError::io("reading int", e))
    }

    fn read_i64(&mut self) -> DecodeResult<i64> {
        self.input
            .read_i64::<B>()
            .map_err(|e| DecodeError::io("reading long", e))
    }

    fn read_f32(&mut self) -> DecodeResult<f32> {
        self.input
            .read_f32::<B>()
            .map_err(|e| DecodeError::io("reading float", e))
    }

    fn read_f64(&mut self) -> DecodeResult<f64> {
        self.input
            .read_f64::<B>()
            .map_err(|e| DecodeError::io("reading double", e))
    }

    /// Read a 32-bit length prefix. The format stores it signed; a negative
    /// length is never valid.
    fn read_len(&mut self, what: &str) -> DecodeResult<usize> {
        let len = self
            .input
            .read_i32::<B>()
            .map_err(|e| DecodeError::io(format!("reading {} tag length", what), e))?;
        usize::try_from(len)
            .map_err(|_| DecodeError::invalid_length(format!("negative {} length {}", what, len)))
    }

    /// Fail early if `len` elements of `size` bytes cannot possibly be in the
    /// remaining input. Stops hostile lengths from causing huge allocations.
    fn check_remaining(&self, len: usize, size: usize, what: &str) -> DecodeResult<()> {
        match len.checked_mul(size) {
            Some(needed) if needed <= self.input.len() => Ok(()),
            _ => Err(DecodeError::invalid_length(format!(
                "{} length {} exceeds the {} bytes of remaining input",
                what,
                len,
                self.input.len()
            ))),
        }
    }

    fn take(&mut self, len: usize, stage: &str) -> DecodeResult<&'a [u8]> {
        if len > self.input.len() {
            return Err(DecodeError::io(
                stage,
                std::io::ErrorKind::UnexpectedEof.into(),
            ));
        }
        let (taken, rest) = self.input.split_at(len);
        self.input = rest;
        Ok(taken)
    }

    fn nested<T>(&mut self, read: impl FnOnce(&mut Self) -> DecodeResult<T>) -> DecodeResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(DecodeError::depth_limit());
        }
        self.depth += 1;
        let res = read(self);
        self.depth -= 1;
        res
    }
}

fn u8_to_tag(tag: u8) -> DecodeResult<Tag> {
    Tag::try_from(tag).map_err(|_| DecodeError::invalid_tag(tag))
}

pub(crate) fn tag_name(tag: Tag) -> &'static str {
    match tag {
        Tag::End => "end",
        Tag::Byte => "byte",
        Tag::Short => "short",
        Tag::Int => "int",
        Tag::Long => "long",
        Tag::Float => "float",
        Tag::Double => "double",
        Tag::ByteArray => "byte array",
        Tag::String => "string",
        Tag::List => "list",
        Tag::Compound => "compound",
        Tag::IntArray => "int array",
        Tag::LongArray => "long array",
    }
}
