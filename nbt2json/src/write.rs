//! Encoding of [`NamedTag`]s into binary NBT.
//!
//! Writing mirrors [`read`][crate::read] exactly: each tag is its type byte,
//! its name and its payload; compounds end with a single End byte; list
//! elements are bare payloads after the element type and count. The values
//! themselves are already typed, so the only things that can go wrong are
//! lengths that don't fit their prefix, nesting that is too deep, and the
//! output failing.
//!
//! ```
//! use nbt2json::{write::encode, Endian, NamedTag};
//!
//! let bytes = encode(&[NamedTag::new("", 127i8)], Endian::Little).unwrap();
//! assert_eq!(bytes, [1, 0, 0, 0x7f]);
//! ```

use std::convert::TryInto;
use std::io::Write;
use std::marker::PhantomData;

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use log::{debug, trace};

use crate::error::{EncodeError, EncodeResult};
use crate::read::tag_name;
use crate::{Endian, List, NamedTag, Tag, Value, MAX_DEPTH};

/// Encode `tags` one after the other into a new buffer.
pub fn encode(tags: &[NamedTag], endian: Endian) -> EncodeResult<Vec<u8>> {
    let mut out = vec![];
    encode_into(&mut out, tags, endian)?;
    debug!("encoded {} top-level tags into {} bytes", tags.len(), out.len());
    Ok(out)
}

/// Encode `tags` one after the other into `writer`.
pub fn encode_into<W: Write>(writer: W, tags: &[NamedTag], endian: Endian) -> EncodeResult<()> {
    match endian {
        Endian::Big => Writer::<W, BigEndian>::new(writer, endian).write_all_tags(tags),
        Endian::Little => Writer::<W, LittleEndian>::new(writer, endian).write_all_tags(tags),
    }
}

pub(crate) trait WriteNbt: Write {
    fn write_tag(&mut self, tag: Tag) -> EncodeResult<()> {
        self.write_u8(tag as u8)
            .map_err(|e| EncodeError::io("writing tag type", e))
    }

    /// Write already encoded string data after its u16 length.
    fn write_size_prefixed_bytes<B: ByteOrder>(&mut self, bytes: &[u8], what: &str) -> EncodeResult<()> {
        let len: u16 = bytes
            .len()
            .try_into()
            .map_err(|_| EncodeError::length_overflow(what, bytes.len()))?;
        self.write_u16::<B>(len)
            .and_then(|_| self.write_all(bytes))
            .map_err(|e| EncodeError::io(format!("writing {}", what), e))
    }

    fn write_len<B: ByteOrder>(&mut self, len: usize, what: &str) -> EncodeResult<()> {
        let len: i32 = len
            .try_into()
            .map_err(|_| EncodeError::length_overflow(what, len))?;
        self.write_i32::<B>(len)
            .map_err(|e| EncodeError::io(format!("writing {} length", what), e))
    }
}

impl<T> WriteNbt for T where T: Write {}

struct Writer<W: Write, B: ByteOrder> {
    writer: W,
    depth: usize,
    modified_utf8: bool,
    order: PhantomData<B>,
}

impl<W: Write, B: ByteOrder> Writer<W, B> {
    fn new(writer: W, endian: Endian) -> Self {
        Self {
            writer,
            depth: 0,
            modified_utf8: endian.modified_utf8(),
            order: PhantomData,
        }
    }

    fn write_all_tags(&mut self, tags: &[NamedTag]) -> EncodeResult<()> {
        for (i, tag) in tags.iter().enumerate() {
            self.write_named(tag)
                .map_err(|e| e.within(format!("writing top-level tag {}", i)))?;
        }
        self.writer
            .flush()
            .map_err(|e| EncodeError::io("flushing output", e))
    }

    fn write_named(&mut self, tag: &NamedTag) -> EncodeResult<()> {
        trace!("writing {:?} {:?}", tag.tag(), tag.name);
        self.writer.write_tag(tag.tag())?;
        self.write_str(&tag.name, "name")?;
        self.write_payload(&tag.value).map_err(|e| {
            e.within(format!("writing {} {:?}", tag_name(tag.tag()), tag.name))
        })
    }

    fn write_payload(&mut self, value: &Value) -> EncodeResult<()> {
        match value {
            Value::Byte(v) => self.write_i8(*v),
            Value::Short(v) => self.write_i16(*v),
            Value::Int(v) => self.write_i32(*v),
            Value::Long(v) => self.write_i64(*v),
            Value::Float(v) => self.write_f32(*v),
            Value::Double(v) => self.write_f64(*v),
            Value::ByteArray(v) => self.write_byte_array(v),
            Value::String(v) => self.write_string(v),
            Value::List(v) => self.nested(|w| w.write_list(v)),
            Value::Compound(v) => self.nested(|w| w.write_compound(v)),
            Value::IntArray(v) => self.write_int_array(v),
            Value::LongArray(v) => self.write_long_array(v),
        }
    }

    fn write_compound(&mut self, entries: &[NamedTag]) -> EncodeResult<()> {
        for entry in entries {
            self.write_named(entry)?;
        }
        self.writer.write_tag(Tag::End)
    }

    fn write_list(&mut self, list: &List) -> EncodeResult<()> {
        let element = list.element_tag();
        self.writer.write_tag(element)?;
        self.writer.write_len::<B>(list.len(), "list")?;

        let res = match list {
            List::End => Ok(()),
            List::Byte(v) => self.write_items(v, |w, b| w.write_i8(*b)),
            List::Short(v) => self.write_items(v, |w, s| w.write_i16(*s)),
            List::Int(v) => self.write_items(v, |w, i| w.write_i32(*i)),
            List::Long(v) => self.write_items(v, |w, l| w.write_i64(*l)),
            List::Float(v) => self.write_items(v, |w, f| w.write_f32(*f)),
            List::Double(v) => self.write_items(v, |w, f| w.write_f64(*f)),
            List::ByteArray(v) => self.write_items(v, |w, a| w.write_byte_array(a)),
            List::String(v) => self.write_items(v, |w, s| w.write_string(s)),
            List::List(v) => self.write_items(v, |w, l| w.nested(|w| w.write_list(l))),
            List::Compound(v) => self.write_items(v, |w, c| w.nested(|w| w.write_compound(c))),
            List::IntArray(v) => self.write_items(v, |w, a| w.write_int_array(a)),
            List::LongArray(v) => self.write_items(v, |w, a| w.write_long_array(a)),
        };
        res.map_err(|e| e.within(format!("writing tag list of type {}", u8::from(element))))
    }

    fn write_items<T>(
        &mut self,
        items: &[T],
        mut write: impl FnMut(&mut Self, &T) -> EncodeResult<()>,
    ) -> EncodeResult<()> {
        for (i, item) in items.iter().enumerate() {
            write(self, item).map_err(|e| e.within(format!("writing list item {}", i)))?;
        }
        Ok(())
    }

    fn write_string(&mut self, s: &str) -> EncodeResult<()> {
        self.write_str(s, "string payload")
    }

    // The length limit applies to the encoded bytes, which for modified
    // UTF-8 can be longer than the string.
    fn write_str(&mut self, s: &str, what: &str) -> EncodeResult<()> {
        if self.modified_utf8 {
            let bytes = cesu8::to_java_cesu8(s);
            self.writer.write_size_prefixed_bytes::<B>(&bytes, what)
        } else {
            self.writer.write_size_prefixed_bytes::<B>(s.as_bytes(), what)
        }
    }

    fn write_byte_array(&mut self, bs: &[i8]) -> EncodeResult<()> {
        self.writer.write_len::<B>(bs.len(), "byte array")?;
        let bytes: Vec<u8> = bs.iter().map(|b| *b as u8).collect();
        self.writer
            .write_all(&bytes)
            .map_err(|e| EncodeError::io("writing element of byte array", e))
    }

    fn write_int_array(&mut self, is: &[i32]) -> EncodeResult<()> {
        self.writer.write_len::<B>(is.len(), "int array")?;
        for i in is {
            self.writer
                .write_i32::<B>(*i)
                .map_err(|e| EncodeError::io("writing element of int array", e))?;
        }
        Ok(())
    }

    fn write_long_array(&mut self, ls: &[i64]) -> EncodeResult<()> {
        self.writer.write_len::<B>(ls.len(), "long array")?;
        for l in ls {
            self.writer
                .write_i64::<B>(*l)
                .map_err(|e| EncodeError::io("writing element of long array", e))?;
        }
        Ok(())
    }

    fn write_i8(&mut self, v: i8) -> EncodeResult<()> {
        self.writer
            .write_i8(v)
            .map_err(|e| EncodeError::io("writing byte payload", e))
    }

    fn write_i16(&mut self, v: i16) -> EncodeResult<()> {
        self.writer
            .write_i16::<B>(v)
            .map_err(|e| EncodeError::io("writing short payload", e))
    }

    fn write_i32(&mut self, v: i32) -> EncodeResult<()> {
        self.writer
            .write_i32::<B>(v)
            .map_err(|e| EncodeError::io("writing int payload", e))
    }

    fn write_i64(&mut self, v: i64) -> EncodeResult<()> {
        self.writer
            .write_i64::<B>(v)
            .map_err(|e| EncodeError::io("writing long payload", e))
    }

    // NaN is written with whatever bit pattern it carries.
    fn write_f32(&mut self, v: f32) -> EncodeResult<()> {
        self.writer
            .write_f32::<B>(v)
            .map_err(|e| EncodeError::io("writing float payload", e))
    }

    fn write_f64(&mut self, v: f64) -> EncodeResult<()> {
        self.writer
            .write_f64::<B>(v)
            .map_err(|e| EncodeError::io("writing double payload", e))
    }

    fn nested(&mut self, write: impl FnOnce(&mut Self) -> EncodeResult<()>) -> EncodeResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(EncodeError::depth_limit());
        }
        self.depth += 1;
        let res = write(self);
        self.depth -= 1;
        res
    }
}
