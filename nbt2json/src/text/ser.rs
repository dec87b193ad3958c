use serde::ser::{Error, Serialize, SerializeStruct, Serializer};

use crate::text::{Document, LongFormat};
use crate::{List, NamedTag, Value, MAX_DEPTH};

/// Serializes a [`Document`] with a chosen [`LongFormat`]. The format is a
/// parameter of the conversion rather than of the tree, so the tree itself
/// does not implement `Serialize`.
pub(crate) struct DocumentSer<'a> {
    doc: &'a Document,
    long_format: LongFormat,
}

impl<'a> DocumentSer<'a> {
    pub(crate) fn new(doc: &'a Document, long_format: LongFormat) -> Self {
        Self { doc, long_format }
    }
}

/// What every wrapper below needs to know: the long format, and how deep in
/// compounds and lists it is.
#[derive(Clone, Copy)]
struct Ctx {
    long_format: LongFormat,
    depth: usize,
}

impl Ctx {
    fn nested<E: Error>(self) -> Result<Ctx, E> {
        if self.depth >= MAX_DEPTH {
            return Err(E::custom(format!("nesting deeper than {} levels", MAX_DEPTH)));
        }
        Ok(Ctx {
            depth: self.depth + 1,
            ..self
        })
    }
}

impl Serialize for DocumentSer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let doc = self.doc;
        let time = doc.conversion_time_string();
        let comment = doc.comment.as_deref().filter(|c| !c.is_empty());

        let len = 4 + time.is_some() as usize + comment.is_some() as usize;
        let mut s = serializer.serialize_struct("Document", len)?;
        s.serialize_field("name", &doc.name)?;
        s.serialize_field("version", &doc.version)?;
        s.serialize_field("nbt2JsonUrl", &doc.url)?;
        match &time {
            Some(time) => s.serialize_field("conversionTime", time)?,
            None => s.skip_field("conversionTime")?,
        }
        match comment {
            Some(comment) => s.serialize_field("comment", comment)?,
            None => s.skip_field("comment")?,
        }
        let ctx = Ctx {
            long_format: self.long_format,
            depth: 0,
        };
        s.serialize_field("nbt", &Tags(&doc.nbt, ctx))?;
        s.end()
    }
}

/// A sequence of tag objects, as found in `nbt` and in compound values.
struct Tags<'a>(&'a [NamedTag], Ctx);

impl Serialize for Tags<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ctx = self.1;
        serializer.collect_seq(self.0.iter().map(|tag| TagSer(tag, ctx)))
    }
}

struct TagSer<'a>(&'a NamedTag, Ctx);

impl Serialize for TagSer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Tag", 3)?;
        s.serialize_field("tagType", &u8::from(self.0.tag()))?;
        s.serialize_field("name", &self.0.name)?;
        s.serialize_field("value", &ValueSer(&self.0.value, self.1))?;
        s.end()
    }
}

struct ValueSer<'a>(&'a Value, Ctx);

impl Serialize for ValueSer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ctx = self.1;
        let fmt = ctx.long_format;
        match self.0 {
            Value::Byte(v) => serializer.serialize_i8(*v),
            Value::Short(v) => serializer.serialize_i16(*v),
            Value::Int(v) => serializer.serialize_i32(*v),
            Value::Long(v) => Long(*v, fmt).serialize(serializer),
            Value::Float(v) => Float(*v).serialize(serializer),
            Value::Double(v) => Double(*v).serialize(serializer),
            Value::ByteArray(v) => serializer.collect_seq(v),
            Value::String(v) => serializer.serialize_str(v),
            Value::List(v) => ListSer(v, ctx.nested()?).serialize(serializer),
            Value::Compound(v) => Tags(v, ctx.nested()?).serialize(serializer),
            Value::IntArray(v) => serializer.collect_seq(v),
            Value::LongArray(v) => LongArray(v, fmt).serialize(serializer),
        }
    }
}

struct ListSer<'a>(&'a List, Ctx);

impl Serialize for ListSer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("TagList", 2)?;
        s.serialize_field("tagListType", &u8::from(self.0.element_tag()))?;
        s.serialize_field("list", &ListItems(self.0, self.1))?;
        s.end()
    }
}

/// The bare payloads of a list. Empty lists are written as null.
struct ListItems<'a>(&'a List, Ctx);

impl Serialize for ListItems<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ctx = self.1;
        let fmt = ctx.long_format;
        if self.0.is_empty() {
            return serializer.serialize_none();
        }

        match self.0 {
            List::End => serializer.serialize_none(),
            List::Byte(v) => serializer.collect_seq(v),
            List::Short(v) => serializer.collect_seq(v),
            List::Int(v) => serializer.collect_seq(v),
            List::Long(v) => serializer.collect_seq(v.iter().map(|l| Long(*l, fmt))),
            List::Float(v) => serializer.collect_seq(v.iter().map(|f| Float(*f))),
            List::Double(v) => serializer.collect_seq(v.iter().map(|f| Double(*f))),
            List::ByteArray(v) => serializer.collect_seq(v),
            List::String(v) => serializer.collect_seq(v),
            List::List(v) => {
                let inner = ctx.nested()?;
                serializer.collect_seq(v.iter().map(|l| ListSer(l, inner)))
            }
            List::Compound(v) => {
                let inner = ctx.nested()?;
                serializer.collect_seq(v.iter().map(|c| Tags(c, inner)))
            }
            List::IntArray(v) => serializer.collect_seq(v),
            List::LongArray(v) => serializer.collect_seq(v.iter().map(|a| LongArray(a, fmt))),
        }
    }
}

struct LongArray<'a>(&'a [i64], LongFormat);

impl Serialize for LongArray<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fmt = self.1;
        serializer.collect_seq(self.0.iter().map(|l| Long(*l, fmt)))
    }
}

struct Long(i64, LongFormat);

impl Serialize for Long {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.1 {
            LongFormat::String => serializer.collect_str(&self.0),
            LongFormat::Halves => {
                let mut s = serializer.serialize_struct("Long", 2)?;
                s.serialize_field("valueLeast", &(self.0 as u32))?;
                s.serialize_field("valueMost", &((self.0 >> 32) as u32))?;
                s.end()
            }
        }
    }
}

struct Float(f32);

impl Serialize for Float {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match float_sentinel(self.0 as f64) {
            Some(sentinel) => serializer.serialize_str(sentinel),
            None => serializer.serialize_f32(self.0),
        }
    }
}

struct Double(f64);

impl Serialize for Double {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match float_sentinel(self.0) {
            Some(sentinel) => serializer.serialize_str(sentinel),
            None => serializer.serialize_f64(self.0),
        }
    }
}

/// JSON has no NaN or infinity, these strings stand in for them.
fn float_sentinel(f: f64) -> Option<&'static str> {
    if f.is_nan() {
        Some("NaN")
    } else if f == f64::INFINITY {
        Some("Infinity")
    } else if f == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}
