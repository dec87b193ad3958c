use crate::Tag;

/// A named NBT tag: an entry of a compound, or a top-level tag of a buffer.
///
/// End tags are never represented; they only exist in the binary framing of
/// compounds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "arbitrary1", derive(arbitrary::Arbitrary))]
pub struct NamedTag {
    pub name: String,
    pub value: Value,
}

impl NamedTag {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The type of the tag's value.
    pub fn tag(&self) -> Tag {
        self.value.tag()
    }
}

/// Value is a complete NBT value. It owns its data. Compounds and lists are
/// fully materialized, and compounds keep their entries in the order they
/// appeared in, so converting back produces the same bytes.
///
/// ```
/// # use nbt2json::{NamedTag, Value};
/// let level = Value::Compound(vec![
///     NamedTag::new("DataVersion", 2730),
///     NamedTag::new("LevelName", "world"),
/// ]);
///
/// if let Value::Compound(entries) = &level {
///     assert_eq!(entries[0].value, 2730);
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Vec<NamedTag>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// An NBT list. Every element has the same type, which this type enforces by
/// having one variant per element type. An empty list still has an element
/// type, which is preserved when converting.
#[derive(Debug, Clone, PartialEq)]
pub enum List {
    /// A list with End as its element type. Such a list is always empty; it
    /// is what the game writes for lists that never had an element.
    End,
    Byte(Vec<i8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    ByteArray(Vec<Vec<i8>>),
    String(Vec<String>),
    List(Vec<List>),
    Compound(Vec<Vec<NamedTag>>),
    IntArray(Vec<Vec<i32>>),
    LongArray(Vec<Vec<i64>>),
}

impl Value {
    /// The tag type this value is written with.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Byte(_) => Tag::Byte,
            Value::Short(_) => Tag::Short,
            Value::Int(_) => Tag::Int,
            Value::Long(_) => Tag::Long,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::ByteArray(_) => Tag::ByteArray,
            Value::String(_) => Tag::String,
            Value::List(_) => Tag::List,
            Value::Compound(_) => Tag::Compound,
            Value::IntArray(_) => Tag::IntArray,
            Value::LongArray(_) => Tag::LongArray,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            Value::Float(v) => Some(v as i64),
            Value::Double(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Byte(v) => Some(v as f64),
            Value::Short(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Look up an entry of a compound by name. Returns the first match, NBT
    /// does not forbid duplicate names.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Compound(entries) => entries.iter().find(|e| e.name == name).map(|e| &e.value),
            _ => None,
        }
    }
}

impl List {
    /// An empty list with the given element type.
    pub fn empty(element: Tag) -> Self {
        match element {
            Tag::End => List::End,
            Tag::Byte => List::Byte(vec![]),
            Tag::Short => List::Short(vec![]),
            Tag::Int => List::Int(vec![]),
            Tag::Long => List::Long(vec![]),
            Tag::Float => List::Float(vec![]),
            Tag::Double => List::Double(vec![]),
            Tag::ByteArray => List::ByteArray(vec![]),
            Tag::String => List::String(vec![]),
            Tag::List => List::List(vec![]),
            Tag::Compound => List::Compound(vec![]),
            Tag::IntArray => List::IntArray(vec![]),
            Tag::LongArray => List::LongArray(vec![]),
        }
    }

    /// The type shared by every element.
    pub fn element_tag(&self) -> Tag {
        match self {
            List::End => Tag::End,
            List::Byte(_) => Tag::Byte,
            List::Short(_) => Tag::Short,
            List::Int(_) => Tag::Int,
            List::Long(_) => Tag::Long,
            List::Float(_) => Tag::Float,
            List::Double(_) => Tag::Double,
            List::ByteArray(_) => Tag::ByteArray,
            List::String(_) => Tag::String,
            List::List(_) => Tag::List,
            List::Compound(_) => Tag::Compound,
            List::IntArray(_) => Tag::IntArray,
            List::LongArray(_) => Tag::LongArray,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            List::End => 0,
            List::Byte(v) => v.len(),
            List::Short(v) => v.len(),
            List::Int(v) => v.len(),
            List::Long(v) => v.len(),
            List::Float(v) => v.len(),
            List::Double(v) => v.len(),
            List::ByteArray(v) => v.len(),
            List::String(v) => v.len(),
            List::List(v) => v.len(),
            List::Compound(v) => v.len(),
            List::IntArray(v) => v.len(),
            List::LongArray(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
        impl From<&$type> for Value {
            fn from(val: &$type) -> Self {
                Self::$variant(val.to_owned()$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(u8, Byte, as i8);
from!(i16, Short);
from!(u16, Short, as i16);
from!(i32, Int);
from!(u32, Int, as i32);
from!(i64, Long);
from!(u64, Long, as i64);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(List, List);

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}

impl From<Vec<NamedTag>> for Value {
    fn from(val: Vec<NamedTag>) -> Self {
        Self::Compound(val)
    }
}

// Partial eq against plain numbers and strings, as serde_json does for its
// Value, to keep tests and lookups terse.

fn eq_i64(value: &Value, other: i64) -> bool {
    value.as_i64().map_or(false, |i| i == other)
}

fn eq_f64(value: &Value, other: f64) -> bool {
    value.as_f64().map_or(false, |i| i == other)
}

fn eq_str(value: &Value, other: &str) -> bool {
    value.as_str().map_or(false, |i| i == other)
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        eq_str(self, other)
    }
}

impl<'a> PartialEq<&'a str> for Value {
    fn eq(&self, other: &&str) -> bool {
        eq_str(self, other)
    }
}

macro_rules! partialeq_numeric {
    ($($eq:ident [$($ty:ty)*])*) => {
        $($(
            impl PartialEq<$ty> for Value {
                fn eq(&self, other: &$ty) -> bool {
                    $eq(self, *other as _)
                }
            }

            impl PartialEq<Value> for $ty {
                fn eq(&self, other: &Value) -> bool {
                    $eq(other, *self as _)
                }
            }
        )*)*
    }
}

partialeq_numeric! {
    eq_i64[i8 i16 i32 i64]
    eq_f64[f32 f64]
}

#[cfg(feature = "arbitrary1")]
fn arb_vec<'a, T>(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Vec<T>>
where
    T: arbitrary::Arbitrary<'a>,
{
    u.arbitrary_iter::<T>()?.collect()
}

#[cfg(feature = "arbitrary1")]
impl<'a> arbitrary::Arbitrary<'a> for List {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(match u.arbitrary::<Tag>()? {
            Tag::End => List::End,
            Tag::Byte => List::Byte(arb_vec(u)?),
            Tag::Short => List::Short(arb_vec(u)?),
            Tag::Int => List::Int(arb_vec(u)?),
            Tag::Long => List::Long(arb_vec(u)?),
            Tag::Float => List::Float(arb_vec(u)?),
            Tag::Double => List::Double(arb_vec(u)?),
            Tag::ByteArray => List::ByteArray(arb_vec(u)?),
            Tag::String => List::String(arb_vec(u)?),
            Tag::List => List::List(arb_vec(u)?),
            Tag::Compound => List::Compound(arb_vec(u)?),
            Tag::IntArray => List::IntArray(arb_vec(u)?),
            Tag::LongArray => List::LongArray(arb_vec(u)?),
        })
    }
}

#[cfg(feature = "arbitrary1")]
impl<'a> arbitrary::Arbitrary<'a> for Value {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        use Value::*;

        Ok(match u.arbitrary::<Tag>()? {
            Tag::End => return Err(arbitrary::Error::IncorrectFormat),
            Tag::Byte => Byte(u.arbitrary()?),
            Tag::Short => Short(u.arbitrary()?),
            Tag::Int => Int(u.arbitrary()?),
            Tag::Long => Long(u.arbitrary()?),
            Tag::Float => Float(u.arbitrary()?),
            Tag::Double => Double(u.arbitrary()?),
            Tag::ByteArray => ByteArray(u.arbitrary()?),
            Tag::String => String(u.arbitrary()?),
            Tag::List => List(u.arbitrary()?),
            Tag::Compound => Compound(u.arbitrary()?),
            Tag::IntArray => IntArray(u.arbitrary()?),
            Tag::LongArray => LongArray(u.arbitrary()?),
        })
    }
}
