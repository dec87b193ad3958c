//! Interpretation of a parsed JSON value tree as a [`Document`].
//!
//! This is where text input is validated: every number is checked against the
//! width of its tag type, every value against the shape its tag type needs.
//! Nothing is truncated or guessed at.

use std::convert::{TryFrom, TryInto};
use std::num::IntErrorKind;

use chrono::DateTime;
use serde_json::{Map, Value as Json};

use crate::error::{EncodeError, EncodeErrorKind, EncodeResult};
use crate::read::tag_name;
use crate::text::Document;
use crate::{List, NamedTag, Tag, Value};

pub(crate) fn document(root: &Json) -> EncodeResult<Document> {
    let obj = root
        .as_object()
        .ok_or_else(|| EncodeError::wrong_type("a document object", root))?;

    let conversion_time = match optional_str(obj, "conversionTime")? {
        Some(time) => Some(DateTime::parse_from_rfc3339(time).map_err(|e| {
            EncodeError::syntax(format!("conversionTime {:?} is not an RFC 3339 time", time), e)
        })?),
        None => None,
    };

    let nbt = obj
        .get("nbt")
        .ok_or_else(|| EncodeError::missing_field("nbt"))?;
    let nbt = array(nbt)
        .and_then(|tags| named_tags(tags, "top-level tag"))
        .map_err(|e| e.within("parsing nbt"))?;

    Ok(Document {
        name: optional_str(obj, "name")?.unwrap_or_default().to_owned(),
        version: optional_str(obj, "version")?.unwrap_or_default().to_owned(),
        url: optional_str(obj, "nbt2JsonUrl")?
            .unwrap_or_default()
            .to_owned(),
        conversion_time,
        comment: optional_str(obj, "comment")?.map(str::to_owned),
        nbt,
    })
}

/// Tag objects in sequence, as in `nbt` or a compound's value. Objects with
/// tagType 0 are End markers and are skipped; older documents contain them
/// at the end of compounds.
fn named_tags(items: &[Json], what: &str) -> EncodeResult<Vec<NamedTag>> {
    let mut tags = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if let Some(tag) =
            named_tag(item).map_err(|e| e.within(format!("parsing {} {}", what, i)))?
        {
            tags.push(tag);
        }
    }
    Ok(tags)
}

fn named_tag(item: &Json) -> EncodeResult<Option<NamedTag>> {
    let obj = item
        .as_object()
        .ok_or_else(|| EncodeError::wrong_type("a tag object", item))?;

    let tag = tag_type(field(obj, "tagType")?)?;
    if tag == Tag::End {
        return Ok(None);
    }

    let name = field(obj, "name")?;
    let name = name
        .as_str()
        .ok_or_else(|| EncodeError::wrong_type("a string for name", name))?;

    let value = payload(tag, obj.get("value"))
        .map_err(|e| e.within(format!("parsing {} {:?}", tag_name(tag), name)))?;

    Ok(Some(NamedTag {
        name: name.to_owned(),
        value,
    }))
}

/// The value of a tag of type `tag`, which every kind must have.
fn payload(tag: Tag, value: Option<&Json>) -> EncodeResult<Value> {
    let value = value.ok_or_else(|| EncodeError::missing_field("value"))?;

    Ok(match tag {
        Tag::End => {
            return Err(EncodeError::new(
                "end tag has no value",
                EncodeErrorKind::Other,
            ))
        }
        Tag::Byte => Value::Byte(narrow(value, "byte")?),
        Tag::Short => Value::Short(narrow(value, "short")?),
        Tag::Int => Value::Int(narrow(value, "int")?),
        Tag::Long => Value::Long(long(value)?),
        Tag::Float => Value::Float(float32(value)?),
        Tag::Double => Value::Double(float(value)?),
        Tag::ByteArray => Value::ByteArray(numbers(value, "byte array", |v| narrow(v, "byte"))?),
        Tag::String => Value::String(string(value)?.to_owned()),
        Tag::List => Value::List(list(value)?),
        Tag::Compound => Value::Compound(compound(value)?),
        Tag::IntArray => Value::IntArray(numbers(value, "int array", |v| narrow(v, "int"))?),
        Tag::LongArray => Value::LongArray(numbers(value, "long array", long)?),
    })
}

fn compound(value: &Json) -> EncodeResult<Vec<NamedTag>> {
    match value {
        Json::Null => Ok(vec![]),
        Json::Array(items) => named_tags(items, "compound entry"),
        other => Err(EncodeError::wrong_type("an array of tags for compound", other)),
    }
}

/// A list value: `{"tagListType": 3, "list": [1, 2, 3]}`. A null or absent
/// `list` is an empty list.
fn list(value: &Json) -> EncodeResult<List> {
    let obj = value.as_object().ok_or_else(|| {
        EncodeError::wrong_type("an object with tagListType and list", value)
    })?;
    let element = tag_type(field(obj, "tagListType")?)?;

    let items: &[Json] = match obj.get("list") {
        None | Some(Json::Null) => &[],
        Some(Json::Array(items)) => items,
        Some(other) => return Err(EncodeError::wrong_type("an array for list", other)),
    };

    list_items(element, items)
        .map_err(|e| e.within(format!("parsing tag list of type {}", u8::from(element))))
}

fn list_items(element: Tag, items: &[Json]) -> EncodeResult<List> {
    Ok(match element {
        Tag::End if items.is_empty() => List::End,
        Tag::End => {
            return Err(EncodeError::new(
                format!("list of end tags has {} items", items.len()),
                EncodeErrorKind::WrongType,
            ))
        }
        Tag::Byte => List::Byte(each(items, |v| narrow(v, "byte"))?),
        Tag::Short => List::Short(each(items, |v| narrow(v, "short"))?),
        Tag::Int => List::Int(each(items, |v| narrow(v, "int"))?),
        Tag::Long => List::Long(each(items, long)?),
        Tag::Float => List::Float(each(items, float32)?),
        Tag::Double => List::Double(each(items, float)?),
        Tag::ByteArray => List::ByteArray(each(items, |v| {
            numbers(v, "byte array", |v| narrow(v, "byte"))
        })?),
        Tag::String => List::String(each(items, |v| string(v).map(str::to_owned))?),
        Tag::List => List::List(each(items, list)?),
        Tag::Compound => List::Compound(each(items, compound)?),
        Tag::IntArray => List::IntArray(each(items, |v| {
            numbers(v, "int array", |v| narrow(v, "int"))
        })?),
        Tag::LongArray => List::LongArray(each(items, |v| numbers(v, "long array", long))?),
    })
}

fn each<T>(items: &[Json], f: impl Fn(&Json) -> EncodeResult<T>) -> EncodeResult<Vec<T>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| f(item).map_err(|e| e.within(format!("parsing list item {}", i))))
        .collect()
}

/// An array of numbers, as in a byte, int or long array tag.
fn numbers<T>(
    value: &Json,
    what: &str,
    f: impl Fn(&Json) -> EncodeResult<T>,
) -> EncodeResult<Vec<T>> {
    let items = match value {
        Json::Null => return Ok(vec![]),
        Json::Array(items) => items,
        other => return Err(EncodeError::wrong_type(&format!("an array for {}", what), other)),
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            f(item).map_err(|e| e.within(format!("parsing element {} of {}", i, what)))
        })
        .collect()
}

fn field<'a>(obj: &'a Map<String, Json>, name: &str) -> EncodeResult<&'a Json> {
    obj.get(name).ok_or_else(|| EncodeError::missing_field(name))
}

fn optional_str<'a>(obj: &'a Map<String, Json>, name: &str) -> EncodeResult<Option<&'a str>> {
    match obj.get(name) {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(EncodeError::wrong_type(&format!("a string for {}", name), other)),
    }
}

fn array(value: &Json) -> EncodeResult<&[Json]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| EncodeError::wrong_type("an array", value))
}

fn string(value: &Json) -> EncodeResult<&str> {
    value
        .as_str()
        .ok_or_else(|| EncodeError::wrong_type("a string", value))
}

fn tag_type(value: &Json) -> EncodeResult<Tag> {
    let n = integer(value, "tag type")?;
    u8::try_from(n)
        .ok()
        .and_then(|n| Tag::try_from(n).ok())
        .ok_or_else(|| EncodeError::invalid_tag(n))
}

/// 2^127, the first float beyond the range of i128.
const I128_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Any integral JSON number. Integers written with a zero fraction, like
/// `127.0`, are accepted since some tools write every number that way.
/// Errors show the number as written, since a float far out of range has no
/// meaningful integer value.
fn integer(value: &Json, what: &str) -> EncodeResult<i128> {
    let n = match value {
        Json::Number(n) => n,
        other => return Err(EncodeError::wrong_type("an integer", other)),
    };

    if let Some(i) = n.as_i64() {
        Ok(i as i128)
    } else if let Some(u) = n.as_u64() {
        Ok(u as i128)
    } else {
        match n.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 => {
                if (-I128_LIMIT..I128_LIMIT).contains(&f) {
                    Ok(f as i128)
                } else {
                    Err(EncodeError::out_of_range(what, value))
                }
            }
            _ => Err(EncodeError::wrong_type("an integer", value)),
        }
    }
}

/// An integer that must fit in `T`.
fn narrow<T: TryFrom<i128>>(value: &Json, what: &str) -> EncodeResult<T> {
    let n = integer(value, what)?;
    n.try_into()
        .map_err(|_| EncodeError::out_of_range(what, value))
}

/// A Long in any of its text forms: a number, a decimal string, or the
/// `valueLeast`/`valueMost` halves.
fn long(value: &Json) -> EncodeResult<i64> {
    match value {
        Json::Number(_) => narrow(value, "long"),
        Json::String(s) => s.trim().parse::<i64>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                EncodeError::out_of_range("long", s)
            }
            _ => EncodeError::wrong_type("a decimal integer string for long", value),
        }),
        Json::Object(obj) => {
            let least = half(obj, "valueLeast")?;
            let most = half(obj, "valueMost")?;
            Ok((((most as u64) << 32) | least as u64) as i64)
        }
        other => Err(EncodeError::wrong_type(
            "a string or valueLeast/valueMost object for long",
            other,
        )),
    }
}

/// One 32-bit half of a Long. Written unsigned, but a signed value is taken
/// as its two's complement bits, which older documents contain.
fn half(obj: &Map<String, Json>, name: &str) -> EncodeResult<u32> {
    let value = field(obj, name)?;
    let n = integer(value, name)?;
    if n < 0 {
        i32::try_from(n)
            .map(|n| n as u32)
            .map_err(|_| EncodeError::out_of_range(name, value))
    } else {
        u32::try_from(n).map_err(|_| EncodeError::out_of_range(name, value))
    }
}

/// A double, or one of the strings standing in for NaN and the infinities.
fn float(value: &Json) -> EncodeResult<f64> {
    match value {
        Json::Number(n) => n
            .as_f64()
            .ok_or_else(|| EncodeError::wrong_type("a number", value)),
        Json::String(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            _ => Err(EncodeError::wrong_type("a number or \"NaN\"", value)),
        },
        other => Err(EncodeError::wrong_type("a number", other)),
    }
}

/// A float must survive narrowing to 32 bits: finite input that becomes
/// infinite is out of range. Values between `f32::MAX` and the point where
/// rounding overflows round to `f32::MAX` as IEEE-754 says.
fn float32(value: &Json) -> EncodeResult<f32> {
    let f = float(value)?;
    let narrowed = f as f32;
    if f.is_finite() && narrowed.is_infinite() {
        return Err(EncodeError::out_of_range("float", f));
    }
    Ok(narrowed)
}
