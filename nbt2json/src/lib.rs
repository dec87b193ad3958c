//! nbt2json converts NBT data, the binary format used by *Minecraft* to store
//! worlds, player data and more, to and from a JSON or YAML document without
//! losing any information. Java Edition (big-endian) and Bedrock Edition
//! (little-endian) data are both supported.
//!
//! * For the tag tree itself see [`NamedTag`], [`Value`] and [`List`].
//! * For the binary side see [`read::decode`] and [`write::encode`].
//! * For the text document see [`Document`].
//!
//! ```toml
//! [dependencies]
//! nbt2json = "0.4"
//! ```
//!
//! # The document
//!
//! Every tag becomes an object with a `tagType`, a `name` and a `value`.
//! Compounds hold an array of such objects, lists hold a `tagListType` and a
//! `list` of bare values:
//!
//! ```json
//! {
//!   "name": "Named Binary Tag to JSON",
//!   "version": "0.4.0",
//!   "nbt2JsonUrl": "https://github.com/midnightfreddie/nbt2json",
//!   "conversionTime": "2021-06-01T12:00:00+00:00",
//!   "nbt": [
//!     {
//!       "tagType": 10,
//!       "name": "",
//!       "value": [
//!         { "tagType": 3, "name": "DataVersion", "value": 2730 },
//!         { "tagType": 9, "name": "Pos", "value": { "tagListType": 6, "list": [0.5, 64.0, 0.5] } }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! JSON numbers cannot hold every 64-bit integer, so Long values are written
//! either as a pair of unsigned 32-bit halves (`{"valueLeast": .., "valueMost":
//! ..}`) or as a decimal string, depending on [`LongFormat`]. Both are accepted
//! when reading a document back. NaN and infinite floats are written as the
//! strings `"NaN"`, `"Infinity"` and `"-Infinity"`.
//!
//! # Quick example
//!
//! ```
//! use nbt2json::{json_to_nbt, nbt_to_json, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::java();
//! let json = r#"{"nbt": [{"tagType": 1, "name": "hello", "value": 42}]}"#;
//!
//! let nbt = json_to_nbt(json, &config)?;
//! assert_eq!(nbt, [1, 0, 5, b'h', b'e', b'l', b'l', b'o', 42]);
//!
//! let back = nbt_to_json(&nbt, &config, Some("round trip"))?;
//! assert!(back.contains("\"comment\": \"round trip\""));
//! # Ok(())
//! # }
//! ```
//!
//! The codec works on complete, uncompressed buffers. Gzip and any file
//! header are the caller's business; the `nbt2json` command line tool in this
//! repository takes care of both.

pub mod error;
pub mod read;
pub mod text;
pub mod write;

mod value;

pub use error::{DecodeError, EncodeError};
pub use text::{Document, LongFormat};
pub use value::*;

#[cfg(test)]
mod test;

use std::convert::TryFrom;

/// Maximum nesting of compounds and lists accepted by the reader, the writer
/// and the text serializer.
///
/// A tree this deep takes at most `2 * MAX_DEPTH + 6` levels of JSON or YAML
/// nesting, which keeps it under the 128 level recursion limit of
/// `serde_json` and `serde_yaml`. Anything that decodes from NBT can therefore
/// be parsed back from its text. It also keeps the recursive reader well
/// inside a 2 MiB thread stack in debug builds.
pub const MAX_DEPTH: usize = 60;

/// An NBT tag type. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "arbitrary1", derive(arbitrary::Arbitrary))]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all elements share one type.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

// Crates exist to generate this code for us, but would add to our compile
// times, so we instead right it out manually, the tags will very rarely change
// so isn't a massive burden, but saves a significant amount of compile time.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::End => 0,
            Tag::Byte => 1,
            Tag::Short => 2,
            Tag::Int => 3,
            Tag::Long => 4,
            Tag::Float => 5,
            Tag::Double => 6,
            Tag::ByteArray => 7,
            Tag::String => 8,
            Tag::List => 9,
            Tag::Compound => 10,
            Tag::IntArray => 11,
            Tag::LongArray => 12,
        }
    }
}

/// Byte order of every multi-byte number in an NBT buffer. It also picks the
/// string encoding: Java Edition writes strings in Java's modified UTF-8,
/// where NUL is two bytes and characters outside the BMP are surrogate pairs,
/// while Bedrock Edition writes plain UTF-8.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Endian {
    /// Used by *Minecraft: Java Edition* and most other NBT tools.
    Big,
    /// Used by *Minecraft: Bedrock Edition*.
    #[default]
    Little,
}

impl Endian {
    pub const JAVA: Endian = Endian::Big;
    pub const BEDROCK: Endian = Endian::Little;

    pub(crate) fn modified_utf8(self) -> bool {
        self == Endian::Big
    }
}

/// Settings for one conversion. Passed explicitly to every entry point, so
/// conversions with different settings can run side by side.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Config {
    /// Byte order of the NBT side.
    pub endian: Endian,
    /// How Long values are written to text. Reading accepts every form.
    pub long_format: LongFormat,
}

impl Config {
    /// Big-endian, for Java Edition data.
    pub fn java() -> Self {
        Self::default().with_endian(Endian::JAVA)
    }

    /// Little-endian, for Bedrock Edition data.
    pub fn bedrock() -> Self {
        Self::default().with_endian(Endian::BEDROCK)
    }

    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn with_long_format(mut self, long_format: LongFormat) -> Self {
        self.long_format = long_format;
        self
    }
}

/// Convert uncompressed NBT data to a pretty-printed JSON document.
pub fn nbt_to_json(
    nbt: &[u8],
    config: &Config,
    comment: Option<&str>,
) -> Result<String, DecodeError> {
    Document::from_nbt(nbt, config.endian, comment)?.to_json(config.long_format)
}

/// Convert uncompressed NBT data to a YAML document.
pub fn nbt_to_yaml(
    nbt: &[u8],
    config: &Config,
    comment: Option<&str>,
) -> Result<String, DecodeError> {
    Document::from_nbt(nbt, config.endian, comment)?.to_yaml(config.long_format)
}

/// Convert a JSON document to uncompressed NBT data.
pub fn json_to_nbt(json: &str, config: &Config) -> Result<Vec<u8>, EncodeError> {
    Document::from_json(json)?.to_nbt(config.endian)
}

/// Convert a YAML document to uncompressed NBT data.
pub fn yaml_to_nbt(yaml: &str, config: &Config) -> Result<Vec<u8>, EncodeError> {
    Document::from_yaml(yaml)?.to_nbt(config.endian)
}
