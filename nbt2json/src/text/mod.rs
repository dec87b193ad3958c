//! The text side of the conversion: the [`Document`] envelope and its JSON and
//! YAML forms.
//!
//! YAML is not a separate format here. A YAML document is read into the same
//! JSON value tree as a JSON document before being interpreted, and written
//! from the same `Serialize` implementation, so everything said about JSON
//! holds for YAML too.

mod de;
mod ser;

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use log::debug;

use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
use crate::{read, write, Endian, NamedTag};

use self::ser::DocumentSer;

/// The document's `name` when produced by this crate.
pub const NAME: &str = "Named Binary Tag to JSON";

/// The document's `version` when produced by this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The document's `nbt2JsonUrl` when produced by this crate.
pub const URL: &str = "https://github.com/midnightfreddie/nbt2json";

/// How Long values (and the elements of long arrays and lists of longs) are
/// written to text. JSON numbers are doubles in most parsers, which cannot
/// hold every 64-bit integer, so neither form is a plain number.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub enum LongFormat {
    /// `{"valueLeast": 4294967295, "valueMost": 2147483647}`, the low and high
    /// 32 bits as unsigned integers.
    #[default]
    Halves,
    /// `"9223372036854775807"`, a decimal string.
    String,
}

/// A complete text document: the envelope fields and the top-level tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub version: String,
    pub url: String,
    pub conversion_time: Option<DateTime<FixedOffset>>,
    pub comment: Option<String>,
    pub nbt: Vec<NamedTag>,
}

impl Document {
    /// A document holding `nbt`, stamped with this crate's name, version and
    /// the current time.
    pub fn new(nbt: Vec<NamedTag>) -> Self {
        let now = Local::now();
        Self {
            name: NAME.to_owned(),
            version: VERSION.to_owned(),
            url: URL.to_owned(),
            conversion_time: Some(now.with_timezone(now.offset())),
            comment: None,
            nbt,
        }
    }

    /// Set the comment. An empty comment is the same as none.
    pub fn with_comment(mut self, comment: Option<&str>) -> Self {
        self.comment = comment.filter(|c| !c.is_empty()).map(str::to_owned);
        self
    }

    /// Decode uncompressed NBT into a new document.
    pub fn from_nbt(nbt: &[u8], endian: Endian, comment: Option<&str>) -> DecodeResult<Self> {
        let tags = read::decode(nbt, endian)?;
        Ok(Self::new(tags).with_comment(comment))
    }

    /// Encode the document's tags as uncompressed NBT. The envelope fields
    /// have no binary form and are dropped.
    pub fn to_nbt(&self, endian: Endian) -> EncodeResult<Vec<u8>> {
        write::encode(&self.nbt, endian)
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> EncodeResult<Self> {
        let root: serde_json::Value =
            serde_json::from_str(json).map_err(|e| EncodeError::syntax("parsing JSON", e))?;
        let doc = de::document(&root)?;
        debug!("parsed JSON document with {} top-level tags", doc.nbt.len());
        Ok(doc)
    }

    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> EncodeResult<Self> {
        let root: serde_json::Value =
            serde_yaml::from_str(yaml).map_err(|e| EncodeError::syntax("parsing YAML", e))?;
        let doc = de::document(&root)?;
        debug!("parsed YAML document with {} top-level tags", doc.nbt.len());
        Ok(doc)
    }

    /// Write the document as JSON, indented by two spaces.
    pub fn to_json(&self, long_format: LongFormat) -> DecodeResult<String> {
        serde_json::to_string_pretty(&DocumentSer::new(self, long_format))
            .map_err(|e| DecodeError::other("converting to JSON", e))
    }

    /// Write the document as YAML.
    pub fn to_yaml(&self, long_format: LongFormat) -> DecodeResult<String> {
        serde_yaml::to_string(&DocumentSer::new(self, long_format))
            .map_err(|e| DecodeError::other("converting to YAML", e))
    }

    fn conversion_time_string(&self) -> Option<String> {
        self.conversion_time
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, false))
    }
}
