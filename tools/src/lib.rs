//! Plumbing for the `nbt2json` command: reading input, gzip, header skipping
//! and writing output. The conversion itself is [`nbt2json`]'s.

use std::error::Error;
use std::fmt::Display;
use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, info};
use nbt2json::{Config, Endian, LongFormat};

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

#[derive(Debug)]
pub struct ErrorMessage(pub String);
impl std::error::Error for ErrorMessage {}

impl Display for ErrorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the command line decides about a conversion.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Text to NBT rather than NBT to text.
    pub reverse: bool,
    pub yaml: bool,
    pub gzip: bool,
    pub comment: Option<String>,
    pub skip: usize,
    pub config: Config,
}

impl Options {
    pub fn big_endian(mut self, big: bool) -> Self {
        self.config.endian = if big { Endian::Big } else { Endian::Little };
        self
    }

    pub fn long_as_string(mut self, string: bool) -> Self {
        self.config.long_format = if string {
            LongFormat::String
        } else {
            LongFormat::Halves
        };
        self
    }
}

/// Pick the input and output paths. `--nbt-file` and `--json-file` name a side
/// of the conversion rather than a direction, so which of them is read depends
/// on `reverse`. Either one wins over `--in` or `--out`.
pub fn io_paths<'a>(
    reverse: bool,
    nbt_file: Option<&'a str>,
    text_file: Option<&'a str>,
    input: &'a str,
    output: &'a str,
) -> (&'a str, &'a str) {
    if reverse {
        (text_file.unwrap_or(input), nbt_file.unwrap_or(output))
    } else {
        (nbt_file.unwrap_or(input), text_file.unwrap_or(output))
    }
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Decompress `data` if it starts with the gzip magic, otherwise return it
/// as it is.
pub fn gunzip_if_needed(data: Vec<u8>) -> Result<Vec<u8>> {
    if !is_gzip(&data) {
        return Ok(data);
    }

    let mut out = vec![];
    GzDecoder::new(data.as_slice()).read_to_end(&mut out)?;
    debug!("decompressed {} bytes to {}", data.len(), out.len());
    Ok(out)
}

pub fn gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(vec![], Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Drop a leading header, such as the 8 bytes in front of a Bedrock
/// `level.dat`.
pub fn skip(data: &[u8], n: usize) -> Result<&[u8]> {
    data.get(n..).ok_or_else(|| {
        ErrorMessage(format!(
            "cannot skip {} bytes of input only {} bytes long",
            n,
            data.len()
        ))
        .into()
    })
}

/// Run one conversion over in-memory data.
pub fn convert(input: Vec<u8>, opts: &Options) -> Result<Vec<u8>> {
    let output = if opts.reverse {
        let text = String::from_utf8(input)?;
        if opts.yaml {
            nbt2json::yaml_to_nbt(&text, &opts.config)?
        } else {
            nbt2json::json_to_nbt(&text, &opts.config)?
        }
    } else {
        let nbt = gunzip_if_needed(input)?;
        let nbt = skip(&nbt, opts.skip)?;
        let comment = opts.comment.as_deref();
        let mut text = if opts.yaml {
            nbt2json::nbt_to_yaml(nbt, &opts.config, comment)?
        } else {
            nbt2json::nbt_to_json(nbt, &opts.config, comment)?
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text.into_bytes()
    };

    if opts.gzip {
        gzip(&output)
    } else {
        Ok(output)
    }
}

/// Read all of `path`, with `-` meaning stdin.
pub fn read_input(path: &str) -> Result<Vec<u8>> {
    let mut buf = vec![];
    if path == "-" {
        std::io::stdin().lock().read_to_end(&mut buf)?;
    } else {
        buf = std::fs::read(path)?;
    }
    info!("read {} bytes from {}", buf.len(), display_path(path));
    Ok(buf)
}

/// Write `data` to `path`, with `-` meaning stdout.
pub fn write_output(path: &str, data: &[u8]) -> Result<()> {
    if path == "-" {
        let stdout = std::io::stdout();
        let mut stdout = stdout.lock();
        stdout.write_all(data)?;
        stdout.flush()?;
    } else {
        std::fs::write(path, data)?;
    }
    info!("wrote {} bytes to {}", data.len(), display_path(path));
    Ok(())
}

fn display_path(path: &str) -> &str {
    if path == "-" {
        "standard stream"
    } else {
        path
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // A single little-endian Byte tag named "a" holding 1.
    const NBT: [u8; 5] = [1, 1, 0, b'a', 1];

    #[test]
    fn gzip_detection() {
        assert!(is_gzip(&[0x1f, 0x8b, 8]));
        assert!(!is_gzip(&[0x1f]));
        assert!(!is_gzip(&NBT));
        assert!(!is_gzip(&[]));
    }

    #[test]
    fn gzip_then_gunzip() -> Result<()> {
        let compressed = gzip(&NBT)?;
        assert!(is_gzip(&compressed));
        assert_eq!(gunzip_if_needed(compressed)?, NBT);
        Ok(())
    }

    #[test]
    fn plain_data_passes_through() -> Result<()> {
        assert_eq!(gunzip_if_needed(NBT.to_vec())?, NBT);
        Ok(())
    }

    #[test]
    fn skip_header() -> Result<()> {
        assert_eq!(skip(&NBT, 0)?, &NBT);
        assert_eq!(skip(&NBT, 2)?, &NBT[2..]);
        assert!(skip(&NBT, 5)?.is_empty());
        assert!(skip(&NBT, 6).is_err());
        Ok(())
    }

    #[test]
    fn nbt_to_json_and_back() -> Result<()> {
        let opts = Options {
            comment: Some("from test".to_owned()),
            ..Default::default()
        };
        let json = convert(NBT.to_vec(), &opts)?;
        let text = String::from_utf8(json.clone())?;
        assert!(text.contains("\"comment\": \"from test\""), "{}", text);
        assert!(text.ends_with('\n'));

        let reverse = Options {
            reverse: true,
            ..Default::default()
        };
        assert_eq!(convert(json, &reverse)?, NBT);
        Ok(())
    }

    #[test]
    fn gzipped_input_with_header() -> Result<()> {
        let mut with_header = vec![9, 0, 0, 0, 5, 0, 0, 0];
        with_header.extend_from_slice(&NBT);

        let opts = Options {
            skip: 8,
            ..Default::default()
        };
        let json = convert(gzip(&with_header)?, &opts)?;

        let reverse = Options {
            reverse: true,
            ..Default::default()
        };
        assert_eq!(convert(json, &reverse)?, NBT);
        Ok(())
    }

    #[test]
    fn skipping_too_far_fails() {
        let opts = Options {
            skip: 100,
            ..Default::default()
        };
        assert!(convert(NBT.to_vec(), &opts).is_err());
    }

    #[test]
    fn yaml_gzip_big_endian() -> Result<()> {
        let big = [1, 0, 1, b'a', 1];
        let opts = Options {
            yaml: true,
            ..Default::default()
        }
        .big_endian(true)
        .long_as_string(true);

        let yaml = convert(big.to_vec(), &opts)?;
        assert!(String::from_utf8(yaml.clone())?.contains("tagType"));

        let reverse = Options {
            reverse: true,
            gzip: true,
            ..opts
        };
        let out = convert(yaml, &reverse)?;
        assert!(is_gzip(&out));
        assert_eq!(gunzip_if_needed(out)?, big);
        Ok(())
    }

    #[test]
    fn long_as_string_output() -> Result<()> {
        let nbt = [4, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0];
        let opts = Options::default().long_as_string(true);
        let json = String::from_utf8(convert(nbt.to_vec(), &opts)?)?;
        assert!(json.contains("\"value\": \"1\""), "{}", json);
        Ok(())
    }

    #[test]
    fn side_named_paths_follow_direction() {
        assert_eq!(io_paths(false, None, None, "-", "-"), ("-", "-"));
        assert_eq!(
            io_paths(false, Some("level.dat"), Some("level.json"), "-", "-"),
            ("level.dat", "level.json")
        );
        assert_eq!(
            io_paths(true, Some("level.dat"), Some("level.json"), "-", "-"),
            ("level.json", "level.dat")
        );
        assert_eq!(
            io_paths(true, Some("level.dat"), None, "in.json", "-"),
            ("in.json", "level.dat")
        );
        assert_eq!(
            io_paths(false, None, Some("out.json"), "in.dat", "ignored"),
            ("in.dat", "out.json")
        );
    }

    #[test]
    fn bad_json_is_an_error() {
        let reverse = Options {
            reverse: true,
            ..Default::default()
        };
        assert!(convert(b"{not json".to_vec(), &reverse).is_err());
    }
}
