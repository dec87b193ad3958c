#![no_main]
use libfuzzer_sys::fuzz_target;

use nbt2json::read::decode;
use nbt2json::write::encode;
use nbt2json::{Document, Endian, LongFormat, NamedTag};

fuzz_target!(|tag: NamedTag| {
    let tags = vec![tag];
    let bs = match encode(&tags, Endian::Little) {
        Ok(bs) => bs,
        Err(_) => return,
    };

    let decoded = decode(&bs, Endian::Little).unwrap();
    assert_eq!(encode(&decoded, Endian::Little).unwrap(), bs);

    for long_format in [LongFormat::Halves, LongFormat::String] {
        let json = Document::new(decoded.clone()).to_json(long_format).unwrap();
        let doc = Document::from_json(&json).unwrap();
        let text_bs = doc.to_nbt(Endian::Little).unwrap();
        // NaN payloads are not kept through text, so only the length is
        // guaranteed for trees holding NaN.
        assert_eq!(text_bs.len(), bs.len());
    }
});
