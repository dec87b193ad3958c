#![no_main]
use libfuzzer_sys::fuzz_target;

use nbt2json::read::decode;
use nbt2json::write::encode;
use nbt2json::{Document, Endian, LongFormat};

fuzz_target!(|data: &[u8]| {
    for endian in [Endian::Big, Endian::Little] {
        let tags = match decode(data, endian) {
            Ok(tags) => tags,
            Err(_) => continue,
        };

        let bs = encode(&tags, endian).unwrap();
        assert_eq!(bs, data);

        // NaN payloads are not kept through text, so only the length is
        // compared.
        let json = Document::new(tags).to_json(LongFormat::String).unwrap();
        let doc = Document::from_json(&json).unwrap();
        assert_eq!(doc.to_nbt(endian).unwrap().len(), data.len());
    }
});
