use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::builder::Builder;
use crate::error::EncodeResult;
use crate::write::encode;
use crate::{
    json_to_nbt, nbt_to_json, nbt_to_yaml, yaml_to_nbt, Config, Document, Endian, List,
    LongFormat, NamedTag, Tag, Value, MAX_DEPTH,
};

/// One of every tag type, written the way documents in the wild mix the long
/// forms, indentation and trailing End objects.
const SAMPLE: &str = r#"{
  "nbt": [
    {
      "tagType": 10,
      "name": "",
      "value": [
        { "tagType": 1, "name": "TestByte", "value": 127 },
        { "tagType": 2, "name": "TestShort", "value": 32767 },
        { "tagType": 3, "name": "TestInt", "value": 2147483647 },
        {
          "tagType": 4,
          "name": "",
          "value": { "valueLeast": 4294967295, "valueMost": 2147483647 }
        },
        { "tagType": 4, "name": "TestLongAsString", "value": "9223372036854775807" },
        { "tagType": 5, "name": "TestFloat", "value": 1.234567e+38 },
        { "tagType": 6, "name": "TestDouble", "value": 1.23456789012345e+307 },
        { "tagType": 7, "name": "TestByteArray", "value": [0, -128, 127] },
        { "tagType": 8, "name": "TestString", "value": "This is a test string" },
        {
          "tagType": 9,
          "name": "TestList",
          "value": { "tagListType": 3, "list": [0, 2147483647, -2147483648] }
        },
        { "tagType": 11, "name": "TestIntArray", "value": [0, 2147483647, -2147483648] },
        {
          "tagType": 12,
          "name": "TestLongArray",
          "value": [
            { "valueLeast": 0, "valueMost": 0 },
            { "valueLeast": 4294967295, "valueMost": 2147483647 },
            "9223372036854775807",
            { "valueLeast": 0, "valueMost": -2147483648 }
          ]
        },
        { "tagType": 0, "name": "", "value": null }
      ]
    }
  ]
}"#;

fn hash(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

/// The document with its conversion time removed, which differs run to run.
fn timeless(json: &str) -> serde_json::Value {
    let mut doc: serde_json::Value = serde_json::from_str(json).unwrap();
    if let Some(obj) = doc.as_object_mut() {
        obj.remove("conversionTime");
    }
    doc
}

#[test]
fn sample_round_trip_is_stable() -> EncodeResult<()> {
    for endian in [Endian::Big, Endian::Little] {
        let config = Config::default().with_endian(endian);

        let nbt = json_to_nbt(SAMPLE, &config)?;
        let json = nbt_to_json(&nbt, &config, None).unwrap();
        let nbt2 = json_to_nbt(&json, &config)?;
        let json2 = nbt_to_json(&nbt2, &config, None).unwrap();

        assert_eq!(hash(&nbt), hash(&nbt2), "{:?}", endian);
        assert_eq!(nbt, nbt2);
        assert_eq!(timeless(&json), timeless(&json2));
    }
    Ok(())
}

#[test]
fn sample_decodes_to_expected_tree() -> EncodeResult<()> {
    let nbt = json_to_nbt(SAMPLE, &Config::java())?;
    let tags = crate::read::decode(&nbt, Endian::Big).unwrap();

    let expected = NamedTag::new(
        "",
        Value::Compound(vec![
            NamedTag::new("TestByte", 127i8),
            NamedTag::new("TestShort", 32767i16),
            NamedTag::new("TestInt", i32::MAX),
            NamedTag::new("", i64::MAX),
            NamedTag::new("TestLongAsString", i64::MAX),
            NamedTag::new("TestFloat", 1.234567e+38f64 as f32),
            NamedTag::new("TestDouble", 1.23456789012345e+307f64),
            NamedTag::new("TestByteArray", Value::ByteArray(vec![0, -128, 127])),
            NamedTag::new("TestString", "This is a test string"),
            NamedTag::new("TestList", List::Int(vec![0, i32::MAX, i32::MIN])),
            NamedTag::new("TestIntArray", Value::IntArray(vec![0, i32::MAX, i32::MIN])),
            NamedTag::new(
                "TestLongArray",
                Value::LongArray(vec![0, i64::MAX, i64::MAX, i64::MIN]),
            ),
        ]),
    );
    assert_eq!(tags, vec![expected]);
    Ok(())
}

#[test]
fn sample_in_both_long_formats() -> EncodeResult<()> {
    let nbt = json_to_nbt(SAMPLE, &Config::bedrock())?;
    for long_format in [LongFormat::Halves, LongFormat::String] {
        let config = Config::bedrock().with_long_format(long_format);
        let json = nbt_to_json(&nbt, &config, None).unwrap();
        assert_eq!(json_to_nbt(&json, &config)?, nbt, "{:?}", long_format);
    }
    Ok(())
}

#[test]
fn binary_round_trip() -> EncodeResult<()> {
    for endian in [Endian::Big, Endian::Little] {
        let nbt = Builder::with_endian(endian)
            .start_compound("Level")
            .string("LevelName", "New World")
            .long("RandomSeed", -4_611_686_018_427_387_904)
            .start_list("Pos", Tag::Double, 3)
            .double_payload(0.5)
            .double_payload(-64.0)
            .double_payload(1e300)
            .start_list("Inventory", Tag::Compound, 1)
            .start_anon_compound()
            .short("Damage", 0)
            .byte("Slot", -106)
            .end_compound()
            .start_list("Tags", Tag::List, 1)
            .start_anon_list(Tag::IntArray, 1)
            .int_array_payload(&[1, 2, 3])
            .byte_array("Heights", &[-1; 16])
            .end_compound()
            .int("trailing", 7)
            .build();

        let config = Config::default().with_endian(endian);
        let json = nbt_to_json(&nbt, &config, Some("round trip")).unwrap();
        assert_eq!(json_to_nbt(&json, &config)?, nbt, "{:?}", endian);
    }
    Ok(())
}

/// Exact bit patterns of numbers at the edges of their types survive the
/// trip through text.
#[test]
fn float_edges() -> EncodeResult<()> {
    let cases: &[(u8, f64, &[u8])] = &[
        (5, 0.0, &[5, 0, 0, 0, 0, 0, 0]),
        (5, f32::MAX as f64, &[5, 0, 0, 0xff, 0xff, 0x7f, 0x7f]),
        (5, 1e-45, &[5, 0, 0, 0x01, 0, 0, 0]),
        (6, 0.0, &[6, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        (
            6,
            f64::MAX,
            &[6, 0, 0, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xef, 0x7f],
        ),
        (6, 5e-324, &[6, 0, 0, 0x01, 0, 0, 0, 0, 0, 0, 0]),
    ];

    let config = Config::bedrock();
    for (tag_type, value, expected) in cases {
        let json = serde_json::json!({
            "nbt": [{ "tagType": tag_type, "name": "", "value": value }]
        })
        .to_string();
        let nbt = json_to_nbt(&json, &config)?;
        assert_eq!(&nbt, expected, "{}", json);

        let again = nbt_to_json(&nbt, &config, None).unwrap();
        assert_eq!(&json_to_nbt(&again, &config)?, expected, "{}", again);
    }
    Ok(())
}

/// Compounds and lists nested `depth` deep, alternating, with a long array
/// at the bottom. Every level costs as much text nesting as a level can.
fn alternating(depth: usize) -> NamedTag {
    let mut value = if depth % 2 == 1 {
        Value::Compound(vec![NamedTag::new("longs", Value::LongArray(vec![i64::MIN]))])
    } else {
        Value::List(List::LongArray(vec![vec![i64::MIN]]))
    };
    for _ in 1..depth {
        value = match value {
            Value::Compound(entries) => Value::List(List::Compound(vec![entries])),
            list => Value::Compound(vec![NamedTag::new("list", list)]),
        };
    }
    NamedTag::new("", value)
}

#[test]
fn deepest_tree_round_trips_through_text() -> EncodeResult<()> {
    for depth in [MAX_DEPTH - 1, MAX_DEPTH] {
        for endian in [Endian::Big, Endian::Little] {
            let config = Config::default().with_endian(endian);
            let nbt = encode(&[alternating(depth)], endian)?;

            let json = nbt_to_json(&nbt, &config, None).unwrap();
            assert_eq!(json_to_nbt(&json, &config)?, nbt, "json at {}", depth);

            let yaml = nbt_to_yaml(&nbt, &config, None).unwrap();
            assert_eq!(yaml_to_nbt(&yaml, &config)?, nbt, "yaml at {}", depth);
        }
    }
    Ok(())
}

#[test]
fn too_deep_for_text() {
    let doc = Document::new(vec![alternating(MAX_DEPTH + 1)]);
    for long_format in [LongFormat::Halves, LongFormat::String] {
        let err = doc.to_json(long_format).unwrap_err();
        assert!(err.to_string().contains("nesting deeper than"), "{}", err);
        assert!(doc.to_yaml(long_format).is_err());
    }
    assert!(encode(&doc.nbt, Endian::Big).is_err());
}
