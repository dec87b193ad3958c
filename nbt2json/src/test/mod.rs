use std::convert::TryFrom;

use crate::Tag;

pub mod builder;



mod roundtrip;

macro_rules! check_tags {
    {$($tag:ident = $val:literal),* $(,)?} => {
        $(
            assert_eq!(u8::from(Tag::$tag), $val);
            assert_eq!(Tag::try_from($val as u8), Ok(Tag::$tag));
        )*
    };
}

#[test]
fn exhaustive_tag_check() {
    check_tags! {
        End = 0,
        Byte = 1,
        Short = 2,
        Int = 3,
        Long = 4,
        Float = 5,
        Double = 6,
        ByteArray = 7,
        String = 8,
        List = 9,
        Compound = 10,
        IntArray = 11,
        LongArray = 12,
    }

    for value in 13..=u8::MAX {
        assert!(Tag::try_from(value).is_err())
    }
}

#[test]
fn empty_list_keeps_element_tag() {
    for value in 0..=12u8 {
        let tag = Tag::try_from(value).unwrap();
        let list = crate::List::empty(tag);
        assert_eq!(list.element_tag(), tag);
        assert!(list.is_empty());
    }
}
