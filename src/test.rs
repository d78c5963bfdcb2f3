//! Tests decoding complete values.
#![cfg(test)]

use std::thread;
use crate::ber::{
    Class, Error, InvalidOid, Mode, Oid, Parser, ParserOptions, Tag, Value
};


//------------ Helpers -------------------------------------------------------

fn decode_all(data: &[u8], options: ParserOptions) -> Result<Value, Error> {
    Parser::new(data, options).parse_all()
}

/// Returns whether decoding the hex encoded data fails.
fn fails(hex: &str, mode: Mode) -> bool {
    let data = hex::decode(hex).unwrap();
    decode_all(&data, mode.into()).is_err()
}

/// Returns the octets of a definite length.
fn encode_length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        return vec![len as u8]
    }
    let octets = len.to_be_bytes();
    let skip = octets.iter().take_while(|&&octet| octet == 0).count();
    let mut res = vec![0x80 | (octets.len() - skip) as u8];
    res.extend_from_slice(&octets[skip..]);
    res
}

/// Wraps `content` into a value with the given identifier octet.
fn wrap(identifier: u8, content: &[u8]) -> Vec<u8> {
    let mut res = vec![identifier];
    res.extend(encode_length(content.len()));
    res.extend_from_slice(content);
    res
}

/// Returns a NULL nested in `depth` sequences.
fn nested_null(depth: usize) -> Vec<u8> {
    let mut res = vec![0x05, 0x00];
    for _ in 0..depth {
        res = wrap(0x30, &res);
    }
    res
}

/// Runs `op` on a thread with a stack large enough for deep nesting.
fn with_large_stack<F: FnOnce() + Send + 'static>(op: F) {
    thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(op).unwrap()
        .join().unwrap()
}


//------------ Generic Structure ---------------------------------------------

#[test]
fn three_null_sequence() {
    let data = hex::decode("3006050005000500").unwrap();
    let value = decode_all(&data, ParserOptions::der()).unwrap();
    assert!(value.is_universal_type(Tag::SEQUENCE));
    let cons = value.as_constructed().unwrap();
    assert_eq!(cons.len(), 3);
    for item in cons {
        assert!(item.is_universal_type(Tag::NULL));
        assert!(item.body().is_empty());
    }
}

#[test]
fn bad_sequence_length() {
    assert!(fails("3005050005000500", Mode::Der));
    assert!(fails("3007050005000500", Mode::Der));

    // A length of 4 leaves a NULL unconsumed.
    let data = hex::decode("3004050005000500").unwrap();
    assert_eq!(
        decode_all(&data, ParserOptions::der()),
        Err(Error::UnconsumedData)
    );
    let mut parser = Parser::new(&data, ParserOptions::der());
    assert!(parser.parse().is_ok());
    assert!(parser.has_unconsumed_data());
}

#[test]
fn three_blob_set() {
    let data = hex::decode("310c8102abcd8103abcdef8101ff").unwrap();
    let value = decode_all(&data, ParserOptions::der()).unwrap();
    assert!(value.is_universal_type(Tag::SET));
    let cons = value.as_constructed().unwrap();
    assert_eq!(cons.len(), 3);
    for item in cons {
        assert_eq!(item.class(), Class::ContextSpecific);
        assert_eq!(item.tag(), Tag::new(Class::ContextSpecific, 1).unwrap());
    }
    assert_eq!(cons.elements()[1].body(), b"\xab\xcd\xef");
}

#[test]
fn set_order() {
    let data = hex::decode("31098103abcdef8102abcd").unwrap();
    assert_eq!(
        decode_all(&data, ParserOptions::der()),
        Err(Error::InvalidFormat)
    );
    let value = decode_all(&data, ParserOptions::ber()).unwrap();
    assert!(value.is_universal_type(Tag::SET));
    assert_eq!(value.as_constructed().unwrap().len(), 2);

    // Equal elements are fine.
    assert!(!fails("31068101ff8101ff", Mode::Der));

    // Only SETs are ordered.
    assert!(!fails("30098103abcdef8102abcd", Mode::Der));
}

#[test]
fn long_length_form() {
    let mut data = vec![0x04, 0x82, 0x01, 0x00];
    for i in 0..256 {
        data.push((i % 4) as u8);
    }
    let value = decode_all(&data, ParserOptions::der()).unwrap();
    assert!(value.is_universal_type(Tag::OCTET_STRING));
    assert_eq!(value.body().len(), 256);
    for (i, octet) in value.body().iter().enumerate() {
        assert_eq!(usize::from(*octet), i % 4);
    }
}

#[test]
fn shortest_length() {
    // Long form where the short form would do.
    assert!(fails("04810100", Mode::Der));
    assert!(!fails("04810100", Mode::Ber));

    // A redundant leading zero.
    let data = format!("048200ff{}", "42".repeat(255));
    assert!(fails(&data, Mode::Der));
    assert!(!fails(&data, Mode::Ber));

    // Ridiculous lengths.
    assert!(fails(&format!("048f{}", "ff".repeat(15)), Mode::Ber));
    assert!(fails(&format!("0484{}", "ff".repeat(15)), Mode::Ber));
    assert!(fails("ff", Mode::Ber));
    assert!(fails("04ff", Mode::Ber));
}

#[test]
fn constructed_string() {
    assert!(fails("2409040200010403020304", Mode::Der));
    let data = hex::decode("2409040200010403020304").unwrap();
    let value = decode_all(&data, ParserOptions::ber()).unwrap();
    assert!(value.is_constructed());
    assert!(value.is_universal_type(Tag::OCTET_STRING));
    assert_eq!(value.as_constructed().unwrap().len(), 2);

    // Primitive SEQUENCE and constructed NULL are never right.
    assert!(!fails("3000", Mode::Der));
    assert!(fails("1000", Mode::Ber));
    assert!(fails("2500", Mode::Ber));
}

#[test]
fn recursion_limit() {
    with_large_stack(|| {
        for depth in [100, 1024] {
            let data = nested_null(depth);
            assert!(decode_all(&data, ParserOptions::der()).is_ok());
            assert!(decode_all(&data, ParserOptions::ber()).is_ok());
        }
        assert_eq!(
            decode_all(&nested_null(1025), ParserOptions::der()),
            Err(Error::InvalidFormat)
        );
    })
}

#[test]
fn indefinite_recursion_limit() {
    fn nested(depth: usize) -> Vec<u8> {
        let mut res = Vec::new();
        res.extend(std::iter::repeat([0x30, 0x80]).take(depth).flatten());
        res.extend([0x05, 0x00]);
        res.extend(std::iter::repeat([0x00, 0x00]).take(depth).flatten());
        res
    }

    with_large_stack(|| {
        assert!(decode_all(&nested(1024), ParserOptions::ber()).is_ok());
        assert_eq!(
            decode_all(&nested(1025), ParserOptions::ber()),
            Err(Error::InvalidFormat)
        );
        assert!(decode_all(&nested(1), ParserOptions::der()).is_err());
    })
}

#[test]
fn indefinite_length() {
    // Primitive values can’t have indefinite length.
    assert!(fails("0180000000", Mode::Ber));

    // Unterminated and terminated.
    assert!(fails("30800101ff", Mode::Ber));
    assert!(!fails("30800101ff0000", Mode::Ber));
    assert!(fails("30800101ff0000", Mode::Der));

    let data = hex::decode(
        "30803080050005000000308005000500050000000000"
    ).unwrap();
    let value = decode_all(&data, ParserOptions::ber()).unwrap();
    assert!(value.is_universal_type(Tag::SEQUENCE));
    assert_eq!(value.body(), &data[2..]);
    let elements = value.as_constructed().unwrap().elements();
    assert_eq!(elements.len(), 2);
    assert!(elements[0].is_universal_type(Tag::SEQUENCE));
    assert!(elements[1].is_universal_type(Tag::SEQUENCE));
    assert_eq!(elements[0].as_constructed().unwrap().len(), 2);
    assert_eq!(elements[1].as_constructed().unwrap().len(), 3);
}

#[test]
fn stray_end_of_content() {
    assert!(fails("0000", Mode::Ber));
    assert!(fails("30020000", Mode::Ber));
    assert!(fails("308000010000", Mode::Ber));
}


//------------ Booleans ------------------------------------------------------

#[test]
fn booleans() {
    let data = hex::decode("30060101ff010100").unwrap();
    let value = decode_all(&data, ParserOptions::der()).unwrap();
    let elements = value.as_constructed().unwrap().elements();
    assert_eq!(elements.len(), 2);
    assert!(elements[0].as_boolean().unwrap().get());
    assert!(!elements[1].as_boolean().unwrap().get());
}

#[test]
fn boolean_der() {
    assert!(fails("010101", Mode::Der));
    let data = hex::decode("010101").unwrap();
    let value = decode_all(&data, ParserOptions::ber()).unwrap();
    assert!(value.as_boolean().unwrap().get());

    assert!(fails("0100", Mode::Ber));
    assert!(fails("0102ffff", Mode::Ber));
}


//------------ Object Identifiers --------------------------------------------

#[test]
fn good_oid() {
    let data = hex::decode("060e2a864886f712040186ee1b01e039").unwrap();
    let value = decode_all(&data, ParserOptions::der()).unwrap();
    assert!(value.is_universal_type(Tag::OID));
    let oid = value.as_oid().unwrap();
    assert_eq!(
        oid.components(),
        Some(vec![1, 2, 840, 113554, 4, 1, 112411, 1, 12345])
    );
    assert_eq!(
        oid.oid().to_string(), "1.2.840.113554.4.1.112411.1.12345"
    );
    assert_eq!(
        *oid.oid(),
        Oid::from_components(
            &[1, 2, 840, 113554, 4, 1, 112411, 1, 12345]
        ).unwrap()
    );
}

#[test]
fn bad_oid() {
    assert!(fails("0602ffff", Mode::Der));
    assert!(fails("0600", Mode::Der));

    // The largest component that fits and the smallest one that doesn’t.
    assert!(!fails("06062a8fffffff7f", Mode::Der));
    assert!(fails("06062a9080808000", Mode::Der));
}

#[test]
fn oid_round_trip() {
    let samples: &[&[u32]] = &[
        &[0, 0],
        &[1, 39],
        &[1, 2, 840, 113549, 1, 1, 11],
        &[2, 5, 4, 3],
        &[1, 3, 6, 1, 4, 1, 0, 127, 128, 16383, 16384, u32::MAX],
    ];
    for components in samples {
        let oid = Oid::from_components(components).unwrap();
        assert_eq!(oid.components().as_deref(), Some(*components));
        let data = wrap(0x06, oid.as_slice());
        let value = decode_all(&data, ParserOptions::der()).unwrap();
        assert_eq!(
            value.as_oid().unwrap().components().as_deref(),
            Some(*components)
        );
    }

    // The first two components must fit into the first octet.
    assert_eq!(Oid::from_components(&[2, 175]), Err(InvalidOid));
    assert_eq!(Oid::from_components(&[1, 40]), Err(InvalidOid));
    assert_eq!(Oid::from_components(&[1]), Err(InvalidOid));
}


//------------ Text ----------------------------------------------------------

fn text(hex: &str, options: ParserOptions) -> String {
    let data = hex::decode(hex).unwrap();
    let value = decode_all(&data, options).unwrap();
    value.as_text().unwrap().to_utf8().unwrap()
}

#[test]
fn numeric_string() {
    assert!(!fails("12053132203334", Mode::Der));
    assert!(fails("12053132203374", Mode::Der));
}

#[test]
fn printable_string() {
    assert_eq!(
        text("13092a2e6d69742e656475", ParserOptions::der()), "*.mit.edu"
    );
    assert!(fails("1309ff2e6d69742e656475", Mode::Der));
}

#[test]
fn ascii_string() {
    let mut data = vec![0x16, 0x81, 0x80];
    data.extend(0..128u8);
    let value = decode_all(&data, ParserOptions::der()).unwrap();
    assert!(value.is_universal_type(Tag::IA5_STRING));
    assert!(fails("1601f5", Mode::Der));
}

#[test]
fn universal_string() {
    assert_eq!(
        text(
            "1c180000044200000435000004410000044200000020000200a2",
            ParserOptions::der()
        ),
        "тест 𠂢"
    );
}

#[test]
fn bmp_string() {
    assert_eq!(
        text(
            "1e38042104320435044204380442044c00202014002004380020043d0438\
             043a0430043a04380445002004330432043e04370434043504390021",
            ParserOptions::der()
        ),
        "Светить — и никаких гвоздей!"
    );
}

#[test]
fn teletex_string() {
    assert_eq!(text("1401f2", ParserOptions::der()), "đ");
    assert_eq!(
        text("1401f2", ParserOptions::der().with_teletex_as_latin1(true)),
        "ò"
    );
}

fn utf8_string(len: usize) -> Vec<u8> {
    let text = "緑".repeat(1366);
    wrap(0x0c, &text.as_bytes()[..len])
}

#[test]
fn utf8_validation() {
    for (len, good) in [
        (4098, true), (4097, false), (4096, false), (4095, true),
        (1025, false), (1024, false), (1023, true),
    ] {
        let data = utf8_string(len);
        assert_eq!(
            decode_all(&data, ParserOptions::der()).is_ok(), good,
            "length {}", len
        );
    }

    assert!(fails("0c01ff", Mode::Der));
    assert!(!fails("0c0100", Mode::Der));

    let data = hex::decode("0c01ff").unwrap();
    assert!(
        decode_all(&data, ParserOptions::der().with_validate_utf8(false))
            .is_ok()
    );
}

#[test]
fn empty_string() {
    assert_eq!(text("0c00", ParserOptions::der()), "");
    assert_eq!(text("1e00", ParserOptions::der()), "");
}


//------------ Time ----------------------------------------------------------

fn time(input: &str, mode: Mode) -> Option<String> {
    let data = wrap(0x17, input.as_bytes());
    let value = decode_all(&data, mode.into()).ok()?;
    Some(value.as_utc_time()?.time().to_string())
}

#[test]
fn utc_time() {
    let data = wrap(0x17, b"910102123051Z");
    let value = decode_all(&data, ParserOptions::der()).unwrap();
    let parsed = value.as_utc_time().unwrap().time();
    assert_eq!(parsed.year(), 1991);
    assert_eq!(parsed.month(), 1);
    assert_eq!(parsed.day(), 2);
    assert_eq!(parsed.hour(), 12);
    assert_eq!(parsed.minute(), 30);
    assert_eq!(parsed.second(), 51);
    assert_eq!(parsed.offset(), 0);
    assert_eq!(parsed.to_string(), "1991-01-02 12:30:51 (UTC)");

    assert_eq!(
        time("500101000000Z", Mode::Der).as_deref(),
        Some("1950-01-01 00:00:00 (UTC)")
    );
    assert_eq!(
        time("490101000000Z", Mode::Der).as_deref(),
        Some("2049-01-01 00:00:00 (UTC)")
    );

    assert_eq!(time("9101010000Z", Mode::Der), None);
    assert_eq!(
        time("9101010000Z", Mode::Ber).as_deref(),
        Some("1991-01-01 00:00:00 (UTC)")
    );

    assert_eq!(time("950208040000+0100", Mode::Der), None);
    assert_eq!(time("950208040000-0100", Mode::Der), None);
    assert_eq!(
        time("950208040000+0100", Mode::Ber).as_deref(),
        Some("1995-02-08 04:00:00 (UTC+0100)")
    );
    assert_eq!(
        time("950208040000-0100", Mode::Ber).as_deref(),
        Some("1995-02-08 04:00:00 (UTC-0100)")
    );
}

#[test]
fn bogus_utc_time() {
    for input in [
        "9101010000Z0000", "9101010000+00000",
        "950008040000Z", "951308040000Z",
        "950200040000Z", "950431040000Z", "950229040000Z",
        "910101240000Z", "910101236000Z", "910101230060Z",
        "910101230000+2400", "910101230000+0060",
        "9101021$3051Z",
    ] {
        assert_eq!(time(input, Mode::Ber), None, "{}", input);
    }
    assert!(time("000229040000Z", Mode::Ber).is_some());
    assert!(time("141231235959+2359", Mode::Ber).is_some());
}
