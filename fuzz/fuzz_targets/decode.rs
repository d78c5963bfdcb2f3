#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use asn1parse::ber::{Mode, Parser, ParserOptions};

#[derive(Arbitrary, Clone, Debug)]
struct Input {
    der: bool,
    validate_utf8: bool,
    teletex_as_latin1: bool,
    data: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let mode = if input.der { Mode::Der } else { Mode::Ber };
    let options = ParserOptions::new(mode)
        .with_validate_utf8(input.validate_utf8)
        .with_teletex_as_latin1(input.teletex_as_latin1);
    let mut parser = Parser::new(&input.data, options);
    while parser.has_unconsumed_data() {
        let value = match parser.parse() {
            Ok(value) => value,
            Err(_) => break,
        };
        let _ = value.type_desc();
        if let Some(text) = value.as_text() {
            let _ = text.to_utf8();
        }
        if let Some(oid) = value.as_oid() {
            let _ = oid.oid().to_string();
        }
    }
});
