#![no_main]
use libfuzzer_sys::fuzz_target;
use pbo_stream::parsing::{ExtensionsParser, FileTableParser, HeaderEntryParser};
use pbo_stream::{ByteCursor, ParseOptions};

fuzz_target!(|data: &[u8]| {
    // Fuzz header entry
    let _ = HeaderEntryParser::parse(&mut ByteCursor::from_slice(data));

    // Fuzz extension list
    let _ = ExtensionsParser::parse(&mut ByteCursor::from_slice(data));

    // Fuzz file table walk
    let _ = FileTableParser::parse(&mut ByteCursor::from_slice(data), &ParseOptions::default());
});
