#![no_main]
use libfuzzer_sys::fuzz_target;
use pbo_stream::{parse, sha1_digest, write};

fuzz_target!(|data: &[u8]| {
    let Ok(archive) = parse(data) else {
        return;
    };

    // Anything that decodes and re-encodes must decode to the same files.
    if let Ok(buffer) = write(&archive, Some(&sha1_digest)) {
        let again = parse(&buffer).expect("re-encoded archive must decode");
        assert_eq!(again.header, archive.header);
        assert_eq!(again.extensions, archive.extensions);
        assert_eq!(again.files, archive.files);
    }
});
