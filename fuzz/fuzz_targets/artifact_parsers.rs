#![no_main]

use libfuzzer_sys::fuzz_target;
use loravec::manifest::Manifest;
use loravec::regression::PerfTable;
use loravec::{iq, transport};

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must survive a re-encode unchanged
    if let Ok(raw) = transport::decode(data) {
        assert_eq!(transport::decode(&transport::encode(&raw)).ok(), Some(raw));
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Manifest::deserialize(text);
        let _ = iq::parse_iq(text);
        let _ = PerfTable::from_csv_str(text);
    }
});
