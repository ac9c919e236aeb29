//! Fuzz target for lab-file parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mirdoc::doc::io_lab::from_lab_str;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = from_lab_str(text, "beat");
    }
});
