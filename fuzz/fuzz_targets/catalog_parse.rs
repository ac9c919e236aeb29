//! Fuzz target for namespace catalog parsing.
//!
//! Arbitrary catalogs must either load or fail with a structured error;
//! they must never panic or leave a half-populated registry.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mirdoc::ns::NamespaceRegistry;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(catalog) = std::str::from_utf8(data) {
        let mut registry = NamespaceRegistry::new();
        let _ = registry.load_catalog(catalog);
    }
});
