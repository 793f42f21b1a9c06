#![no_main]

use cartfile_manifest::{ManifestFormat, ManifestSyntax, SchemeAllowList};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let syntax = ManifestSyntax::default();

        let Ok(schemes) = SchemeAllowList::parse(content, &syntax) else {
            panic!("scheme allow-list parsing is infallible");
        };

        for scheme in schemes.iter() {
            assert!(!scheme.is_empty(), "empty scheme name");
            assert_eq!(scheme, scheme.trim(), "scheme name not trimmed");
        }
    }
});
