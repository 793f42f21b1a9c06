#![no_main]

use cartfile_manifest::{DeclarationFile, ManifestFormat, ManifestSyntax};
use libfuzzer_sys::fuzz_target;
use std::panic::AssertUnwindSafe;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let syntax = ManifestSyntax::default();

        let result =
            std::panic::catch_unwind(AssertUnwindSafe(|| DeclarationFile::parse(content, &syntax)));

        match result {
            Ok(Ok(file)) => {
                // Canonical output must parse back to the same declarations
                let rendered = file.render();
                let reparsed = DeclarationFile::parse(&rendered, &syntax)
                    .expect("rendered declarations must parse");
                assert_eq!(file, reparsed, "render/parse round trip changed the file");
            }
            Ok(Err(_)) => {}
            Err(_) => panic!("declaration parser panicked"),
        }
    }
});
