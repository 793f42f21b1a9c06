#![no_main]

use cartfile_manifest::{LockFile, ManifestFormat, ManifestSyntax};
use libfuzzer_sys::fuzz_target;
use std::panic::AssertUnwindSafe;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let syntax = ManifestSyntax::default();

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| LockFile::parse(content, &syntax)));

        match result {
            Ok(Ok(file)) => {
                let rendered = file.render();
                assert!(rendered.ends_with('\n'), "rendered lock file must end with a newline");
                assert_eq!(
                    rendered.lines().filter(|line| !line.is_empty()).count(),
                    file.len(),
                    "one rendered line per pin"
                );
            }
            Ok(Err(_)) => {}
            Err(_) => panic!("lock file parser panicked"),
        }
    }
});
