#![no_main]

use cartfile_manifest::ManifestSyntax;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        for syntax in [ManifestSyntax::default(), ManifestSyntax::with_comment_indicator("//")] {
            let stripped = syntax.strip_comment(line);
            assert!(line.starts_with(stripped), "stripped text must be a prefix");
            assert_eq!(syntax.strip_comment(stripped), stripped, "stripping must be idempotent");
        }
    }
});
