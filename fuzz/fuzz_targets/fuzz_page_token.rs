#![no_main]

use hubsync_connector::{PageBag, PageScope};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz continuation token decoding
    if let Ok(token) = std::str::from_utf8(data) {
        for scope in [
            PageScope::resource_type("team"),
            PageScope::resource("repository", "web"),
        ] {
            if let Ok((bag, page)) = PageBag::parse(token, scope.clone()) {
                // An accepted token always resumes the requested scope
                assert_eq!(bag.current().map(|s| &s.scope), Some(&scope));

                // Re-encoding must produce a token that parses back
                let depth = bag.depth();
                let marker = page.filter(|p| !p.is_empty()).unwrap_or_else(|| "1".into());
                if let Ok(next) = bag.next_token(Some(&marker)) {
                    let (again, _) = PageBag::parse(&next, scope).expect("re-encoded token");
                    assert_eq!(again.depth(), depth);
                }
            }
        }
    }
});
