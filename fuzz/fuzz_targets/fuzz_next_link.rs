#![no_main]

use hubsync_client::{PageCursor, Team};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz vendor `next` link parsing
    if let Ok(link) = std::str::from_utf8(data) {
        if let Ok(Some(cursor)) = PageCursor::<Team>::from_next_link(Some(link)) {
            assert!(cursor.page() > 0);

            // Markers round-trip through the opaque token
            let marker = cursor.marker();
            assert_eq!(PageCursor::<Team>::from_marker(&marker).ok(), Some(cursor));
        }
    }
});
