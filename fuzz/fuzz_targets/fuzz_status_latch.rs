//! Fuzz target: `StatusLatch::set`
//!
//! Feeds arbitrary UTF-8 into a latch and checks the bound and prefix
//! guarantees hold for every input.
//!
//! cargo fuzz run fuzz_status_latch

#![no_main]

use libfuzzer_sys::fuzz_target;
use paneldue::status::{MESSAGE_CAPACITY, StatusLatch};

fuzz_target!(|text: &str| {
    let mut latch: StatusLatch<MESSAGE_CAPACITY> = StatusLatch::new();
    latch.set(text);

    assert!(latch.len() <= MESSAGE_CAPACITY, "latch exceeds capacity");
    assert!(text.starts_with(latch.as_str()), "latch is not a prefix of input");

    // A second write replaces, never appends.
    latch.set("ok");
    assert_eq!(latch.as_str(), "ok");
});
