//! Fuzz target: `HostCommand::parse`
//!
//! Arbitrary command lines must parse or be ignored without panicking,
//! and any recognised M408 must answer the port it came from.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use paneldue::app::commands::HostCommand;
use paneldue::serial::Origin;

fuzz_target!(|line: &str| {
    let origin = Origin::Serial(1);
    match HostCommand::parse(line, origin) {
        Some(HostCommand::ReportStatus(request)) => {
            assert_eq!(request.origin, origin);
        }
        Some(HostCommand::SetMessage(text)) => {
            assert!(!text.is_empty(), "empty M117 text must clear instead");
            assert!(line.contains(text));
        }
        Some(HostCommand::ClearMessage) | None => {}
    }
});
