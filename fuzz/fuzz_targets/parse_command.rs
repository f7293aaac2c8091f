#![no_main]

use libfuzzer_sys::fuzz_target;
use partstore::{Command, CommandError};

fuzz_target!(|line: &str| {
    match Command::parse(line) {
        Ok(command) => {
            // Verify: the command word is the first word of the line
            let first = line.split_whitespace().next().unwrap();
            assert_eq!(command.name(), first);
        }
        Err(CommandError::Empty) => {
            assert!(line.split_whitespace().next().is_none());
        }
        Err(_) => {}
    }
});
