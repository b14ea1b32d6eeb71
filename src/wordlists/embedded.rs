//! Embedded word lists
//!
//! Race word lists compiled into the binary by the build script.

// Include generated word lists from build script
include!(concat!(env!("OUT_DIR"), "/answers.rs"));
include!(concat!(env!("OUT_DIR"), "/allowed.rs"));
