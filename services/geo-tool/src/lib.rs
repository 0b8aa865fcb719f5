//! Command line front end for the geocoding workspace.
//!
//! The binary in `main.rs` only parses arguments and sets up logging; the
//! command implementations live here so they can be tested directly.

pub mod commands;
pub mod logging;
