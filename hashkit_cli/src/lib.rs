//! Library side of the `hashkit` binary: configuration, input streaming and
//! output formatting, shared with the integration tests.

pub mod config;
pub mod input;
pub mod output;
pub mod terminal;
