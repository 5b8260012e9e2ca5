//! Library side of the `reweigh` command-line tool.

pub mod logging;
pub mod pipeline;
