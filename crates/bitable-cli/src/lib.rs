//! Library side of the `bitable-print` command line tool.

pub mod config;
pub mod logging;
pub mod pipeline;
