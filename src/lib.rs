// Library interface for logsieve
// Exposes the view engine to the command-line binary and external tools

pub mod colors;
pub mod columns;
pub mod config;
pub mod filter;
pub mod highlight;
pub mod log_view;
pub mod logging;
pub mod persist;
pub mod projection;
pub mod reader;
pub mod tail;
pub mod viewport;

#[cfg(test)]
mod test_utils;
