//! Command-line interface.
//!
//! Call [`parse_args`] early in `main()` so `--version` and `--help` are
//! answered before logging or the runtime start.

pub mod args;
pub mod version;

pub use args::{parse_args, usage, CliCommand, RunOptions};
pub use version::{version_line, VERSION};
