//! Command-line argument parsing.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use std::path::PathBuf;

/// Options for a normal run, layered over the environment config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    /// Run only the mention server, no chat driver
    pub serve_only: bool,
    /// Do not start the mention server
    pub no_server: bool,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
    /// Keep chats in memory only
    pub memory: bool,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Run the chat driver and/or the mention server (default)
    Run(RunOptions),
    /// Arguments could not be parsed
    Invalid(String),
}

/// Parse command-line arguments and return the appropriate command.
///
/// The first item is the program name and is skipped.
///
/// # Examples
///
/// ```
/// use chatloom::cli::args::{parse_args, CliCommand, RunOptions};
///
/// let args = vec!["chatloom".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
///
/// let args = vec!["chatloom".to_string(), "--port".to_string(), "4000".to_string()];
/// assert_eq!(
///     parse_args(args.into_iter()),
///     CliCommand::Run(RunOptions { port: Some(4000), ..Default::default() })
/// );
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut options = RunOptions::default();
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--serve" => options.serve_only = true,
            "--no-server" => options.no_server = true,
            "--memory" => options.memory = true,
            "--port" => {
                let Some(value) = args.next() else {
                    return CliCommand::Invalid("--port needs a value".to_string());
                };
                match value.parse::<u16>() {
                    Ok(port) => options.port = Some(port),
                    Err(_) => {
                        return CliCommand::Invalid(format!("invalid port: {}", value));
                    }
                }
            }
            "--data-dir" => {
                let Some(value) = args.next() else {
                    return CliCommand::Invalid("--data-dir needs a path".to_string());
                };
                options.data_dir = Some(PathBuf::from(value));
            }
            other => return CliCommand::Invalid(format!("unknown argument: {}", other)),
        }
    }

    if options.serve_only && options.no_server {
        return CliCommand::Invalid("--serve and --no-server conflict".to_string());
    }
    CliCommand::Run(options)
}

/// Usage text for `--help`.
pub fn usage() -> String {
    format!(
        "chatloom {}\n\n\
         USAGE:\n    chatloom [OPTIONS]\n\n\
         OPTIONS:\n\
         \x20   --serve            Run only the mention server\n\
         \x20   --no-server        Do not start the mention server\n\
         \x20   --port <n>         Mention server port\n\
         \x20   --data-dir <path>  Where chats are saved\n\
         \x20   --memory           Keep chats in memory only\n\
         \x20   -V, --version      Print version\n\
         \x20   -h, --help         Print this help\n",
        super::VERSION
    )
}
