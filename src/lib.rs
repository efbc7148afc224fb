//! chatloom - a chat session engine with mention autocomplete and simulated
//! streaming replies.
//!
//! This library exposes modules for use by the binary and integration tests.

pub mod app;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod input;
pub mod logging;
pub mod models;
pub mod names;
pub mod responder;
pub mod server;
pub mod session;
pub mod storage;
