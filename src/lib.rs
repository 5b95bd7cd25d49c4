//! Tsuyaku - Chat Translation Bot Core
//!
//! Detects the script of an incoming chat message, translates it into
//! Japanese and/or Traditional Chinese (Taiwan) through an LLM backend,
//! and assembles the reply messages.

pub mod cli;
pub mod config;
pub mod error;
pub mod message;
pub mod reply;
pub mod script;
pub mod translate;
