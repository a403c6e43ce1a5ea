//! ollama-chat is a terminal chat client for language models served behind an
//! OpenAI-compatible HTTP API.
//!
//! The crate is organized in a few layers:
//! - [`api`] defines the wire payloads and the HTTP client for listing
//!   models, requesting completions and probing health.
//! - [`core`] owns the conversation controller (session state, intents and
//!   the request lifecycle), the message model, and configuration.
//! - [`ui`] renders controller snapshots in the terminal and turns key
//!   presses into intents.
//! - [`cli`] parses arguments and dispatches into the chat UI or one of the
//!   one-shot commands.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
