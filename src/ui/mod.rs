//! Terminal front end. Renders controller snapshots and turns key presses
//! into intents; it never mutates conversation state itself.

pub mod chat_loop;
pub mod renderer;

pub use chat_loop::run_chat;
