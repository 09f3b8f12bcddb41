//! Chat infrastructure - concrete transports

mod console;

pub use console::{ConsoleTransport, DEFAULT_MAX_REPLY_CHARS};
