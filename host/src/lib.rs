//! Host for `todo-core`: performs the effects the core asks for.
//!
//! # Overview
//! The core builds requests and decides what they mean; this crate moves
//! the bytes. `Session` executes `Effect::Send` with ureq on tokio's
//! blocking pool, runs the error-banner countdown as a cancellable task, and
//! feeds everything back into the core in arrival order. The `todo` binary
//! wraps a session in a line-oriented terminal front-end.

pub mod command;
pub mod config;
pub mod render;
pub mod session;
pub mod transport;

pub use command::{Command, CommandError};
pub use config::{Config, ConfigError};
pub use render::Page;
pub use session::{Event, Focus, Session};
pub use transport::Transport;
