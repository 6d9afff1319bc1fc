//! I/O-free core of the todo client.
//!
//! # Overview
//! Holds the whole behaviour of the todo page without touching the network:
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse` values,
//! and `App` (the application controller) turns user intents into
//! `Effect`s that a host executes. The host feeds responses and timer
//! expiries back in, which keeps every transition deterministic and testable.
//!
//! # Design
//! - `TodoClient` is stateless: it holds only `base_url` and the user id.
//! - `App` owns the authoritative collection, the filter, the draft, the
//!   placeholder, and the error banner; per-item lifecycles live in
//!   `ItemController`s keyed by todo id.
//! - Presentation (`AppView`) is derived on demand and never stored.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod app;
pub mod banner;
pub mod client;
pub mod effect;
pub mod error;
pub mod http;
pub mod item;
pub mod types;
pub mod view;

pub use app::App;
pub use banner::{ErrorBanner, ErrorMessage, DISMISS_AFTER};
pub use client::TodoClient;
pub use effect::{Effect, Ticket};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use item::{ItemCommand, ItemController, Phase, UpdateOrigin};
pub use types::{CreateTodo, Todo, TodoId, UpdateTodo};
pub use view::{AppView, Counts, Filter, FooterView, InputView, NotificationView, ToggleAllView, TodoView};
