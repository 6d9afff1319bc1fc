//! Instructions the core hands to its host.
//!
//! Every user intent on `App` returns a `Vec<Effect>`. The host performs
//! them in order: HTTP requests go out and come back through
//! `App::receive(ticket, ..)`, timer effects drive the banner task, focus
//! effects move the input cursor.

use std::fmt;
use std::time::Duration;

use crate::http::HttpRequest;
use crate::types::TodoId;

/// Correlates an outgoing request with its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Perform `request` and report the outcome with `App::receive(ticket, ..)`.
    Send { ticket: Ticket, request: HttpRequest },

    /// Replace any pending banner timer with one that fires
    /// `App::dismiss_elapsed(generation)` after `after`.
    ScheduleDismiss { generation: u64, after: Duration },

    /// Abort the pending banner timer, if any.
    CancelDismiss,

    /// Move input focus to the new-todo field.
    FocusNewTodo,

    /// Move input focus to the title editor of the given item.
    FocusTitleField(TodoId),
}

impl Effect {
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            Effect::Send { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }
}
