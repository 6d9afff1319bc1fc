//! The shared error banner.
//!
//! Only the latest message is shown. Each `show` bumps a generation counter
//! and asks the host for a fresh timer; an expiry carrying an older
//! generation is ignored, so a late timer can never hide a newer message.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::effect::Effect;

/// How long a message stays visible without a newer one.
pub const DISMISS_AFTER: Duration = Duration::from_secs(3);

/// The fixed user-facing messages, one per failing operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMessage {
    LoadTodos,
    AddTodo,
    DeleteTodo,
    UpdateTodo,
    EmptyTitle,
}

impl ErrorMessage {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorMessage::LoadTodos => "Unable to load todos",
            ErrorMessage::AddTodo => "Unable to add a todo",
            ErrorMessage::DeleteTodo => "Unable to delete a todo",
            ErrorMessage::UpdateTodo => "Unable to update a todo",
            ErrorMessage::EmptyTitle => "Title should not be empty",
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ErrorBanner {
    current: Option<ErrorMessage>,
    generation: u64,
    dismiss_after: Duration,
}

impl ErrorBanner {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            current: None,
            generation: 0,
            dismiss_after,
        }
    }

    pub fn message(&self) -> Option<ErrorMessage> {
        self.current
    }

    /// Display `message`, restarting the auto-dismiss countdown.
    pub fn show(&mut self, message: ErrorMessage) -> Effect {
        self.generation += 1;
        self.current = Some(message);
        debug!(%message, generation = self.generation, "error banner shown");
        Effect::ScheduleDismiss {
            generation: self.generation,
            after: self.dismiss_after,
        }
    }

    /// Manual dismissal: clear now and cancel the countdown.
    pub fn dismiss(&mut self) -> Effect {
        self.generation += 1;
        self.current = None;
        Effect::CancelDismiss
    }

    /// Timer expiry. Returns whether the banner was cleared.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.current.is_none() {
            debug!(generation, current = self.generation, "stale banner timer ignored");
            return false;
        }
        self.current = None;
        true
    }
}

impl Default for ErrorBanner {
    fn default() -> Self {
        Self::new(DISMISS_AFTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled_generation(effect: Effect) -> u64 {
        match effect {
            Effect::ScheduleDismiss { generation, after } => {
                assert_eq!(after, DISMISS_AFTER);
                generation
            }
            other => panic!("expected ScheduleDismiss, got {other:?}"),
        }
    }

    #[test]
    fn expiry_of_current_generation_clears() {
        let mut banner = ErrorBanner::default();
        let generation = scheduled_generation(banner.show(ErrorMessage::AddTodo));
        assert_eq!(banner.message(), Some(ErrorMessage::AddTodo));
        assert!(banner.expire(generation));
        assert_eq!(banner.message(), None);
    }

    #[test]
    fn newer_message_outlives_older_timer() {
        let mut banner = ErrorBanner::default();
        let first = scheduled_generation(banner.show(ErrorMessage::AddTodo));
        let second = scheduled_generation(banner.show(ErrorMessage::UpdateTodo));
        assert_ne!(first, second);

        assert!(!banner.expire(first));
        assert_eq!(banner.message(), Some(ErrorMessage::UpdateTodo));
        assert!(banner.expire(second));
    }

    #[test]
    fn dismiss_clears_and_cancels() {
        let mut banner = ErrorBanner::default();
        let generation = scheduled_generation(banner.show(ErrorMessage::DeleteTodo));
        assert_eq!(banner.dismiss(), Effect::CancelDismiss);
        assert_eq!(banner.message(), None);
        assert!(!banner.expire(generation));
    }

    #[test]
    fn messages_match_the_ui_copy() {
        assert_eq!(ErrorMessage::EmptyTitle.to_string(), "Title should not be empty");
        assert_eq!(ErrorMessage::LoadTodos.as_str(), "Unable to load todos");
    }
}
