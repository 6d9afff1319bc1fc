//! Presentation: filters, counters, and the render-ready `AppView`.
//!
//! Everything here is a pure function of the controller's state. The host
//! renders an `AppView` however it likes; the terminal front-end in
//! `todo-host` prints it line by line.

use std::fmt;
use std::str::FromStr;

use crate::types::{Todo, TodoId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    /// Location fragment of the filter link.
    pub fn route(self) -> &'static str {
        match self {
            Filter::All => "#/",
            Filter::Active => "#/active",
            Filter::Completed => "#/completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilter(pub String);

impl fmt::Display for UnknownFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown filter `{}` (expected all, active or completed)", self.0)
    }
}

impl std::error::Error for UnknownFilter {}

/// Accepts both the plain names and the route fragments.
impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "#/" | "" => Ok(Filter::All),
            "active" | "#/active" => Ok(Filter::Active),
            "completed" | "#/completed" => Ok(Filter::Completed),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}

/// Counters derived from the authoritative collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl Counts {
    pub fn of(items: &[Todo]) -> Self {
        let active = items.iter().filter(|todo| !todo.completed).count();
        Self {
            total: items.len(),
            active,
            completed: items.len() - active,
        }
    }

    pub fn all_completed(&self) -> bool {
        self.total > 0 && self.active == 0
    }
}

/// Items passing `filter`, relative order preserved.
pub fn visible(items: &[Todo], filter: Filter) -> Vec<&Todo> {
    items.iter().filter(|todo| filter.matches(todo)).collect()
}

pub fn items_left_label(active: usize) -> String {
    format!("{active} items left")
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoView {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    pub is_busy: bool,
    /// Present while the inline title editor is open.
    pub editing: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub draft: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleAllView {
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterView {
    pub items_left: String,
    pub filter: Filter,
    pub clear_completed_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub message: String,
    pub hidden: bool,
}

/// Everything the page shows at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppView {
    pub input: InputView,
    /// `None` hides the control (empty collection).
    pub toggle_all: Option<ToggleAllView>,
    pub items: Vec<TodoView>,
    pub placeholder: Option<TodoView>,
    /// `None` hides the footer (empty collection).
    pub footer: Option<FooterView>,
    pub notification: NotificationView,
}
