//! Per-item lifecycle: inline title editing, toggling, deletion.
//!
//! An `ItemController` never talks to the network. Its methods return an
//! `ItemCommand` telling `App` which remote call (if any) to issue, and `App`
//! reports the outcome back through the `*_settled` / `delete_failed` hooks.

use tracing::debug;

use crate::types::{Todo, UpdateTodo};

/// Where an item is in its editing/deletion lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Viewing,
    Editing { draft: String },
    /// A title update is in flight; `draft` is restored if it fails.
    SavingTitle { draft: String },
    /// A delete is in flight. `resume` holds the edit draft when the delete
    /// came from clearing the title, so a failure drops back into editing.
    Deleting { resume: Option<String> },
}

/// What the owning controller should do in response to an item intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemCommand {
    Nothing,
    Update(UpdateTodo),
    Delete,
}

/// Why an update was issued; decides how its outcome is reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOrigin {
    Toggle,
    Title,
    ToggleAll,
}

#[derive(Debug, Clone)]
pub struct ItemController {
    phase: Phase,
    toggles_in_flight: usize,
}

impl Default for ItemController {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemController {
    pub fn new() -> Self {
        Self {
            phase: Phase::Viewing,
            toggles_in_flight: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The draft shown in the title editor, if the editor is open.
    pub fn edit_draft(&self) -> Option<&str> {
        match &self.phase {
            Phase::Editing { draft } | Phase::SavingTitle { draft } => Some(draft.as_str()),
            Phase::Deleting { resume: Some(draft) } => Some(draft.as_str()),
            Phase::Viewing | Phase::Deleting { resume: None } => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.toggles_in_flight > 0
            || matches!(self.phase, Phase::SavingTitle { .. } | Phase::Deleting { .. })
    }

    /// Double activation on the title. Returns whether the editor opened.
    pub fn begin_edit(&mut self, todo: &Todo) -> bool {
        if self.phase != Phase::Viewing {
            return false;
        }
        self.phase = Phase::Editing {
            draft: todo.title.clone(),
        };
        true
    }

    pub fn set_draft(&mut self, text: &str) {
        if let Phase::Editing { draft } = &mut self.phase {
            *draft = text.to_string();
        }
    }

    /// Blur, submit and Enter all land here.
    pub fn commit(&mut self, todo: &Todo) -> ItemCommand {
        let Phase::Editing { draft } = &self.phase else {
            return ItemCommand::Nothing;
        };
        let draft = draft.clone();
        let title = draft.trim();

        if title == todo.title {
            self.phase = Phase::Viewing;
            return ItemCommand::Nothing;
        }
        if title.is_empty() {
            debug!(id = %todo.id, "title cleared, deleting");
            self.phase = Phase::Deleting { resume: Some(draft) };
            return ItemCommand::Delete;
        }

        let update = UpdateTodo::title(title);
        self.phase = Phase::SavingTitle { draft };
        ItemCommand::Update(update)
    }

    /// Escape: drop the draft without a remote call.
    pub fn cancel_edit(&mut self) {
        if matches!(self.phase, Phase::Editing { .. }) {
            self.phase = Phase::Viewing;
        }
    }

    /// The checkbox. The checked state keeps following `todo.completed`; no
    /// local flip happens ahead of the server.
    pub fn toggle(&mut self, todo: &Todo) -> ItemCommand {
        if matches!(self.phase, Phase::Deleting { .. }) {
            return ItemCommand::Nothing;
        }
        self.toggles_in_flight += 1;
        ItemCommand::Update(UpdateTodo::completed(!todo.completed))
    }

    /// The delete control, only reachable while viewing.
    pub fn delete(&mut self) -> ItemCommand {
        if self.phase != Phase::Viewing {
            return ItemCommand::Nothing;
        }
        self.phase = Phase::Deleting { resume: None };
        ItemCommand::Delete
    }

    pub fn update_settled(&mut self, origin: UpdateOrigin, succeeded: bool) {
        match origin {
            UpdateOrigin::Toggle => {
                self.toggles_in_flight = self.toggles_in_flight.saturating_sub(1);
            }
            UpdateOrigin::Title => {
                if let Phase::SavingTitle { draft } = &self.phase {
                    self.phase = if succeeded {
                        Phase::Viewing
                    } else {
                        Phase::Editing { draft: draft.clone() }
                    };
                }
            }
            UpdateOrigin::ToggleAll => {}
        }
    }

    pub fn delete_failed(&mut self) {
        if let Phase::Deleting { resume } = &mut self.phase {
            self.phase = match resume.take() {
                Some(draft) => Phase::Editing { draft },
                None => Phase::Viewing,
            };
        }
    }
}
