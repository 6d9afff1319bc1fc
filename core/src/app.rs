//! The application controller.
//!
//! # Design
//! `App` owns the authoritative collection and every piece of page state.
//! It is a plain `&mut self` state machine: user intents return `Effect`s,
//! and the host feeds request outcomes back through `App::receive`. Each
//! outgoing request is registered under a `Ticket` together with what it
//! was for, so reconciliation happens in one place and in the order the
//! host delivers results. Overlapping calls on the same item are not
//! serialized; whichever response arrives last is what the collection shows.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::banner::{ErrorBanner, ErrorMessage, DISMISS_AFTER};
use crate::client::TodoClient;
use crate::effect::{Effect, Ticket};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::item::{ItemCommand, ItemController, Phase, UpdateOrigin};
use crate::types::{Todo, TodoId, UpdateTodo};
use crate::view::{
    items_left_label, visible, AppView, Counts, Filter, FooterView, InputView, NotificationView, ToggleAllView,
    TodoView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteOrigin {
    Item,
    ClearCompleted,
}

/// What an in-flight request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingCall {
    Load,
    Create,
    Delete { id: TodoId, origin: DeleteOrigin },
    Update { id: TodoId, origin: UpdateOrigin },
}

#[derive(Debug)]
pub struct App {
    client: TodoClient,
    items: Vec<Todo>,
    cards: HashMap<TodoId, ItemController>,
    filter: Filter,
    draft: String,
    is_submitting: bool,
    placeholder: Option<Todo>,
    banner: ErrorBanner,
    pending: HashMap<Ticket, PendingCall>,
    next_ticket: u64,
}

impl App {
    pub fn new(client: TodoClient) -> Self {
        Self::with_dismiss_after(client, DISMISS_AFTER)
    }

    pub fn with_dismiss_after(client: TodoClient, dismiss_after: Duration) -> Self {
        Self {
            client,
            items: Vec::new(),
            cards: HashMap::new(),
            filter: Filter::All,
            draft: String::new(),
            is_submitting: false,
            placeholder: None,
            banner: ErrorBanner::new(dismiss_after),
            pending: HashMap::new(),
            next_ticket: 0,
        }
    }

    // -----------------------------------------------------------------------
    // State accessors
    // -----------------------------------------------------------------------

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn placeholder(&self) -> Option<&Todo> {
        self.placeholder.as_ref()
    }

    pub fn error(&self) -> Option<ErrorMessage> {
        self.banner.message()
    }

    pub fn counts(&self) -> Counts {
        Counts::of(&self.items)
    }

    pub fn visible_items(&self) -> Vec<&Todo> {
        visible(&self.items, self.filter)
    }

    pub fn item_phase(&self, id: TodoId) -> Option<&Phase> {
        self.cards.get(&id).map(ItemController::phase)
    }

    pub fn has_pending_requests(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    // -----------------------------------------------------------------------
    // Page-level intents
    // -----------------------------------------------------------------------

    /// Initial load of the user's todos.
    pub fn start(&mut self) -> Vec<Effect> {
        let request = self.client.build_list_todos();
        vec![self.send(PendingCall::Load, request)]
    }

    /// Typing into the new-todo field. Ignored while the field is disabled.
    pub fn set_draft(&mut self, text: &str) {
        if !self.is_submitting {
            self.draft = text.to_string();
        }
    }

    pub fn submit(&mut self) -> Vec<Effect> {
        if self.is_submitting {
            return Vec::new();
        }
        let title = self.draft.trim().to_string();
        if title.is_empty() {
            return vec![self.banner.show(ErrorMessage::EmptyTitle)];
        }

        let request = match self.client.build_create_todo(&title) {
            Ok(request) => request,
            Err(err) => {
                warn!(%err, "could not build create request");
                return vec![self.banner.show(ErrorMessage::AddTodo), Effect::FocusNewTodo];
            }
        };
        self.is_submitting = true;
        self.placeholder = Some(Todo::placeholder(self.client.user_id(), title));
        vec![self.send(PendingCall::Create, request)]
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Every completed item gets its own delete; they succeed or fail
    /// independently.
    pub fn clear_completed(&mut self) -> Vec<Effect> {
        let completed: Vec<TodoId> = self.items.iter().filter(|todo| todo.completed).map(|todo| todo.id).collect();
        debug!(count = completed.len(), "clearing completed todos");
        completed
            .into_iter()
            .map(|id| self.send_delete(id, DeleteOrigin::ClearCompleted))
            .collect()
    }

    /// Completes every item, or reopens every item when all are completed.
    /// Failures of these updates do not reach the banner.
    pub fn toggle_all(&mut self) -> Vec<Effect> {
        let target = !self.counts().all_completed();
        let ids: Vec<TodoId> = self
            .items
            .iter()
            .filter(|todo| todo.completed != target)
            .map(|todo| todo.id)
            .collect();

        let mut effects = Vec::with_capacity(ids.len());
        for id in ids {
            match self.client.build_update_todo(id, &UpdateTodo::completed(target)) {
                Ok(request) => effects.push(self.send(
                    PendingCall::Update {
                        id,
                        origin: UpdateOrigin::ToggleAll,
                    },
                    request,
                )),
                Err(err) => debug!(%id, %err, "toggle-all update skipped"),
            }
        }
        effects
    }

    pub fn dismiss_error(&mut self) -> Vec<Effect> {
        vec![self.banner.dismiss()]
    }

    /// The banner timer scheduled with `generation` fired.
    pub fn dismiss_elapsed(&mut self, generation: u64) {
        self.banner.expire(generation);
    }

    // -----------------------------------------------------------------------
    // Item-level intents
    // -----------------------------------------------------------------------

    pub fn begin_edit(&mut self, id: TodoId) -> Vec<Effect> {
        let Some((todo, card)) = self.item_and_card(id) else {
            return Vec::new();
        };
        if card.begin_edit(todo) {
            vec![Effect::FocusTitleField(id)]
        } else {
            Vec::new()
        }
    }

    pub fn edit_title(&mut self, id: TodoId, text: &str) {
        if let Some(card) = self.cards.get_mut(&id) {
            card.set_draft(text);
        }
    }

    /// Blur, submit or Enter in the title editor.
    pub fn commit_edit(&mut self, id: TodoId) -> Vec<Effect> {
        let Some((todo, card)) = self.item_and_card(id) else {
            return Vec::new();
        };
        let command = card.commit(todo);
        self.run_item_command(id, command, UpdateOrigin::Title)
    }

    /// Escape in the title editor.
    pub fn cancel_edit(&mut self, id: TodoId) {
        if let Some(card) = self.cards.get_mut(&id) {
            card.cancel_edit();
        }
    }

    pub fn toggle(&mut self, id: TodoId) -> Vec<Effect> {
        let Some((todo, card)) = self.item_and_card(id) else {
            return Vec::new();
        };
        let command = card.toggle(todo);
        self.run_item_command(id, command, UpdateOrigin::Toggle)
    }

    /// The placeholder has no server counterpart and cannot be deleted.
    pub fn delete(&mut self, id: TodoId) -> Vec<Effect> {
        if id.is_placeholder() {
            return Vec::new();
        }
        let Some((_, card)) = self.item_and_card(id) else {
            debug!(%id, "delete for unknown todo ignored");
            return Vec::new();
        };
        match card.delete() {
            ItemCommand::Delete => vec![self.send_delete(id, DeleteOrigin::Item)],
            ItemCommand::Nothing | ItemCommand::Update(_) => Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------------

    /// Deliver the outcome of the request sent under `ticket`.
    pub fn receive(&mut self, ticket: Ticket, result: Result<HttpResponse, ApiError>) -> Vec<Effect> {
        let Some(call) = self.pending.remove(&ticket) else {
            debug!(%ticket, "response for unknown ticket ignored");
            return Vec::new();
        };
        match call {
            PendingCall::Load => {
                let outcome = result.and_then(|response| self.client.parse_list_todos(response));
                self.finish_load(outcome)
            }
            PendingCall::Create => {
                let outcome = result.and_then(|response| self.client.parse_create_todo(response));
                self.finish_create(outcome)
            }
            PendingCall::Delete { id, origin } => {
                let outcome = result.and_then(|response| self.client.parse_delete_todo(response));
                self.finish_delete(id, origin, outcome)
            }
            PendingCall::Update { id, origin } => {
                let outcome = result.and_then(|response| self.client.parse_update_todo(response));
                self.finish_update(id, origin, outcome)
            }
        }
    }

    fn finish_load(&mut self, outcome: Result<Vec<Todo>, ApiError>) -> Vec<Effect> {
        let mut effects = Vec::new();
        match outcome {
            Ok(todos) => {
                self.replace_items(todos);
                info!(count = self.items.len(), "todos loaded");
            }
            Err(err) => {
                warn!(%err, "loading todos failed");
                effects.push(self.banner.show(ErrorMessage::LoadTodos));
            }
        }
        effects.push(Effect::FocusNewTodo);
        effects
    }

    fn finish_create(&mut self, outcome: Result<Todo, ApiError>) -> Vec<Effect> {
        let mut effects = Vec::new();
        match outcome {
            Ok(todo) if todo.id.is_placeholder() || self.contains(todo.id) => {
                warn!(id = %todo.id, "server returned an unusable id for a new todo");
                effects.push(self.banner.show(ErrorMessage::AddTodo));
            }
            Ok(todo) => {
                debug!(id = %todo.id, "todo created");
                self.cards.insert(todo.id, ItemController::new());
                self.items.push(todo);
                self.draft.clear();
            }
            Err(err) => {
                warn!(%err, "creating todo failed");
                effects.push(self.banner.show(ErrorMessage::AddTodo));
            }
        }
        self.is_submitting = false;
        self.placeholder = None;
        effects.push(Effect::FocusNewTodo);
        effects
    }

    fn finish_delete(&mut self, id: TodoId, origin: DeleteOrigin, outcome: Result<(), ApiError>) -> Vec<Effect> {
        let mut effects = Vec::new();
        match outcome {
            Ok(()) => {
                debug!(%id, "todo deleted");
                self.items.retain(|todo| todo.id != id);
                self.cards.remove(&id);
            }
            Err(err) => {
                warn!(%id, %err, "deleting todo failed");
                effects.push(self.banner.show(ErrorMessage::DeleteTodo));
                if origin == DeleteOrigin::Item {
                    if let Some(card) = self.cards.get_mut(&id) {
                        card.delete_failed();
                    }
                }
            }
        }
        effects.push(Effect::FocusNewTodo);
        effects
    }

    fn finish_update(&mut self, id: TodoId, origin: UpdateOrigin, outcome: Result<Todo, ApiError>) -> Vec<Effect> {
        let mut effects = Vec::new();
        let succeeded = match outcome {
            Ok(todo) if todo.id == id => {
                if let Some(slot) = self.items.iter_mut().find(|item| item.id == id) {
                    *slot = todo;
                }
                true
            }
            Ok(todo) => {
                warn!(%id, returned = %todo.id, "update answered for a different todo");
                false
            }
            Err(err) => {
                warn!(%id, %err, ?origin, "updating todo failed");
                false
            }
        };
        if !succeeded && origin != UpdateOrigin::ToggleAll {
            effects.push(self.banner.show(ErrorMessage::UpdateTodo));
        }
        if let Some(card) = self.cards.get_mut(&id) {
            card.update_settled(origin, succeeded);
        }
        effects
    }

    // -----------------------------------------------------------------------
    // Presentation
    // -----------------------------------------------------------------------

    pub fn view(&self) -> AppView {
        let counts = self.counts();
        let has_items = counts.total > 0;
        let message = self.banner.message();

        AppView {
            input: InputView {
                draft: self.draft.clone(),
                disabled: self.is_submitting,
            },
            toggle_all: has_items.then(|| ToggleAllView {
                active: counts.all_completed(),
            }),
            items: self.visible_items().into_iter().map(|todo| self.row(todo)).collect(),
            placeholder: self.placeholder.as_ref().map(|todo| TodoView {
                id: todo.id,
                title: todo.title.clone(),
                completed: todo.completed,
                is_busy: true,
                editing: None,
            }),
            footer: has_items.then(|| FooterView {
                items_left: items_left_label(counts.active),
                filter: self.filter,
                clear_completed_enabled: counts.completed > 0,
            }),
            notification: NotificationView {
                message: message.map(|m| m.as_str().to_string()).unwrap_or_default(),
                hidden: message.is_none(),
            },
        }
    }

    fn row(&self, todo: &Todo) -> TodoView {
        let card = self.cards.get(&todo.id);
        TodoView {
            id: todo.id,
            title: todo.title.clone(),
            completed: todo.completed,
            is_busy: card.is_some_and(ItemController::is_busy),
            editing: card.and_then(|card| card.edit_draft()).map(str::to_string),
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn send(&mut self, call: PendingCall, request: HttpRequest) -> Effect {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        debug!(%ticket, method = %request.method, path = %request.path, ?call, "request issued");
        self.pending.insert(ticket, call);
        Effect::Send { ticket, request }
    }

    fn send_delete(&mut self, id: TodoId, origin: DeleteOrigin) -> Effect {
        let request = self.client.build_delete_todo(id);
        self.send(PendingCall::Delete { id, origin }, request)
    }

    fn run_item_command(&mut self, id: TodoId, command: ItemCommand, origin: UpdateOrigin) -> Vec<Effect> {
        match command {
            ItemCommand::Nothing => Vec::new(),
            ItemCommand::Delete => vec![self.send_delete(id, DeleteOrigin::Item)],
            ItemCommand::Update(update) => match self.client.build_update_todo(id, &update) {
                Ok(request) => vec![self.send(PendingCall::Update { id, origin }, request)],
                Err(err) => self.finish_update(id, origin, Err(err)),
            },
        }
    }

    fn item_and_card(&mut self, id: TodoId) -> Option<(&Todo, &mut ItemController)> {
        let todo = self.items.iter().find(|todo| todo.id == id)?;
        let card = self.cards.entry(id).or_default();
        Some((todo, card))
    }

    fn contains(&self, id: TodoId) -> bool {
        self.items.iter().any(|todo| todo.id == id)
    }

    /// Install a fresh collection, dropping entries that would break the
    /// non-zero unique id invariant.
    fn replace_items(&mut self, todos: Vec<Todo>) {
        let mut seen = HashSet::new();
        self.items = todos
            .into_iter()
            .filter(|todo| {
                let keep = !todo.id.is_placeholder() && seen.insert(todo.id);
                if !keep {
                    warn!(id = %todo.id, "dropping todo with reserved or duplicate id");
                }
                keep
            })
            .collect();
        self.cards.retain(|id, _| seen.contains(id));
        for todo in &self.items {
            self.cards.entry(todo.id).or_default();
        }
    }
}
