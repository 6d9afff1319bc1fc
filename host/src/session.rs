//! The host side of a running todo page.
//!
//! # Design
//! `Session` owns the `App` and is driven from a single task. Effects are
//! performed as they are returned: requests run on the blocking pool and
//! report back over an unbounded channel, the banner countdown is a spawned
//! sleep whose `JoinHandle` is aborted whenever the core replaces or cancels
//! it. Results are handed to the core in arrival order.

use todo_core::{ApiError, App, Effect, HttpRequest, HttpResponse, Ticket, TodoClient, TodoId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{Config, ConfigError};
use crate::transport::Transport;

/// Something that happened outside the core and must be fed back into it.
#[derive(Debug)]
pub enum Event {
    Response {
        ticket: Ticket,
        result: Result<HttpResponse, ApiError>,
    },
    DismissElapsed(u64),
}

/// Where keyboard input currently goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    NewTodo,
    TitleField(TodoId),
}

#[derive(Debug)]
pub struct Session {
    app: App,
    transport: Transport,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    dismiss_timer: Option<JoinHandle<()>>,
    focus: Option<Focus>,
}

impl Session {
    pub fn new(app: App, transport: Transport) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            app,
            transport,
            events_tx,
            events_rx,
            dismiss_timer: None,
            focus: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = TodoClient::new(&config.base_url, config.user_id);
        let app = App::with_dismiss_after(client, config.dismiss_after());
        Ok(Self::new(app, Transport::new(config.request_timeout())))
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    /// Issue the initial load.
    pub fn start(&mut self) {
        let effects = self.app.start();
        self.run(effects);
    }

    /// Apply a user intent and perform whatever it asks for.
    pub fn dispatch<F>(&mut self, intent: F)
    where
        F: FnOnce(&mut App) -> Vec<Effect>,
    {
        let effects = intent(&mut self.app);
        self.run(effects);
    }

    /// Wait for the next outside event. Never yields `None` while the
    /// session is alive since it holds a sender itself.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events_rx.recv().await
    }

    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Response { ticket, result } => {
                let effects = self.app.receive(ticket, result);
                self.run(effects);
            }
            Event::DismissElapsed(generation) => self.app.dismiss_elapsed(generation),
        }
    }

    /// Handle everything already queued without waiting. Returns how many
    /// events were processed.
    pub fn poll_ready(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    /// Process events until no request is in flight.
    pub async fn settle(&mut self) {
        while self.app.has_pending_requests() {
            match self.events_rx.recv().await {
                Some(event) => self.handle(event),
                None => break,
            }
        }
    }

    /// Tear down the banner countdown. In-flight requests are not cancelled;
    /// their results are dropped with the channel.
    pub fn shutdown(&mut self) {
        self.cancel_dismiss();
    }

    fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Send { ticket, request } => self.spawn_request(ticket, request),
                Effect::ScheduleDismiss { generation, after } => {
                    self.cancel_dismiss();
                    let tx = self.events_tx.clone();
                    self.dismiss_timer = Some(tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        if tx.send(Event::DismissElapsed(generation)).is_err() {
                            debug!(generation, "session gone before banner timer fired");
                        }
                    }));
                }
                Effect::CancelDismiss => self.cancel_dismiss(),
                Effect::FocusNewTodo => self.focus = Some(Focus::NewTodo),
                Effect::FocusTitleField(id) => self.focus = Some(Focus::TitleField(id)),
            }
        }
    }

    fn spawn_request(&self, ticket: Ticket, request: HttpRequest) {
        let transport = self.transport.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = match tokio::task::spawn_blocking(move || transport.execute(request)).await {
                Ok(result) => result,
                Err(err) => {
                    warn!(%ticket, %err, "request task failed");
                    Err(ApiError::Transport(err.to_string()))
                }
            };
            if tx.send(Event::Response { ticket, result }).is_err() {
                debug!(%ticket, "session gone before response arrived");
            }
        });
    }

    fn cancel_dismiss(&mut self) {
        if let Some(timer) = self.dismiss_timer.take() {
            timer.abort();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel_dismiss();
    }
}
